//! # Rule Expression Language - Abstract Syntax Tree
//!
//! Rule expressions are small boolean formulas evaluated against injected
//! symbols:
//!
//! ```text
//! user.Age >= 18 && (country == "NL" || is_vip(user.Id))
//! ```
//!
//! The AST module is organized into focused submodules:
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Expression nodes (literals, identifiers, selectors, calls, operations)
//! - **[operators]** - Operator kinds shared by the parser and every evaluation backend
//!
//! ## Precedence
//!
//! From lowest to highest binding:
//!
//! | Level | Operators |
//! |---|---|
//! | logical or | `\|\|` |
//! | logical and | `&&` |
//! | equality | `==` `!=` |
//! | relational | `<` `<=` `>` `>=` |
//! | unary | `!` `-` |
//! | postfix | `.field` `(args)` |
//!
//! `true` and `false` are ordinary identifiers resolved through the symbol
//! table; they are not syntactic literals.
pub mod expressions;
pub mod operators;
pub mod tokens;

pub use expressions::{Expr, Literal};
pub use operators::{BinOp, OpKind, UnaryOp};
pub use tokens::{SpannedToken, Token};
