//! The expression sub-language of `:expr(...)`
//!
//! Expressions combine literals and the placeholder `x` with binary
//! operators. Parsing is precedence climbing over the token stream of
//! [`lexer`]; grouping parens are dropped once the tree is built.

pub mod lexer;
mod parser;

pub use parser::parse_expression;
pub(crate) use parser::parse_parenthesized;
