//! jsonselect-parser: Parser for JSONSelect selectors
//!
//! This crate turns selector strings into the immutable [`Selector`] tree the
//! matcher walks. It contains the selector lexer, the recursive-descent
//! selector parser, the lexer and precedence-climbing parser of the `:expr`
//! sub-language, and the normalizer that desugars the sibling combinator.
//!
//! # Quick Start
//!
//! ```rust
//! use jsonselect_parser::{SelectorParser, Segment};
//!
//! let parser = SelectorParser::new();
//! let selector = parser.parse("object > .name:val(\"x\")")?;
//!
//! let group = &selector.union.0[0];
//! assert!(matches!(group.0[1], Segment::Child));
//! # Ok::<(), jsonselect_parser::ParseError>(())
//! ```
//!
//! # Supported Syntax
//!
//! - **Types**: `string`, `number`, `boolean`, `null`, `array`, `object`, `*`
//! - **Keys**: `.name`, `."quoted name"`, or a bare `name`
//! - **Combinators**: descendant (space), child `>`, sibling `~`, list `,`
//! - **Pseudo-classes**: `:root`, `:first-child`, `:last-child`,
//!   `:only-child`, `:nth-child(an+b)`, `:nth-last-child(an+b)`
//! - **Predicates**: `:has(selector)`, `:expr(expression)`, `:val("s")`,
//!   `:contains("s")`
//!
//! # Error Handling
//!
//! Parsing stops at the first violated rule. The error names the rule and
//! carries the rest of the source from the offending offset:
//!
//! ```rust
//! use jsonselect_parser::{parse_selector, ErrorKind};
//!
//! let err = parse_selector(".a.b").unwrap_err();
//! assert_eq!(err.kind, ErrorKind::MultipleIds);
//! assert_eq!(err.to_string(), "multiple ids not allowed in '.b'");
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::too_many_lines
)]

pub mod ast;
pub mod error;
pub mod expr;
pub mod lexer;
pub mod normalize;
mod parser;
#[cfg(test)]
mod tests;

// Re-export main types
pub use ast::*;
pub use error::*;
pub use expr::parse_expression;
pub use parser::*;
