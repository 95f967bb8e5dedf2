//! # jsonselect
//!
//! CSS-like selectors for JSON documents.
//!
//! A selector such as `.people > object:has(.age:expr(x > 30)) .name` picks
//! nodes out of a decoded document by type, member key, position among
//! siblings and value predicates. Matches come back in document order and
//! each node is returned at most once.
//!
//! ```
//! use jsonselect::Document;
//!
//! let doc = Document::from_json(r#"{"people": [{"name": "ann", "age": 31}, {"name": "bob", "age": 25}]}"#)?;
//! let names = doc.find("object:has(.age:expr(x > 30)) > .name")?;
//! assert_eq!(names.text().to_string(), "ann");
//! # Ok::<(), jsonselect::Error>(())
//! ```
//!
//! The parser and matcher live in their own crates and are re-exported here:
//! [`SelectorParser`] turns text into a [`Selector`], [`select`] runs it and
//! [`SelectorExecutor`] caches parsed selectors across many documents.

pub mod document;
pub mod error;
pub mod selection;

pub use document::Document;
pub use error::{Error, Result};
pub use selection::{Selection, Text};

pub use jsonselect_matcher::{
    select, select_first, select_str, Collector, ExecutionStats, ExecutorConfig, MatchContext,
    SelectorExecutor,
};
pub use jsonselect_parser::{
    parse_expression, parse_selector, ErrorKind, Expr, JsonType, ParseError, PseudoClass,
    Selector, SelectorParser,
};

/// Version of the jsonselect library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
