//! # jsonselect-matcher
//!
//! Runs parsed JSONSelect selectors against `serde_json` documents.
//!
//! This crate provides:
//! - the evaluator of the `:expr(...)` language
//! - the depth-first collector returning matches in document order
//! - a [`SelectorExecutor`] that caches parsed selectors across documents

pub mod context;
pub mod eval;
pub mod executor;
pub mod matcher;

pub use context::MatchContext;
pub use eval::{evaluate, Evaluator, Operand};
pub use executor::{ExecutionStats, ExecutorConfig, SelectorExecutor};
pub use matcher::{select, select_first, Collector};

/// Re-export the parser types callers need alongside the matcher
pub use jsonselect_parser::{parse_selector, ErrorKind, ParseError, Selector, SelectorParser};

/// Convenience function to parse `selector` and run it against `root`
pub fn select_str<'v>(
    selector: &str,
    root: &'v serde_json::Value,
) -> jsonselect_parser::Result<Vec<&'v serde_json::Value>> {
    let selector = parse_selector(selector)?;
    Ok(select(&selector, root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_select_str() {
        let doc = json!({"a": {"b": 1}, "b": 2});
        let found = select_str(".b", &doc).unwrap();
        assert_eq!(found, vec![&json!(1), &json!(2)]);
    }

    #[test]
    fn test_select_str_reports_parse_errors() {
        let err = select_str(":nth-child(xyz)", &json!([1])).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedPseudoFunction);
    }
}
