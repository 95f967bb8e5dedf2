//! Error types for the selector and expression parsers

use thiserror::Error;

/// The grammar rule a selector violated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// A character that starts no token
    #[error("unrecognized char")]
    UnrecognizedChar,
    /// A string literal with no closing quote
    #[error("unclosed json string")]
    UnclosedString,
    /// A closed string literal that is not valid JSON
    #[error("invalid json string")]
    InvalidString,
    /// A `.` not followed by an identifier or a string
    #[error("string required after '.'")]
    StringRequiredAfterDot,
    /// Nothing usable where a selector must start
    #[error("selector expected")]
    SelectorExpected,
    /// Nothing usable where an operand must start
    #[error("expression expected")]
    ExpressionExpected,
    /// Two operands with no operator between them
    #[error("binary operator expected")]
    BinaryOperatorExpected,
    /// A pseudo-function without its argument list
    #[error("opening paren expected '('")]
    OpeningParenExpected,
    /// An argument list or sub-expression left open
    #[error("closing paren expected ')'")]
    ClosingParenExpected,
    /// A `:has(` never closed
    #[error("missing closing paren")]
    MissingClosingParen,
    /// A `)` outside of any `:has(`
    #[error("unexpected closing paren")]
    UnexpectedClosingParen,
    /// A second identifier on one fragment
    #[error("multiple ids not allowed")]
    MultipleIds,
    /// A second pseudo-class on one fragment
    #[error("multiple pseudo classes (:xxx) not allowed")]
    MultiplePseudoClasses,
    /// A second `:expr`, `:val` or `:contains` on one fragment
    #[error("multiple expressions not allowed")]
    MultipleExpressions,
    /// An `:nth-child` argument that is not an `an+b` formula
    #[error("malformed expression in pseudo-function")]
    MalformedPseudoFunction,
    /// A `:name` that is no known pseudo-class
    #[error("unrecognized pseudo class")]
    UnrecognizedPseudoClass,
    /// `:val` / `:contains` without a string argument
    #[error("string expected")]
    StringExpected,
}

/// A selector that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} in '{context}'")]
pub struct ParseError {
    /// Which rule was violated
    pub kind: ErrorKind,
    /// The source text from the offending position onwards
    pub context: String,
    /// Byte offset of the offending position
    pub position: usize,
}

impl ParseError {
    /// Build an error pointing at `position` in `source`
    pub fn at(kind: ErrorKind, source: &str, position: usize) -> Self {
        let position = position.min(source.len());
        let context = source.get(position..).unwrap_or_default();
        Self {
            kind,
            context: if context.is_empty() {
                source.to_string()
            } else {
                context.to_string()
            },
            position,
        }
    }
}

/// Result type for parsing operations
pub type Result<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_context() {
        let err = ParseError::at(ErrorKind::MultipleIds, ".a.b", 2);
        assert_eq!(err.to_string(), "multiple ids not allowed in '.b'");
        assert_eq!(err.position, 2);
    }

    #[test]
    fn test_context_at_end_of_input_is_whole_source() {
        let err = ParseError::at(ErrorKind::SelectorExpected, ".a >", 4);
        assert_eq!(err.context, ".a >");
    }
}
