//! Tokenizer for the `:expr(...)` language

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit0, digit1, one_of},
    combinator::{map, map_res, opt, recognize, value},
    IResult, Parser,
};

use crate::ast::{BinaryOperator, Literal};
use crate::error::Result;
use crate::lexer::lex_string;

/// Expression tokens
#[derive(Debug, Clone, PartialEq)]
pub enum ExprToken {
    /// `true`, `false`, `null`, a number or a string
    Literal(Literal),
    /// `x`
    Placeholder,
    /// A binary operator
    Op(BinaryOperator),
    /// `(`
    LParen,
    /// `)`
    RParen,
}

/// A token with its byte span, leading whitespace excluded
#[derive(Debug, Clone, PartialEq)]
pub struct ExprLexeme {
    /// The token
    pub token: ExprToken,
    /// Offset of the first byte
    pub start: usize,
    /// Offset one past the last byte
    pub end: usize,
}

/// Read the token after any whitespace at `offset`.
///
/// Returns `None` at end of input and on text that starts no token; the
/// parser turns either into the error fitting its position.
pub fn next_expr_token(source: &str, offset: usize) -> Result<Option<ExprLexeme>> {
    let input = source[offset..].trim_start();
    let start = source.len() - input.len();

    if input.starts_with('"') {
        let (text, end) = lex_string(source, start)?;
        return Ok(Some(ExprLexeme {
            token: ExprToken::Literal(Literal::String(text)),
            start,
            end,
        }));
    }

    match alt((keyword_literal, number, placeholder, operator, paren)).parse(input) {
        Ok((rest, token)) => Ok(Some(ExprLexeme {
            token,
            start,
            end: source.len() - rest.len(),
        })),
        Err(_) => Ok(None),
    }
}

fn keyword_literal(input: &str) -> IResult<&str, ExprToken> {
    alt((
        value(ExprToken::Literal(Literal::Bool(true)), tag("true")),
        value(ExprToken::Literal(Literal::Bool(false)), tag("false")),
        value(ExprToken::Literal(Literal::Null), tag("null")),
    ))
    .parse(input)
}

fn number(input: &str) -> IResult<&str, ExprToken> {
    map_res(
        recognize((
            opt(char('-')),
            digit1,
            opt((char('.'), digit0)),
            opt((one_of("eE"), opt(one_of("+-")), digit1)),
        )),
        |s: &str| {
            s.parse::<f64>()
                .map(|n| ExprToken::Literal(Literal::Number(n)))
        },
    )
    .parse(input)
}

fn placeholder(input: &str) -> IResult<&str, ExprToken> {
    value(ExprToken::Placeholder, char('x')).parse(input)
}

fn operator(input: &str) -> IResult<&str, ExprToken> {
    map(
        alt((
            value(BinaryOperator::And, tag("&&")),
            value(BinaryOperator::Or, tag("||")),
            value(BinaryOperator::EndsWith, tag("$=")),
            value(BinaryOperator::StartsWith, tag("^=")),
            value(BinaryOperator::Le, tag("<=")),
            value(BinaryOperator::Ge, tag(">=")),
            value(BinaryOperator::Ne, tag("!=")),
            value(BinaryOperator::Contains, tag("*=")),
            value(BinaryOperator::Eq, tag("=")),
            value(BinaryOperator::Add, tag("+")),
            value(BinaryOperator::Sub, tag("-")),
            value(BinaryOperator::Mul, tag("*")),
            value(BinaryOperator::Div, tag("/")),
            value(BinaryOperator::Rem, tag("%")),
            value(BinaryOperator::Lt, tag("<")),
            value(BinaryOperator::Gt, tag(">")),
        )),
        ExprToken::Op,
    )
    .parse(input)
}

fn paren(input: &str) -> IResult<&str, ExprToken> {
    alt((
        value(ExprToken::LParen, char('(')),
        value(ExprToken::RParen, char(')')),
    ))
    .parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn tokens(source: &str) -> Vec<ExprToken> {
        let mut offset = 0;
        let mut out = Vec::new();
        while let Some(lexeme) = next_expr_token(source, offset).unwrap() {
            offset = lexeme.end;
            out.push(lexeme.token);
        }
        out
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            tokens(r#"true null 1.5e2 "a\"b""#),
            vec![
                ExprToken::Literal(Literal::Bool(true)),
                ExprToken::Literal(Literal::Null),
                ExprToken::Literal(Literal::Number(150.0)),
                ExprToken::Literal(Literal::String("a\"b".into())),
            ]
        );
    }

    #[test]
    fn test_longest_operator_wins() {
        assert_eq!(
            tokens("x*=x*x<=x<x"),
            vec![
                ExprToken::Placeholder,
                ExprToken::Op(BinaryOperator::Contains),
                ExprToken::Placeholder,
                ExprToken::Op(BinaryOperator::Mul),
                ExprToken::Placeholder,
                ExprToken::Op(BinaryOperator::Le),
                ExprToken::Placeholder,
                ExprToken::Op(BinaryOperator::Lt),
                ExprToken::Placeholder,
            ]
        );
    }

    #[test]
    fn test_negative_number_binds_its_sign() {
        // a minus directly before a digit is part of the number
        assert_eq!(
            tokens("x -1"),
            vec![
                ExprToken::Placeholder,
                ExprToken::Literal(Literal::Number(-1.0))
            ]
        );
        assert_eq!(
            tokens("x - 1"),
            vec![
                ExprToken::Placeholder,
                ExprToken::Op(BinaryOperator::Sub),
                ExprToken::Literal(Literal::Number(1.0))
            ]
        );
    }

    #[test]
    fn test_unknown_text_ends_the_stream() {
        assert_eq!(tokens("x y"), vec![ExprToken::Placeholder]);
    }

    #[test]
    fn test_unclosed_string() {
        let err = next_expr_token(r#" "abc"#, 0).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnclosedString);
        assert_eq!(err.position, 1);
    }
}
