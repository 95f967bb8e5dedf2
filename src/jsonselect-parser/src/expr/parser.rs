//! Precedence-climbing parser for `:expr(...)` bodies

use crate::ast::Expr;
use crate::error::{ErrorKind, ParseError, Result};

use super::lexer::{next_expr_token, ExprLexeme, ExprToken};

/// Parse a bare expression such as `x * 2 > 10`.
///
/// The whole input must be one expression; trailing text fails with
/// *binary operator expected*.
pub fn parse_expression(source: &str) -> Result<Expr> {
    let mut parser = ExprParser { source, pos: 0 };
    let expr = parser.binary(0)?;
    match parser.peek()? {
        None if source[parser.pos..].trim().is_empty() => Ok(expr),
        Some(ExprLexeme {
            token: ExprToken::RParen,
            start,
            ..
        }) => Err(ParseError::at(ErrorKind::UnexpectedClosingParen, source, start)),
        _ => Err(parser.error(ErrorKind::BinaryOperatorExpected)),
    }
}

/// Parse `( expression )` starting at `offset` in a selector.
///
/// Returns the expression and the offset just past the closing paren.
pub(crate) fn parse_parenthesized(source: &str, offset: usize) -> Result<(Expr, usize)> {
    let mut parser = ExprParser {
        source,
        pos: offset,
    };
    match parser.peek()? {
        Some(ExprLexeme {
            token: ExprToken::LParen,
            end,
            ..
        }) => parser.pos = end,
        _ => return Err(parser.error(ErrorKind::OpeningParenExpected)),
    }
    let expr = parser.binary(0)?;
    parser.close()?;
    Ok((expr, parser.pos))
}

struct ExprParser<'s> {
    source: &'s str,
    pos: usize,
}

impl ExprParser<'_> {
    fn peek(&self) -> Result<Option<ExprLexeme>> {
        next_expr_token(self.source, self.pos)
    }

    fn error(&self, kind: ErrorKind) -> ParseError {
        let rest = &self.source[self.pos..];
        let start = self.pos + rest.len() - rest.trim_start().len();
        ParseError::at(kind, self.source, start)
    }

    fn close(&mut self) -> Result<()> {
        match self.peek()? {
            Some(ExprLexeme {
                token: ExprToken::RParen,
                end,
                ..
            }) => {
                self.pos = end;
                Ok(())
            }
            _ => Err(self.error(ErrorKind::ClosingParenExpected)),
        }
    }

    fn primary(&mut self) -> Result<Expr> {
        let Some(lexeme) = self.peek()? else {
            return Err(self.error(ErrorKind::ExpressionExpected));
        };
        let expr = match lexeme.token {
            ExprToken::LParen => {
                self.pos = lexeme.end;
                let inner = self.binary(0)?;
                self.close()?;
                return Ok(inner);
            }
            ExprToken::Literal(literal) => Expr::Literal(literal),
            ExprToken::Placeholder => Expr::Placeholder,
            ExprToken::Op(_) | ExprToken::RParen => {
                return Err(self.error(ErrorKind::ExpressionExpected));
            }
        };
        self.pos = lexeme.end;
        Ok(expr)
    }

    fn binary(&mut self, min_precedence: u8) -> Result<Expr> {
        let mut lhs = self.primary()?;
        loop {
            let op = match self.peek()? {
                None
                | Some(ExprLexeme {
                    token: ExprToken::RParen,
                    ..
                }) => break,
                Some(ExprLexeme {
                    token: ExprToken::Op(op),
                    end,
                    ..
                }) => {
                    if op.precedence() < min_precedence {
                        break;
                    }
                    self.pos = end;
                    op
                }
                Some(_) => return Err(self.error(ErrorKind::BinaryOperatorExpected)),
            };
            let rhs = self.binary(op.precedence() + 1)?;
            log::trace!("expr: reduce {}", op.symbol());
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOperator, Literal};
    use pretty_assertions::assert_eq;

    fn num(n: f64) -> Expr {
        Expr::Literal(Literal::Number(n))
    }

    #[test]
    fn test_precedence() {
        let expr = parse_expression("1 + 2 * 3").unwrap();
        assert_eq!(
            expr,
            Expr::binary(
                BinaryOperator::Add,
                num(1.0),
                Expr::binary(BinaryOperator::Mul, num(2.0), num(3.0))
            )
        );
    }

    #[test]
    fn test_left_associativity() {
        let expr = parse_expression("10 - 4 - 3").unwrap();
        assert_eq!(
            expr,
            Expr::binary(
                BinaryOperator::Sub,
                Expr::binary(BinaryOperator::Sub, num(10.0), num(4.0)),
                num(3.0)
            )
        );
    }

    #[test]
    fn test_parens_leave_no_node() {
        let expr = parse_expression("((x))").unwrap();
        assert_eq!(expr, Expr::Placeholder);

        let expr = parse_expression("(1 + 2) * 3").unwrap();
        assert_eq!(
            expr,
            Expr::binary(
                BinaryOperator::Mul,
                Expr::binary(BinaryOperator::Add, num(1.0), num(2.0)),
                num(3.0)
            )
        );
    }

    #[test]
    fn test_logical_operators_bind_loosest() {
        let expr = parse_expression(r#"x = 1 || x ^= "a" && true"#).unwrap();
        let Expr::Binary { op, rhs, .. } = expr else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOperator::Or);
        assert!(matches!(
            *rhs,
            Expr::Binary {
                op: BinaryOperator::And,
                ..
            }
        ));
    }

    #[test]
    fn test_errors() {
        let kind = |s: &str| parse_expression(s).unwrap_err().kind;
        assert_eq!(kind("x ="), ErrorKind::ExpressionExpected);
        assert_eq!(kind(""), ErrorKind::ExpressionExpected);
        assert_eq!(kind("x 1"), ErrorKind::BinaryOperatorExpected);
        assert_eq!(kind("x -1"), ErrorKind::BinaryOperatorExpected);
        assert_eq!(kind("(x = 1"), ErrorKind::ClosingParenExpected);
        assert_eq!(kind("x = 1)"), ErrorKind::UnexpectedClosingParen);
        assert_eq!(kind("x = y"), ErrorKind::ExpressionExpected);
    }

    #[test]
    fn test_parenthesized_reports_end_offset() {
        let source = ":expr( x > 1 ) rest";
        let (expr, end) = parse_parenthesized(source, 5).unwrap();
        assert_eq!(
            expr,
            Expr::binary(BinaryOperator::Gt, Expr::Placeholder, num(1.0))
        );
        assert_eq!(&source[end..], " rest");
    }

    #[test]
    fn test_parenthesized_requires_open_paren() {
        let err = parse_parenthesized(":expr x", 5).unwrap_err();
        assert_eq!(err.kind, ErrorKind::OpeningParenExpected);
    }
}
