//! Recursive-descent parser for selector text
//!
//! The parser pulls tokens from [`crate::lexer`] one at a time and hands the
//! raw text to the `:nth-child` and `:expr` sub-grammars when it meets them.
//! `:has(...)` re-enters [`Parser::union`] in nested mode, which stops at the
//! matching `)`.

use std::mem;

use crate::ast::{BinaryOperator, Expr, Fragment, Group, Literal, Nth, PseudoClass, Segment, Selector, Union};
use crate::error::{ErrorKind, ParseError, Result};
use crate::expr::parse_parenthesized;
use crate::lexer::{next_token, Lexeme, PseudoClassName, PseudoFunction, Token};
use crate::normalize::{anchor, normalize};

mod nth;

/// Main parser for JSONSelect selectors
pub struct SelectorParser {
    // future parser configuration could go here
}

impl SelectorParser {
    /// Create a new parser instance
    pub fn new() -> Self {
        Self {}
    }

    /// Parse selector text into a normalized [`Selector`]
    pub fn parse(&self, input: &str) -> Result<Selector> {
        let union = parse_union(input)?;
        let selector = Selector::new(normalize(union));
        log::debug!("parsed selector {:?} as: {}", input, selector);
        Ok(selector)
    }
}

impl Default for SelectorParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse selector text with a default [`SelectorParser`]
pub fn parse_selector(input: &str) -> Result<Selector> {
    SelectorParser::new().parse(input)
}

/// Parse a whole selector list without the top-level sibling rewrite
pub(crate) fn parse_union(input: &str) -> Result<Union> {
    Parser {
        source: input,
        pos: 0,
    }
    .union(false)
}

struct Parser<'s> {
    source: &'s str,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Result<Option<Lexeme>> {
        next_token(self.source, self.pos)
    }

    /// Peek, stepping over one whitespace token first
    fn peek_past_space(&mut self) -> Result<Option<Lexeme>> {
        let next = self.peek()?;
        if let Some(Lexeme {
            token: Token::Space,
            end,
            ..
        }) = next
        {
            self.pos = end;
            return self.peek();
        }
        Ok(next)
    }

    fn error(&self, kind: ErrorKind, position: usize) -> ParseError {
        ParseError::at(kind, self.source, position)
    }

    fn expect_punct(&mut self, punct: char, kind: ErrorKind) -> Result<()> {
        match self.peek_past_space()? {
            Some(Lexeme {
                token: Token::Punct(c),
                end,
                ..
            }) if c == punct => {
                self.pos = end;
                Ok(())
            }
            _ => Err(self.error(kind, self.pos)),
        }
    }

    /// `group (',' group)*`; in nested mode the closing `)` is consumed
    fn union(&mut self, nested: bool) -> Result<Union> {
        let mut groups = Vec::new();
        let mut group = Vec::new();
        let mut closed = false;

        loop {
            group.push(Segment::Fragment(self.fragment()?));
            let Some(lexeme) = self.peek_past_space()? else {
                break;
            };
            match lexeme.token {
                Token::Punct('>') => group.push(Segment::Child),
                Token::Punct('~') => group.push(Segment::Sibling),
                Token::Punct(',') => groups.push(Group(mem::take(&mut group))),
                Token::Punct(')') => {
                    if !nested {
                        return Err(self.error(ErrorKind::UnexpectedClosingParen, lexeme.start));
                    }
                    self.pos = lexeme.end;
                    closed = true;
                    break;
                }
                // anything else starts the next fragment of a descendant step
                _ => continue,
            }
            self.pos = lexeme.end;
        }

        if nested && !closed {
            return Err(self.error(ErrorKind::MissingClosingParen, self.pos));
        }
        groups.push(Group(group));
        Ok(Union(groups))
    }

    /// `[type | '*'] (identifier | pseudo)*`
    fn fragment(&mut self) -> Result<Fragment> {
        let mut next = self.peek_past_space()?;
        let start = self.pos;
        let mut fragment = Fragment::default();

        let leading = match &next {
            Some(Lexeme {
                token: Token::Type(ty),
                end,
                ..
            }) => Some((Some(*ty), *end)),
            Some(Lexeme {
                token: Token::Punct('*'),
                end,
                ..
            }) => Some((None, *end)),
            _ => None,
        };
        if let Some((ty, end)) = leading {
            fragment.ty = ty;
            self.pos = end;
            next = self.peek()?;
        }

        while let Some(lexeme) = next {
            match lexeme.token {
                Token::Ident(id) => {
                    if fragment.id.is_some() {
                        return Err(self.error(ErrorKind::MultipleIds, lexeme.start));
                    }
                    fragment.id = Some(id);
                    self.pos = lexeme.end;
                }
                Token::PseudoClass(name) => {
                    if fragment.pseudo.is_some() {
                        return Err(self.error(ErrorKind::MultiplePseudoClasses, lexeme.start));
                    }
                    fragment.pseudo = Some(match name {
                        PseudoClassName::Root => PseudoClass::Root,
                        PseudoClassName::OnlyChild => PseudoClass::OnlyChild,
                        PseudoClassName::FirstChild => PseudoClass::NthChild(Nth::FIRST),
                        PseudoClassName::LastChild => PseudoClass::NthLastChild(Nth::FIRST),
                    });
                    self.pos = lexeme.end;
                }
                Token::PseudoFunction(function) => {
                    self.pos = lexeme.end;
                    self.pseudo_function(&mut fragment, function, lexeme.start)?;
                }
                _ => break,
            }
            next = self.peek()?;
        }

        if self.pos == start {
            return Err(self.error(ErrorKind::SelectorExpected, start));
        }
        log::trace!("fragment at {}: {}", start, fragment);
        Ok(fragment)
    }

    fn pseudo_function(
        &mut self,
        fragment: &mut Fragment,
        function: PseudoFunction,
        start: usize,
    ) -> Result<()> {
        match function {
            PseudoFunction::NthChild | PseudoFunction::NthLastChild => {
                if fragment.pseudo.is_some() {
                    return Err(self.error(ErrorKind::MultiplePseudoClasses, start));
                }
                let (nth, end) = nth::parse_nth(self.source, self.pos)?;
                self.pos = end;
                fragment.pseudo = Some(if function == PseudoFunction::NthChild {
                    PseudoClass::NthChild(nth)
                } else {
                    PseudoClass::NthLastChild(nth)
                });
            }
            PseudoFunction::Has => {
                self.expect_punct('(', ErrorKind::OpeningParenExpected)?;
                let union = self.union(true)?;
                fragment.has.push(normalize(anchor(union)));
            }
            PseudoFunction::Expr => {
                if fragment.expr.is_some() {
                    return Err(self.error(ErrorKind::MultipleExpressions, start));
                }
                let (expr, end) = parse_parenthesized(self.source, self.pos)?;
                self.pos = end;
                fragment.expr = Some(expr);
            }
            PseudoFunction::Val | PseudoFunction::Contains => {
                if fragment.expr.is_some() {
                    return Err(self.error(ErrorKind::MultipleExpressions, start));
                }
                self.expect_punct('(', ErrorKind::OpeningParenExpected)?;
                let text = match self.peek_past_space()? {
                    Some(Lexeme {
                        token: Token::Str(text),
                        end,
                        ..
                    }) => {
                        self.pos = end;
                        text
                    }
                    _ => return Err(self.error(ErrorKind::StringExpected, self.pos)),
                };
                self.expect_punct(')', ErrorKind::ClosingParenExpected)?;
                let op = if function == PseudoFunction::Val {
                    BinaryOperator::Eq
                } else {
                    BinaryOperator::Contains
                };
                fragment.expr = Some(Expr::binary(
                    op,
                    Expr::Placeholder,
                    Expr::Literal(Literal::String(text)),
                ));
            }
        }
        Ok(())
    }
}
