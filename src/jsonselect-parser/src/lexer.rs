//! Selector tokenizer
//!
//! The lexer is pull-based: [`next_token`] reads one token starting at a byte
//! offset, so the parser can hand the remaining text to the `:nth-child` and
//! `:expr` sub-grammars without tokenizing it as a selector.
//!
//! Bare words are identifiers unless they spell a type name, so `name` and
//! `.name` select the same key.

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, multispace1, one_of, satisfy},
    combinator::{map, recognize, value},
    multi::many0_count,
    sequence::preceded,
    IResult, Parser,
};

use crate::ast::JsonType;
use crate::error::{ErrorKind, ParseError, Result};

/// Selector tokens
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A run of whitespace
    Space,
    /// One of `~ * , > ( )`
    Punct(char),
    /// A reserved type name
    Type(JsonType),
    /// An argument-less pseudo-class
    PseudoClass(PseudoClassName),
    /// A pseudo-class taking a parenthesized argument
    PseudoFunction(PseudoFunction),
    /// An object key: `.name`, `."name"` or a bare word
    Ident(String),
    /// A bare JSON string, only valid as a pseudo-function argument
    Str(String),
}

/// Argument-less pseudo-classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PseudoClassName {
    /// `:root`
    Root,
    /// `:first-child`
    FirstChild,
    /// `:last-child`
    LastChild,
    /// `:only-child`
    OnlyChild,
}

/// Pseudo-classes with an argument list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PseudoFunction {
    /// `:nth-child(an+b)`
    NthChild,
    /// `:nth-last-child(an+b)`
    NthLastChild,
    /// `:has(selector)`
    Has,
    /// `:expr(expression)`
    Expr,
    /// `:val("string")`
    Val,
    /// `:contains("string")`
    Contains,
}

/// A token with its byte span in the source
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    /// The token
    pub token: Token,
    /// Offset of the first byte
    pub start: usize,
    /// Offset one past the last byte
    pub end: usize,
}

/// Read the token starting at `offset`, or `None` at end of input
pub fn next_token(source: &str, offset: usize) -> Result<Option<Lexeme>> {
    let input = &source[offset..];
    if input.is_empty() {
        return Ok(None);
    }
    let lexeme = |token, rest: &str| Lexeme {
        token,
        start: offset,
        end: source.len() - rest.len(),
    };

    if let Ok((rest, token)) = alt((space, punct)).parse(input) {
        return Ok(Some(lexeme(token, rest)));
    }

    if input.starts_with(':') {
        return match pseudo_name(input) {
            Ok((rest, name)) => match pseudo_token(name) {
                Some(token) => Ok(Some(lexeme(token, rest))),
                None => Err(ParseError::at(
                    ErrorKind::UnrecognizedPseudoClass,
                    source,
                    offset,
                )),
            },
            Err(_) => Err(ParseError::at(ErrorKind::UnrecognizedChar, source, offset)),
        };
    }

    let dotted = input.starts_with(".\"");
    if dotted || input.starts_with('"') {
        let quote = offset + usize::from(dotted);
        let (text, end) = lex_string(source, quote)?;
        let token = if dotted {
            Token::Ident(text)
        } else {
            Token::Str(text)
        };
        return Ok(Some(Lexeme {
            token,
            start: offset,
            end,
        }));
    }

    if let Some(after_dot) = input.strip_prefix('.') {
        return match identifier(after_dot) {
            Ok((rest, raw)) => Ok(Some(lexeme(Token::Ident(unescape(raw)), rest))),
            Err(_) => Err(ParseError::at(
                ErrorKind::StringRequiredAfterDot,
                source,
                offset,
            )),
        };
    }

    if let Ok((rest, raw)) = identifier(input) {
        let token = match JsonType::from_name(raw) {
            Some(ty) => Token::Type(ty),
            None => Token::Ident(unescape(raw)),
        };
        return Ok(Some(lexeme(token, rest)));
    }

    Err(ParseError::at(ErrorKind::UnrecognizedChar, source, offset))
}

/// Decode the JSON string whose opening quote is at `quote`.
///
/// Returns the decoded text and the offset just past the closing quote.
pub(crate) fn lex_string(source: &str, quote: usize) -> Result<(String, usize)> {
    let body = &source[quote..];
    let len = string_len(body)
        .ok_or_else(|| ParseError::at(ErrorKind::UnclosedString, source, quote))?;
    let text = serde_json::from_str::<String>(&body[..len])
        .map_err(|_| ParseError::at(ErrorKind::InvalidString, source, quote))?;
    Ok((text, quote + len))
}

/// Byte length of a quoted string including both quotes
fn string_len(input: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in input.char_indices().skip(1) {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            return Some(i + 1);
        }
    }
    None
}

fn space(input: &str) -> IResult<&str, Token> {
    value(Token::Space, multispace1).parse(input)
}

fn punct(input: &str) -> IResult<&str, Token> {
    map(one_of("~*,>()"), Token::Punct).parse(input)
}

fn pseudo_name(input: &str) -> IResult<&str, &str> {
    preceded(
        char(':'),
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-'),
    )
    .parse(input)
}

fn pseudo_token(name: &str) -> Option<Token> {
    let token = match name {
        "root" => Token::PseudoClass(PseudoClassName::Root),
        "first-child" => Token::PseudoClass(PseudoClassName::FirstChild),
        "last-child" => Token::PseudoClass(PseudoClassName::LastChild),
        "only-child" => Token::PseudoClass(PseudoClassName::OnlyChild),
        "nth-child" => Token::PseudoFunction(PseudoFunction::NthChild),
        "nth-last-child" => Token::PseudoFunction(PseudoFunction::NthLastChild),
        "has" => Token::PseudoFunction(PseudoFunction::Has),
        "expr" => Token::PseudoFunction(PseudoFunction::Expr),
        "val" => Token::PseudoFunction(PseudoFunction::Val),
        "contains" => Token::PseudoFunction(PseudoFunction::Contains),
        _ => return None,
    };
    Some(token)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize((ident_start, many0_count(ident_char))).parse(input)
}

fn ident_start(input: &str) -> IResult<&str, &str> {
    alt((
        recognize(satisfy(|c: char| {
            c == '_' || c.is_ascii_alphabetic() || !c.is_ascii()
        })),
        escape,
    ))
    .parse(input)
}

fn ident_char(input: &str) -> IResult<&str, &str> {
    alt((
        recognize(satisfy(|c: char| {
            matches!(c, '_' | '$' | '-') || c.is_ascii_alphanumeric() || !c.is_ascii()
        })),
        escape,
    ))
    .parse(input)
}

fn escape(input: &str) -> IResult<&str, &str> {
    recognize((
        char('\\'),
        satisfy(|c: char| !matches!(c, '\r' | '\n' | '\x0c') && !c.is_ascii_hexdigit()),
    ))
    .parse(input)
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.extend(chars.next());
        } else {
            out.push(c);
        }
    }
    out
}
