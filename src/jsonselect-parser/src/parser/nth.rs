//! The `an+b` argument of `:nth-child` and `:nth-last-child`

use std::num::ParseIntError;

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit0, digit1, multispace0, one_of},
    combinator::{map_res, opt, recognize, value},
    sequence::delimited,
    IResult, Parser,
};

use crate::ast::Nth;
use crate::error::{ErrorKind, ParseError, Result};

/// Parse `( formula )` at `offset`, returning the coefficients and the
/// offset just past the closing paren.
pub(crate) fn parse_nth(source: &str, offset: usize) -> Result<(Nth, usize)> {
    match formula(&source[offset..]) {
        Ok((rest, nth)) => Ok((nth, source.len() - rest.len())),
        Err(_) => Err(ParseError::at(
            ErrorKind::MalformedPseudoFunction,
            source,
            offset,
        )),
    }
}

fn formula(input: &str) -> IResult<&str, Nth> {
    delimited(
        (multispace0, char('('), multispace0),
        alt((step, parity, constant)),
        (multispace0, char(')')),
    )
    .parse(input)
}

/// `odd` / `even`
fn parity(input: &str) -> IResult<&str, Nth> {
    alt((
        value(Nth { a: 2, b: 1 }, tag("odd")),
        value(Nth { a: 2, b: 0 }, tag("even")),
    ))
    .parse(input)
}

type StepParts<'a> = (
    Option<char>,
    &'a str,
    char,
    Option<(&'a str, char, &'a str, &'a str)>,
);

/// `[+-][digits]n[ (+|-) digits]`
fn step(input: &str) -> IResult<&str, Nth> {
    map_res(
        (
            opt(one_of("+-")),
            digit0,
            char('n'),
            opt((multispace0, one_of("+-"), multispace0, digit1)),
        ),
        |(sign, digits, _, tail): StepParts<'_>| -> std::result::Result<Nth, ParseIntError> {
            let a = signed(sign, if digits.is_empty() { "1" } else { digits })?;
            let b = match tail {
                Some((_, sign, _, digits)) => signed(Some(sign), digits)?,
                None => 0,
            };
            Ok(Nth { a, b })
        },
    )
    .parse(input)
}

/// A bare signed integer: `b` with `a = 0`
fn constant(input: &str) -> IResult<&str, Nth> {
    map_res(recognize((opt(one_of("+-")), digit1)), |s: &str| {
        s.parse::<i64>().map(|b| Nth { a: 0, b })
    })
    .parse(input)
}

fn signed(sign: Option<char>, digits: &str) -> std::result::Result<i64, ParseIntError> {
    let magnitude = digits.parse::<i64>()?;
    Ok(if sign == Some('-') {
        -magnitude
    } else {
        magnitude
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nth(arg: &str) -> Option<Nth> {
        parse_nth(arg, 0).ok().map(|(nth, _)| nth)
    }

    #[test]
    fn test_keywords() {
        assert_eq!(nth("(odd)"), Some(Nth { a: 2, b: 1 }));
        assert_eq!(nth("( even )"), Some(Nth { a: 2, b: 0 }));
    }

    #[test]
    fn test_constants() {
        assert_eq!(nth("(3)"), Some(Nth { a: 0, b: 3 }));
        assert_eq!(nth("(-2)"), Some(Nth { a: 0, b: -2 }));
        assert_eq!(nth("(+12)"), Some(Nth { a: 0, b: 12 }));
    }

    #[test]
    fn test_steps() {
        assert_eq!(nth("(2n)"), Some(Nth { a: 2, b: 0 }));
        assert_eq!(nth("(2n+1)"), Some(Nth { a: 2, b: 1 }));
        assert_eq!(nth("( 3n - 2 )"), Some(Nth { a: 3, b: -2 }));
        assert_eq!(nth("(n)"), Some(Nth { a: 1, b: 0 }));
        assert_eq!(nth("(-n+3)"), Some(Nth { a: -1, b: 3 }));
        assert_eq!(nth("(+n+10)"), Some(Nth { a: 1, b: 10 }));
    }

    #[test]
    fn test_negative_step_with_offset() {
        assert_eq!(nth("(-2n+5)"), Some(Nth { a: -2, b: 5 }));
        assert_eq!(nth("( -2n + 5 )"), Some(Nth { a: -2, b: 5 }));
        assert_eq!(nth("(-3n-1)"), Some(Nth { a: -3, b: -1 }));
    }

    #[test]
    fn test_malformed() {
        for arg in ["(xyz)", "()", "(2n+)", "2n", "(2n", "(n n)"] {
            let err = parse_nth(arg, 0).unwrap_err();
            assert_eq!(err.kind, ErrorKind::MalformedPseudoFunction, "{}", arg);
        }
    }

    #[test]
    fn test_end_offset() {
        let source = ":nth-child(2n+1) .a";
        let (_, end) = parse_nth(source, 10).unwrap();
        assert_eq!(&source[end..], " .a");
    }
}
