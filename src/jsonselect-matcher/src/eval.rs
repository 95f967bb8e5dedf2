//! Evaluator for `:expr(...)` trees
//!
//! An expression is reduced with the placeholder `x` bound to the node under
//! test. Type mismatches never fail: arithmetic on non-numbers yields `null`
//! and comparisons between mismatched types yield `false`, so a predicate
//! only ever excludes the node it was evaluated against.

use std::cmp::Ordering;

use jsonselect_parser::{BinaryOperator, Expr, Literal};
use serde_json::Value;

/// A value produced while evaluating an expression
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand<'a> {
    /// `null`, also the result of invalid arithmetic
    Null,
    /// A boolean
    Bool(bool),
    /// Any number
    Number(f64),
    /// A string, borrowed from the expression or the document
    Str(&'a str),
    /// An array or object bound to `x`
    Node(&'a Value),
}

impl<'a> Operand<'a> {
    /// Bind a document value.
    ///
    /// Numbers are widened to `f64`, so integers beyond 2^53 lose precision.
    pub fn from_value(value: &'a Value) -> Self {
        match value {
            Value::Null => Operand::Null,
            Value::Bool(b) => Operand::Bool(*b),
            Value::Number(n) => n.as_f64().map_or(Operand::Null, Operand::Number),
            Value::String(s) => Operand::Str(s),
            Value::Array(_) | Value::Object(_) => Operand::Node(value),
        }
    }

    fn from_literal(literal: &'a Literal) -> Self {
        match literal {
            Literal::Null => Operand::Null,
            Literal::Bool(b) => Operand::Bool(*b),
            Literal::Number(n) => Operand::Number(*n),
            Literal::String(s) => Operand::Str(s),
        }
    }

    /// Boolean reading of the operand.
    ///
    /// `null`, `false`, zero, NaN and the empty string are false.
    pub fn is_truthy(&self) -> bool {
        match *self {
            Operand::Null => false,
            Operand::Bool(b) => b,
            Operand::Number(n) => n != 0.0 && !n.is_nan(),
            Operand::Str(s) => !s.is_empty(),
            Operand::Node(_) => true,
        }
    }

    /// Value-and-type equality; numbers compare numerically
    fn same(&self, other: &Operand<'_>) -> bool {
        match (*self, *other) {
            (Operand::Null, Operand::Null) => true,
            (Operand::Bool(a), Operand::Bool(b)) => a == b,
            (Operand::Number(a), Operand::Number(b)) => a == b,
            (Operand::Str(a), Operand::Str(b)) => a == b,
            (Operand::Node(a), Operand::Node(b)) => a == b,
            _ => false,
        }
    }

    fn order(&self, other: &Operand<'_>) -> Option<Ordering> {
        match (*self, *other) {
            (Operand::Number(a), Operand::Number(b)) => a.partial_cmp(&b),
            (Operand::Str(a), Operand::Str(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Expression evaluator.
///
/// Keeps a count of the nodes it has reduced, which the matcher reports in
/// its statistics.
#[derive(Debug, Default)]
pub struct Evaluator {
    evaluated: usize,
}

impl Evaluator {
    /// Create a new evaluator
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of expression nodes reduced so far
    pub fn evaluated(&self) -> usize {
        self.evaluated
    }

    /// Whether `expr` is truthy with `x` bound to `value`
    pub fn matches(&mut self, expr: &Expr, value: &Value) -> bool {
        self.evaluate(expr, value).is_truthy()
    }

    /// Reduce `expr` with `x` bound to `value`
    pub fn evaluate<'a>(&mut self, expr: &'a Expr, value: &'a Value) -> Operand<'a> {
        self.evaluated += 1;
        match expr {
            Expr::Literal(literal) => Operand::from_literal(literal),
            Expr::Placeholder => Operand::from_value(value),
            Expr::Binary { op, lhs, rhs } => {
                // both sides are always reduced, && and || included
                let lhs = self.evaluate(lhs, value);
                let rhs = self.evaluate(rhs, value);
                apply(*op, lhs, rhs)
            }
        }
    }
}

/// Evaluate a standalone expression against `value`
pub fn evaluate<'a>(expr: &'a Expr, value: &'a Value) -> Operand<'a> {
    Evaluator::new().evaluate(expr, value)
}

fn apply<'a>(op: BinaryOperator, lhs: Operand<'a>, rhs: Operand<'a>) -> Operand<'a> {
    use BinaryOperator as Op;

    match op {
        Op::Mul | Op::Div | Op::Rem | Op::Add | Op::Sub => arithmetic(op, lhs, rhs),
        Op::Lt | Op::Le | Op::Gt | Op::Ge => {
            Operand::Bool(lhs.order(&rhs).is_some_and(|ord| match op {
                Op::Lt => ord.is_lt(),
                Op::Le => ord.is_le(),
                Op::Gt => ord.is_gt(),
                _ => ord.is_ge(),
            }))
        }
        Op::EndsWith | Op::StartsWith | Op::Contains => Operand::Bool(match (lhs, rhs) {
            (Operand::Str(haystack), Operand::Str(needle)) => match op {
                Op::EndsWith => haystack.ends_with(needle),
                Op::StartsWith => haystack.starts_with(needle),
                _ => haystack.contains(needle),
            },
            _ => false,
        }),
        Op::Eq => Operand::Bool(lhs.same(&rhs)),
        Op::Ne => Operand::Bool(!lhs.same(&rhs)),
        Op::And => Operand::Bool(lhs.is_truthy() && rhs.is_truthy()),
        Op::Or => Operand::Bool(lhs.is_truthy() || rhs.is_truthy()),
    }
}

fn arithmetic<'a>(op: BinaryOperator, lhs: Operand<'a>, rhs: Operand<'a>) -> Operand<'a> {
    let (Operand::Number(a), Operand::Number(b)) = (lhs, rhs) else {
        return Operand::Null;
    };
    let result = match op {
        BinaryOperator::Mul => a * b,
        BinaryOperator::Add => a + b,
        BinaryOperator::Sub => a - b,
        BinaryOperator::Div | BinaryOperator::Rem if b == 0.0 => return Operand::Null,
        BinaryOperator::Div => a / b,
        _ => a % b,
    };
    Operand::Number(result)
}
