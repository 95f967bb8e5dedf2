//! Abstract Syntax Tree (AST) definitions for JSONSelect selectors
//!
//! A parsed selector is a [`Union`] of [`Group`]s. Each group is a flat,
//! source-ordered list of [`Segment`]s: fragments interleaved with the child
//! and sibling markers that joined them. Two adjacent fragments with no marker
//! between them are joined by the implicit descendant combinator.
//!
//! Once built, the tree is immutable and can be shared across any number of
//! matches.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// A complete, normalized selector ready for matching
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selector {
    /// The alternatives of the selector list
    pub union: Union,
}

/// Comma-separated alternatives, in source order
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Union(pub Vec<Group>);

/// A single fragment sequence, in source order
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Group(pub Vec<Segment>);

/// One element of a [`Group`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Segment {
    /// Constraints tested against a single node
    Fragment(Fragment),
    /// Child combinator (`>`): the next fragment must match an immediate child
    Child,
    /// Sibling combinator (`~`); removed by normalization
    Sibling,
}

/// Constraints tested against one node
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Fragment {
    /// Required JSON type (`string`, `object`, ...)
    pub ty: Option<JsonType>,
    /// Required key in the parent object (`.name` or `."name"`)
    pub id: Option<String>,
    /// Structural pseudo-class (`:root`, `:nth-child(...)`, ...)
    pub pseudo: Option<PseudoClass>,
    /// Containment tests (`:has(...)`); every one must find a match
    pub has: Vec<Union>,
    /// Value predicate (`:expr(...)`, `:val(...)`, `:contains(...)`)
    pub expr: Option<Expr>,
}

/// The JSON type names usable as type constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    /// `string`
    String,
    /// `boolean`
    Boolean,
    /// `null`
    Null,
    /// `array`
    Array,
    /// `object`
    Object,
    /// `number`
    Number,
}

/// Structural pseudo-classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PseudoClass {
    /// `:root`: the root of the current traversal
    Root,
    /// `:only-child`: the single element of an array
    OnlyChild,
    /// `:nth-child(an+b)`, counted from the first element
    NthChild(Nth),
    /// `:nth-last-child(an+b)`, counted from the last element
    NthLastChild(Nth),
}

/// Coefficients of an `an+b` position formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Nth {
    /// Step, may be zero or negative
    pub a: i64,
    /// Offset
    pub b: i64,
}

/// Value expression attached to a fragment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    /// Constant value
    Literal(Literal),
    /// The placeholder `x`, bound to the node under test
    Placeholder,
    /// Binary operation (lhs op rhs)
    Binary {
        /// Operator
        op: BinaryOperator,
        /// Left operand
        lhs: Box<Expr>,
        /// Right operand
        rhs: Box<Expr>,
    },
}

/// Literal values of the expression language
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Literal {
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Any JSON number
    Number(f64),
    /// Double-quoted JSON string
    String(String),
}

/// Binary operators of the expression language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOperator {
    /// Multiplication (*)
    Mul,
    /// Division (/)
    Div,
    /// Remainder (%)
    Rem,
    /// Addition (+)
    Add,
    /// Subtraction (-)
    Sub,
    /// Less than or equal (<=)
    Le,
    /// Greater than or equal (>=)
    Ge,
    /// String suffix test ($=)
    EndsWith,
    /// String prefix test (^=)
    StartsWith,
    /// Substring test (*=)
    Contains,
    /// Greater than (>)
    Gt,
    /// Less than (<)
    Lt,
    /// Equal (=)
    Eq,
    /// Not equal (!=)
    Ne,
    /// Logical AND (&&)
    And,
    /// Logical OR (||)
    Or,
}

impl Selector {
    /// Wrap an already normalized union
    pub fn new(union: Union) -> Self {
        Self { union }
    }
}

impl Union {
    /// Whether any group still contains a sibling marker
    pub fn uses_sibling(&self) -> bool {
        self.0.iter().any(Group::uses_sibling)
    }
}

impl Group {
    /// Whether this group contains a sibling marker
    pub fn uses_sibling(&self) -> bool {
        self.0.iter().any(|s| matches!(s, Segment::Sibling))
    }

    /// Whether the group starts with a `:root` fragment
    pub fn starts_at_root(&self) -> bool {
        matches!(self.0.first(), Some(Segment::Fragment(f)) if f.is_root())
    }
}

impl Fragment {
    /// A bare `:root` fragment
    pub fn root() -> Self {
        Self {
            pseudo: Some(PseudoClass::Root),
            ..Self::default()
        }
    }

    /// Whether this fragment is pinned to the traversal root
    pub fn is_root(&self) -> bool {
        matches!(self.pseudo, Some(PseudoClass::Root))
    }

    fn is_universal(&self) -> bool {
        self.ty.is_none()
            && self.id.is_none()
            && self.pseudo.is_none()
            && self.has.is_empty()
            && self.expr.is_none()
    }
}

impl JsonType {
    /// The type of a decoded JSON value
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => JsonType::Null,
            Value::Bool(_) => JsonType::Boolean,
            Value::Number(_) => JsonType::Number,
            Value::String(_) => JsonType::String,
            Value::Array(_) => JsonType::Array,
            Value::Object(_) => JsonType::Object,
        }
    }

    /// Look up a reserved type name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(JsonType::String),
            "boolean" => Some(JsonType::Boolean),
            "null" => Some(JsonType::Null),
            "array" => Some(JsonType::Array),
            "object" => Some(JsonType::Object),
            "number" => Some(JsonType::Number),
            _ => None,
        }
    }

    /// The selector spelling of this type
    pub fn name(self) -> &'static str {
        match self {
            JsonType::String => "string",
            JsonType::Boolean => "boolean",
            JsonType::Null => "null",
            JsonType::Array => "array",
            JsonType::Object => "object",
            JsonType::Number => "number",
        }
    }
}

impl Nth {
    /// `:first-child` / `:last-child`
    pub const FIRST: Nth = Nth { a: 0, b: 1 };

    /// Test a 1-based position against the formula.
    ///
    /// With `a != 0` the sign condition is `num * a + b >= 0`, not the
    /// textbook `(num - b) / a >= 0`.
    pub fn matches(self, num: i64) -> bool {
        let (num, a, b) = (i128::from(num), i128::from(self.a), i128::from(self.b));
        if a == 0 {
            num == b
        } else {
            (num - b) % a == 0 && num * a + b >= 0
        }
    }
}

impl BinaryOperator {
    /// Binding strength; higher binds tighter
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Rem => 9,
            BinaryOperator::Add | BinaryOperator::Sub => 7,
            BinaryOperator::Le
            | BinaryOperator::Ge
            | BinaryOperator::EndsWith
            | BinaryOperator::StartsWith
            | BinaryOperator::Contains
            | BinaryOperator::Gt
            | BinaryOperator::Lt => 5,
            BinaryOperator::Eq | BinaryOperator::Ne => 3,
            BinaryOperator::And => 2,
            BinaryOperator::Or => 1,
        }
    }

    /// Source spelling of the operator
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Rem => "%",
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Le => "<=",
            BinaryOperator::Ge => ">=",
            BinaryOperator::EndsWith => "$=",
            BinaryOperator::StartsWith => "^=",
            BinaryOperator::Contains => "*=",
            BinaryOperator::Gt => ">",
            BinaryOperator::Lt => "<",
            BinaryOperator::Eq => "=",
            BinaryOperator::Ne => "!=",
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
        }
    }
}

impl Expr {
    /// Build a binary node
    pub fn binary(op: BinaryOperator, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }
}

// Display renders selector text that parses back to the same tree.

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.union.fmt(f)
    }
}

impl fmt::Display for Union {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, group) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            group.fmt(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match segment {
                Segment::Fragment(fragment) => fragment.fmt(f)?,
                Segment::Child => f.write_str(">")?,
                Segment::Sibling => f.write_str("~")?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_universal() {
            return f.write_str("*");
        }
        if let Some(ty) = self.ty {
            f.write_str(ty.name())?;
        }
        if let Some(id) = &self.id {
            if is_plain_identifier(id) {
                write!(f, ".{id}")?;
            } else {
                write!(f, ".{}", Value::String(id.clone()))?;
            }
        }
        match self.pseudo {
            Some(PseudoClass::Root) => f.write_str(":root")?,
            Some(PseudoClass::OnlyChild) => f.write_str(":only-child")?,
            Some(PseudoClass::NthChild(nth)) => write!(f, ":nth-child({nth})")?,
            Some(PseudoClass::NthLastChild(nth)) => write!(f, ":nth-last-child({nth})")?,
            None => {}
        }
        for union in &self.has {
            write!(f, ":has({union})")?;
        }
        if let Some(expr) = &self.expr {
            write!(f, ":expr({expr})")?;
        }
        Ok(())
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Nth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 0 {
            write!(f, "{}", self.b)
        } else if self.b < 0 {
            write!(f, "{}n-{}", self.a, -self.b)
        } else {
            write!(f, "{}n+{}", self.a, self.b)
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(literal) => literal.fmt(f),
            Expr::Placeholder => f.write_str("x"),
            Expr::Binary { op, lhs, rhs } => write!(f, "({lhs} {} {rhs})", op.symbol()),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => f.write_str("null"),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Number(n) => write!(f, "{n}"),
            Literal::String(s) => write!(f, "{}", Value::String(s.clone())),
        }
    }
}

fn is_plain_identifier(id: &str) -> bool {
    let mut chars = id.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() || !c.is_ascii() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c == '$' || c == '-' || c.is_ascii_alphanumeric() || !c.is_ascii())
}
