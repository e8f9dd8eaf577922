//! Programmatic tree building.
//!
//! Every combinator places its new node at the root over exactly the
//! operands it is given; nest the tighter-binding combination first to get
//! the tree the parser would produce. [`Sequence`] instead takes a flat
//! operand/operator list and applies the precedence table itself.
//!
//! ```
//! use egrammar::{Expr, dump};
//!
//! let x = Expr::integer(2).times(Expr::integer(10)).plus(Expr::integer(20));
//! assert_eq!(dump(&x), "(+ (* 2 10) 20)");
//! ```

use std::iter::Peekable;

use crate::ast::{
    Expr, FloatLiteral, IntegerLiteral, KeyedEntry, Operator, Quote, Radix, Segment,
    StringLiteral, UnaryOperator,
};
use crate::precedence::{Infix, Precedence};

impl Expr {
    /// Decimal integer. A negative value is a negation over its magnitude,
    /// the tree the parser builds for `-5`.
    #[must_use]
    pub fn integer(value: i64) -> Self {
        Self::signed(value, Radix::Decimal)
    }

    /// Integer spelled in hexadecimal (`0xAB`); negatives as for
    /// [`Expr::integer`].
    #[must_use]
    pub fn hex(value: i64) -> Self {
        Self::signed(value, Radix::Hex)
    }

    /// Integer spelled in octal (`0777`); negatives as for [`Expr::integer`].
    #[must_use]
    pub fn octal(value: i64) -> Self {
        Self::signed(value, Radix::Octal)
    }

    /// Integer literal keeping the given spelling, e.g. `0xab` or `007`.
    /// `None` unless `text` would lex as a single integer token.
    #[must_use]
    pub fn integer_text(text: &str) -> Option<Self> {
        let radix = Radix::of_literal(text);
        if !radix.is_spelling(text) {
            return None;
        }
        let value = radix.parse_value(text).ok()?;
        Some(Self::Integer(IntegerLiteral {
            value,
            text: text.to_string(),
            radix,
        }))
    }

    fn signed(value: i64, radix: Radix) -> Self {
        match value {
            // no literal spells the magnitude of i64::MIN
            i64::MIN => Self::spelled(i64::MAX, radix)
                .negated()
                .minus(Self::spelled(1, radix)),
            v if v < 0 => Self::spelled(-v, radix).negated(),
            v => Self::spelled(v, radix),
        }
    }

    fn spelled(value: i64, radix: Radix) -> Self {
        Self::Integer(IntegerLiteral {
            value,
            text: radix.spell(value),
            radix,
        })
    }

    /// Float literal. Whole numbers keep a `.0` so they read as floats, and
    /// negative values are a negation over the magnitude. `None` for NaN
    /// and the infinities, which have no literal spelling.
    #[must_use]
    pub fn float(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let magnitude = value.abs();
        let mut text = magnitude.to_string();
        if !text.contains(['.', 'e', 'E']) {
            text.push_str(".0");
        }
        let literal = Self::Float(FloatLiteral {
            value: magnitude,
            text,
        });
        Some(if value.is_sign_negative() {
            literal.negated()
        } else {
            literal
        })
    }

    /// Single-quoted string literal.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Str(StringLiteral {
            value: value.into(),
            quote: Quote::Single,
        })
    }

    /// Double-quoted string literal with no interpolation.
    #[must_use]
    pub fn double_quoted(value: impl Into<String>) -> Self {
        Self::Str(StringLiteral {
            value: value.into(),
            quote: Quote::Double,
        })
    }

    #[must_use]
    pub const fn boolean(value: bool) -> Self {
        Self::Bool(value)
    }

    #[must_use]
    pub const fn undef() -> Self {
        Self::Undef
    }

    /// `$name`; pass the name without the sigil.
    #[must_use]
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    /// Bare word.
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    #[must_use]
    pub fn array(elements: impl IntoIterator<Item = Self>) -> Self {
        Self::Array(elements.into_iter().collect())
    }

    /// Hash literal from `(key, value)` pairs, in order.
    #[must_use]
    pub fn hash(entries: impl IntoIterator<Item = (Self, Self)>) -> Self {
        Self::Hash(
            entries
                .into_iter()
                .map(|(key, value)| KeyedEntry { key, value })
                .collect(),
        )
    }

    #[must_use]
    pub fn unary(op: UnaryOperator, operand: Self) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// `-self`
    #[must_use]
    pub fn negated(self) -> Self {
        Self::unary(UnaryOperator::Negate, self)
    }

    /// `!self`
    #[must_use]
    pub fn logical_not(self) -> Self {
        Self::unary(UnaryOperator::Not, self)
    }

    /// `self op rhs`
    #[must_use]
    pub fn binary(self, op: Operator, rhs: Self) -> Self {
        Self::Binary {
            op,
            left: Box::new(self),
            right: Box::new(rhs),
        }
    }

    #[must_use]
    pub fn plus(self, rhs: Self) -> Self {
        self.binary(Operator::Plus, rhs)
    }

    #[must_use]
    pub fn minus(self, rhs: Self) -> Self {
        self.binary(Operator::Minus, rhs)
    }

    #[must_use]
    pub fn times(self, rhs: Self) -> Self {
        self.binary(Operator::Multiply, rhs)
    }

    #[must_use]
    pub fn divided_by(self, rhs: Self) -> Self {
        self.binary(Operator::Divide, rhs)
    }

    #[must_use]
    pub fn modulo(self, rhs: Self) -> Self {
        self.binary(Operator::Modulo, rhs)
    }

    #[must_use]
    pub fn shift_left(self, rhs: Self) -> Self {
        self.binary(Operator::ShiftLeft, rhs)
    }

    #[must_use]
    pub fn shift_right(self, rhs: Self) -> Self {
        self.binary(Operator::ShiftRight, rhs)
    }

    #[must_use]
    pub fn equal_to(self, rhs: Self) -> Self {
        self.binary(Operator::Equal, rhs)
    }

    #[must_use]
    pub fn not_equal_to(self, rhs: Self) -> Self {
        self.binary(Operator::NotEqual, rhs)
    }

    #[must_use]
    pub fn less_than(self, rhs: Self) -> Self {
        self.binary(Operator::Less, rhs)
    }

    #[must_use]
    pub fn greater_than(self, rhs: Self) -> Self {
        self.binary(Operator::Greater, rhs)
    }

    #[must_use]
    pub fn less_or_equal(self, rhs: Self) -> Self {
        self.binary(Operator::LessEqual, rhs)
    }

    #[must_use]
    pub fn greater_or_equal(self, rhs: Self) -> Self {
        self.binary(Operator::GreaterEqual, rhs)
    }

    /// `self =~ rhs` with a non-regex pattern operand.
    #[must_use]
    pub fn matches(self, rhs: Self) -> Self {
        self.binary(Operator::Match, rhs)
    }

    /// `self !~ rhs` with a non-regex pattern operand.
    #[must_use]
    pub fn not_matches(self, rhs: Self) -> Self {
        self.binary(Operator::NotMatch, rhs)
    }

    /// `self =~ /pattern/`. Regex literals can only be built this way.
    #[must_use]
    pub fn matches_regex(self, pattern: impl Into<String>) -> Self {
        self.binary(Operator::Match, Self::Regex(pattern.into()))
    }

    /// `self !~ /pattern/`
    #[must_use]
    pub fn not_matches_regex(self, pattern: impl Into<String>) -> Self {
        self.binary(Operator::NotMatch, Self::Regex(pattern.into()))
    }

    /// `self and rhs`
    #[must_use]
    pub fn and(self, rhs: Self) -> Self {
        self.binary(Operator::And, rhs)
    }

    /// `self or rhs`
    #[must_use]
    pub fn or(self, rhs: Self) -> Self {
        self.binary(Operator::Or, rhs)
    }

    /// `self in collection`
    #[must_use]
    pub fn within(self, collection: Self) -> Self {
        self.binary(Operator::In, collection)
    }

    /// `self[key]`
    #[must_use]
    pub fn access(self, key: Self) -> Self {
        Self::Access {
            target: Box::new(self),
            key: Box::new(key),
        }
    }

    /// `self = value`
    #[must_use]
    pub fn assign(self, value: Self) -> Self {
        Self::Assign {
            target: Box::new(self),
            value: Box::new(value),
        }
    }

    /// Start an interpolated string.
    #[must_use]
    pub const fn interpolate() -> Interpolation {
        Interpolation::new()
    }
}

impl Infix {
    /// Build the node for `left <infix> right`.
    #[must_use]
    pub fn combine(self, left: Expr, right: Expr) -> Expr {
        match self {
            Self::Assign => left.assign(right),
            Self::Binary(op) => left.binary(op, right),
        }
    }
}

/// Builder for [`Expr::Concat`].
///
/// Adjacent text is merged and empty text is inserted where needed, so
/// the result always alternates text and expression segments and starts
/// and ends with text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interpolation {
    segments: Vec<Segment>,
    text: String,
}

impl Interpolation {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
            text: String::new(),
        }
    }

    /// Append literal text.
    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.text.push_str(text);
        self
    }

    /// Append an embedded expression.
    #[must_use]
    pub fn expr(mut self, expr: Expr) -> Self {
        self.segments
            .push(Segment::Text(std::mem::take(&mut self.text)));
        self.segments.push(Segment::Expr(expr));
        self
    }

    /// Finish the string. Without any embedded expression this is a plain
    /// double-quoted string literal.
    #[must_use]
    pub fn build(mut self) -> Expr {
        if self.segments.is_empty() {
            return Expr::double_quoted(self.text);
        }
        self.segments.push(Segment::Text(self.text));
        Expr::Concat(self.segments)
    }
}

/// Flat `operand (operator operand)*` list reduced with the precedence
/// table, so the resulting tree does not depend on call order.
///
/// ```
/// use egrammar::{Expr, Operator, Sequence, dump};
///
/// let x = Sequence::new(Expr::integer(1))
///     .then(Operator::Plus, Expr::integer(2))
///     .then(Operator::Multiply, Expr::integer(3))
///     .reduce();
/// assert_eq!(dump(&x), "(+ 1 (* 2 3))");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    first: Expr,
    rest: Vec<(Infix, Expr)>,
}

impl Sequence {
    #[must_use]
    pub const fn new(first: Expr) -> Self {
        Self {
            first,
            rest: Vec::new(),
        }
    }

    /// Append a binary operator and its right operand.
    #[must_use]
    pub fn then(mut self, op: Operator, operand: Expr) -> Self {
        self.rest.push((Infix::Binary(op), operand));
        self
    }

    /// Append `= operand`.
    #[must_use]
    pub fn assign(mut self, operand: Expr) -> Self {
        self.rest.push((Infix::Assign, operand));
        self
    }

    /// Apply precedence and associativity and return the tree.
    #[must_use]
    pub fn reduce(self) -> Expr {
        let mut rest = self.rest.into_iter().peekable();
        climb(self.first, &mut rest, Precedence::Assignment)
    }
}

fn climb<I>(first: Expr, rest: &mut Peekable<I>, min: Precedence) -> Expr
where
    I: Iterator<Item = (Infix, Expr)>,
{
    let mut left = first;
    while let Some((infix, operand)) = rest.next_if(|(infix, _)| infix.precedence() >= min) {
        let right = climb(operand, rest, infix.right_operand_precedence());
        left = infix.combine(left, right);
    }
    left
}
