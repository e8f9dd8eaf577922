//! Syntax tree for expressions and assignments.
//!
//! Trees are built either by the parser or through the factory methods in
//! [`crate::factory`]; both produce the same shapes for equivalent input.

use std::num::ParseIntError;

/// A parsed or factory-built expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Integer(IntegerLiteral),
    Float(FloatLiteral),
    Str(StringLiteral),
    Bool(bool),
    /// The "no value" literal, `undef`.
    Undef,
    /// Regex pattern; only valid as the right operand of `=~` or `!~`.
    Regex(String),
    /// `$name`, stored without the sigil.
    Variable(String),
    /// Bare word such as `b` in `$h[b]`.
    Name(String),
    Array(Vec<Self>),
    Hash(Vec<KeyedEntry>),
    Unary {
        op: UnaryOperator,
        operand: Box<Self>,
    },
    Binary {
        op: Operator,
        left: Box<Self>,
        right: Box<Self>,
    },
    /// `target = value`; chains nest to the right.
    Assign {
        target: Box<Self>,
        value: Box<Self>,
    },
    /// `target[key]`.
    Access {
        target: Box<Self>,
        key: Box<Self>,
    },
    /// Interpolated double-quoted string. Segments alternate text and
    /// expression, starting and ending with text.
    Concat(Vec<Segment>),
}

/// Number base of an integer literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Radix {
    Decimal,
    /// `0x` / `0X` prefix.
    Hex,
    /// Leading `0`.
    Octal,
}

impl Radix {
    #[must_use]
    pub const fn base(self) -> u32 {
        match self {
            Self::Decimal => 10,
            Self::Hex => 16,
            Self::Octal => 8,
        }
    }

    /// Radix implied by a literal's spelling: a `0x`/`0X` prefix is hex,
    /// any other leading `0` followed by more digits is octal.
    #[must_use]
    pub fn of_literal(text: &str) -> Self {
        if text.starts_with("0x") || text.starts_with("0X") {
            Self::Hex
        } else if text.len() > 1 && text.starts_with('0') {
            Self::Octal
        } else {
            Self::Decimal
        }
    }

    /// Spell a non-negative value in this radix, prefix included.
    #[must_use]
    pub fn spell(self, value: i64) -> String {
        match self {
            Self::Decimal => value.to_string(),
            Self::Hex => format!("0x{value:X}"),
            Self::Octal => format!("0{value:o}"),
        }
    }

    /// Whether `text` is made only of digits valid for this radix, with
    /// the prefix and at least one digit.
    #[must_use]
    pub fn is_spelling(self, text: &str) -> bool {
        let digits = match self {
            Self::Decimal => text,
            Self::Hex => text.get(2..).unwrap_or_default(),
            Self::Octal => text.get(1..).unwrap_or_default(),
        };
        !digits.is_empty() && digits.chars().all(|c| c.is_digit(self.base()))
    }

    /// Parse the value of a literal spelled in this radix, prefix included.
    pub fn parse_value(self, text: &str) -> Result<i64, ParseIntError> {
        let digits = match self {
            Self::Decimal => text,
            Self::Hex => text.get(2..).unwrap_or_default(),
            Self::Octal => text.get(1..).unwrap_or_default(),
        };
        i64::from_str_radix(digits, self.base())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegerLiteral {
    pub value: i64,
    /// Lexical form as written, e.g. `0xAB` or `0777`.
    pub text: String,
    pub radix: Radix,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloatLiteral {
    pub value: f64,
    /// Lexical form as written, e.g. `2.0` or `1e3`.
    pub text: String,
}

/// Quote character a string literal was written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quote {
    Single,
    Double,
}

impl Quote {
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Single => '\'',
            Self::Double => '"',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLiteral {
    pub value: String,
    pub quote: Quote,
}

impl StringLiteral {
    /// Single-quoted strings never interpolate.
    #[must_use]
    pub const fn is_interpolatable(&self) -> bool {
        matches!(self.quote, Quote::Double)
    }
}

/// One `key => value` pair of a hash literal.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedEntry {
    pub key: Expr,
    pub value: Expr,
}

/// Piece of a [`Expr::Concat`].
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Text(String),
    Expr(Expr),
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    /// `-x`
    Negate,
    /// `!x`
    Not,
}

/// Binary infix operators. Precedence and associativity live in
/// [`crate::precedence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    ShiftLeft,
    ShiftRight,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    /// `=~`
    Match,
    /// `!~`
    NotMatch,
    /// `and`
    And,
    /// `or`
    Or,
    /// `in`
    In,
}

impl Operator {
    pub const ALL: [Self; 18] = [
        Self::Plus,
        Self::Minus,
        Self::Multiply,
        Self::Divide,
        Self::Modulo,
        Self::ShiftLeft,
        Self::ShiftRight,
        Self::Equal,
        Self::NotEqual,
        Self::Less,
        Self::Greater,
        Self::LessEqual,
        Self::GreaterEqual,
        Self::Match,
        Self::NotMatch,
        Self::And,
        Self::Or,
        Self::In,
    ];

    /// Spelling in source text.
    #[must_use]
    pub const fn source_text(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::Match => "=~",
            Self::NotMatch => "!~",
            Self::And => "and",
            Self::Or => "or",
            Self::In => "in",
        }
    }

    /// Symbol used in the canonical dump.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::And => "&&",
            Self::Or => "||",
            other => other.source_text(),
        }
    }

    /// Whether a regex literal may appear as the right operand.
    #[must_use]
    pub const fn accepts_regex(self) -> bool {
        matches!(self, Self::Match | Self::NotMatch)
    }
}

impl UnaryOperator {
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Negate => "-",
            Self::Not => "!",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radix_values() {
        assert_eq!(Radix::Decimal.parse_value("42"), Ok(42));
        assert_eq!(Radix::Hex.parse_value("0xAB"), Ok(0xAB));
        assert_eq!(Radix::Octal.parse_value("0777"), Ok(0o777));
        assert!(Radix::Decimal.parse_value("99999999999999999999").is_err());
    }

    #[test]
    fn dump_symbols() {
        assert_eq!(Operator::And.symbol(), "&&");
        assert_eq!(Operator::Or.symbol(), "||");
        assert_eq!(Operator::In.symbol(), "in");
        assert_eq!(Operator::ShiftLeft.symbol(), "<<");
    }

    #[test]
    fn only_double_quotes_interpolate() {
        let single = StringLiteral {
            value: "$x".to_string(),
            quote: Quote::Single,
        };
        let double = StringLiteral {
            value: "x".to_string(),
            quote: Quote::Double,
        };
        assert!(!single.is_interpolatable());
        assert!(double.is_interpolatable());
    }
}
