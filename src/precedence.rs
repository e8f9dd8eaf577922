//! Operator precedence table shared by the parser and the factory.
//!
//! Tiers are ordered from loosest to tightest binding, so `Ord` on
//! [`Precedence`] compares binding strength directly.

use crate::ast::{Operator, UnaryOperator};

/// Binding strength, loosest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    /// `=`
    Assignment,
    /// `or`
    Or,
    /// `and`
    And,
    /// Prefix `!`
    Not,
    /// `== != < > <= >= =~ !~ in`
    Comparison,
    /// `<< >>`
    Shift,
    /// `+ -`
    Additive,
    /// `* / %`
    Multiplicative,
    /// Prefix `-`
    Negate,
    /// `expr[key]` and primary terms.
    Postfix,
}

impl Precedence {
    /// The next tier up. `Postfix` is already the tightest.
    #[must_use]
    pub const fn tighter(self) -> Self {
        match self {
            Self::Assignment => Self::Or,
            Self::Or => Self::And,
            Self::And => Self::Not,
            Self::Not => Self::Comparison,
            Self::Comparison => Self::Shift,
            Self::Shift => Self::Additive,
            Self::Additive => Self::Multiplicative,
            Self::Multiplicative => Self::Negate,
            Self::Negate | Self::Postfix => Self::Postfix,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
}

impl Operator {
    #[must_use]
    pub const fn precedence(self) -> Precedence {
        match self {
            Self::Or => Precedence::Or,
            Self::And => Precedence::And,
            Self::Equal
            | Self::NotEqual
            | Self::Less
            | Self::Greater
            | Self::LessEqual
            | Self::GreaterEqual
            | Self::Match
            | Self::NotMatch
            | Self::In => Precedence::Comparison,
            Self::ShiftLeft | Self::ShiftRight => Precedence::Shift,
            Self::Plus | Self::Minus => Precedence::Additive,
            Self::Multiply | Self::Divide | Self::Modulo => Precedence::Multiplicative,
        }
    }

    /// Every binary operator groups left to right.
    #[must_use]
    pub const fn associativity(self) -> Associativity {
        Associativity::Left
    }
}

impl UnaryOperator {
    #[must_use]
    pub const fn precedence(self) -> Precedence {
        match self {
            Self::Not => Precedence::Not,
            Self::Negate => Precedence::Negate,
        }
    }
}

/// An infix position: assignment or a binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Infix {
    Assign,
    Binary(Operator),
}

impl Infix {
    #[must_use]
    pub const fn precedence(self) -> Precedence {
        match self {
            Self::Assign => Precedence::Assignment,
            Self::Binary(op) => op.precedence(),
        }
    }

    #[must_use]
    pub const fn associativity(self) -> Associativity {
        match self {
            Self::Assign => Associativity::Right,
            Self::Binary(op) => op.associativity(),
        }
    }

    /// Minimum tier the right operand is parsed at.
    #[must_use]
    pub const fn right_operand_precedence(self) -> Precedence {
        match self.associativity() {
            Associativity::Left => self.precedence().tighter(),
            Associativity::Right => self.precedence(),
        }
    }
}
