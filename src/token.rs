use std::fmt;

use crate::ast::Radix;

/// Source location for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Reserved words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    True,
    False,
    Undef,
    And,
    Or,
    In,
}

impl Keyword {
    /// Look up a bare word in the keyword list.
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "true" => Some(Self::True),
            "false" => Some(Self::False),
            "undef" => Some(Self::Undef),
            "and" => Some(Self::And),
            "or" => Some(Self::Or),
            "in" => Some(Self::In),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::True => "true",
            Self::False => "false",
            Self::Undef => "undef",
            Self::And => "and",
            Self::Or => "or",
            Self::In => "in",
        }
    }
}

/// Operators and delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Punct {
    /// `=`
    Assign,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    LtEq,
    /// `>=`
    GtEq,
    /// `=~`
    Match,
    /// `!~`
    NoMatch,
    /// `!`
    Bang,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    /// `=>`
    FatArrow,
}

impl Punct {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::EqEq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
            Self::Match => "=~",
            Self::NoMatch => "!~",
            Self::Bang => "!",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::Comma => ",",
            Self::FatArrow => "=>",
        }
    }
}

/// One piece of a double-quoted string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringPart {
    /// Literal text with escapes already resolved.
    Text(String),
    /// `$name` or `${ ... }`, lexed into its own token stream.
    Interpolated { tokens: Vec<Token>, span: Span },
}

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Integer literal; `text` keeps the original spelling.
    Integer(Radix),
    /// Float literal; `text` keeps the original spelling.
    Float,
    /// Single-quoted string (`'...'`).
    SingleQuoted,
    /// Double-quoted string (`"..."`), split at interpolation markers.
    DoubleQuoted(Vec<StringPart>),
    /// Regex literal (`/.../`); `text` is the pattern.
    Regex,
    /// Bare word.
    Name,
    /// `$name`; `text` is the name without the sigil.
    Variable,
    Keyword(Keyword),
    Punct(Punct),
}

impl TokenKind {
    /// Whether a token of this kind can be the last token of an operand.
    /// A `/` following such a token is division, otherwise a regex.
    #[must_use]
    pub const fn ends_operand(&self) -> bool {
        match self {
            Self::Integer(_)
            | Self::Float
            | Self::SingleQuoted
            | Self::DoubleQuoted(_)
            | Self::Regex
            | Self::Name
            | Self::Variable
            | Self::Keyword(Keyword::True | Keyword::False | Keyword::Undef)
            | Self::Punct(Punct::RParen | Punct::RBracket | Punct::RBrace) => true,
            Self::Keyword(_) | Self::Punct(_) => false,
        }
    }
}

/// A single token with its kind, text, and source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}
