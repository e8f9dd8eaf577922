use std::fmt;

use crate::MAX_NESTING;
use crate::ast::{Expr, FloatLiteral, IntegerLiteral, KeyedEntry, Operator, UnaryOperator};
use crate::factory::Interpolation;
use crate::lexer::{LexError, LexErrorKind};
use crate::precedence::{Infix, Precedence};
use crate::token::{Keyword, Punct, Span, StringPart, Token, TokenKind};

/// Classifies a parser error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Error raised while tokenizing.
    Lex(LexErrorKind),
    /// A token that does not fit the grammar at this point.
    UnexpectedToken {
        expected: &'static str,
        found: String,
    },
    /// Input ended in the middle of a construct.
    UnexpectedEof { expected: &'static str },
    /// Regex literal outside the right operand of `=~` / `!~`.
    RegexNotAllowed,
    /// Numeric literal whose value cannot be represented.
    InvalidNumber(String),
    /// Sub-expressions nested deeper than [`MAX_NESTING`].
    NestingTooDeep,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex(kind) => write!(f, "{kind}"),
            Self::UnexpectedToken { expected, found } => {
                write!(f, "expected {expected}, got '{found}'")
            }
            Self::UnexpectedEof { expected } => {
                write!(f, "expected {expected}, got end of input")
            }
            Self::RegexNotAllowed => write!(
                f,
                "regular expression is only allowed as the right operand of '=~' or '!~'"
            ),
            Self::InvalidNumber(text) => write!(f, "invalid numeric literal: {text}"),
            Self::NestingTooDeep => {
                write!(f, "expression nested deeper than {MAX_NESTING} levels")
            }
        }
    }
}

/// Error produced during parsing. Lex errors convert into this type, so
/// callers see a single error kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {}, column {}", span.line, span.column)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
    /// Text of the offending token, when there is one.
    pub token: Option<String>,
}

impl ParseError {
    /// Human-readable message without the position.
    #[must_use]
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        Self {
            kind: ParseErrorKind::Lex(err.kind),
            span: err.span,
            token: None,
        }
    }
}

/// Parse a token stream into a single expression tree.
///
/// # Errors
///
/// Returns `ParseError` on the first ill-formed construct; no partial
/// tree is produced.
pub fn parse(tokens: &[Token]) -> Result<Expr, ParseError> {
    Parser::new(tokens, Span::new(1, 1), 0).parse()
}

fn infix_of(kind: &TokenKind) -> Option<Infix> {
    let op = match kind {
        TokenKind::Punct(Punct::Assign) => return Some(Infix::Assign),
        TokenKind::Punct(Punct::Plus) => Operator::Plus,
        TokenKind::Punct(Punct::Minus) => Operator::Minus,
        TokenKind::Punct(Punct::Star) => Operator::Multiply,
        TokenKind::Punct(Punct::Slash) => Operator::Divide,
        TokenKind::Punct(Punct::Percent) => Operator::Modulo,
        TokenKind::Punct(Punct::Shl) => Operator::ShiftLeft,
        TokenKind::Punct(Punct::Shr) => Operator::ShiftRight,
        TokenKind::Punct(Punct::EqEq) => Operator::Equal,
        TokenKind::Punct(Punct::NotEq) => Operator::NotEqual,
        TokenKind::Punct(Punct::Lt) => Operator::Less,
        TokenKind::Punct(Punct::Gt) => Operator::Greater,
        TokenKind::Punct(Punct::LtEq) => Operator::LessEqual,
        TokenKind::Punct(Punct::GtEq) => Operator::GreaterEqual,
        TokenKind::Punct(Punct::Match) => Operator::Match,
        TokenKind::Punct(Punct::NoMatch) => Operator::NotMatch,
        TokenKind::Keyword(Keyword::And) => Operator::And,
        TokenKind::Keyword(Keyword::Or) => Operator::Or,
        TokenKind::Keyword(Keyword::In) => Operator::In,
        _ => return None,
    };
    Some(Infix::Binary(op))
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    /// Reported for errors at end of input when there are no tokens.
    origin: Span,
    /// Set while parsing the right operand of a match operator.
    regex_allowed: bool,
    /// Open `parse_expression` calls, including enclosing interpolations.
    depth: usize,
}

impl<'a> Parser<'a> {
    const fn new(tokens: &'a [Token], origin: Span, depth: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            origin,
            regex_allowed: false,
            depth,
        }
    }

    fn parse(mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression(Precedence::Assignment)?;
        self.expect_end()?;
        Ok(expr)
    }

    fn parse_expression(&mut self, min: Precedence) -> Result<Expr, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(Self::error_at(
                ParseErrorKind::NestingTooDeep,
                self.current_span(),
                None,
            ));
        }
        self.depth += 1;
        let expr = self.parse_infix(min);
        self.depth -= 1;
        expr
    }

    fn parse_infix(&mut self, min: Precedence) -> Result<Expr, ParseError> {
        let start = self.current_span();
        let mut left = self.parse_unary(min)?;

        while let Some(token) = self.peek() {
            let Some(infix) = infix_of(&token.kind) else {
                break;
            };
            if infix.precedence() < min {
                break;
            }
            if matches!(left, Expr::Regex(_)) {
                return Err(Self::error_at(ParseErrorKind::RegexNotAllowed, start, None));
            }
            self.pos += 1;
            self.regex_allowed = matches!(infix, Infix::Binary(op) if op.accepts_regex());
            let right = self.parse_expression(infix.right_operand_precedence())?;
            left = infix.combine(left, right);
        }

        Ok(left)
    }

    fn parse_unary(&mut self, min: Precedence) -> Result<Expr, ParseError> {
        let regex_allowed = std::mem::take(&mut self.regex_allowed);
        let Some(token) = self.peek() else {
            return Err(self.eof_error("expression"));
        };

        match token.kind {
            TokenKind::Punct(Punct::Minus) => {
                self.pos += 1;
                let operand = self.parse_expression(UnaryOperator::Negate.precedence().tighter())?;
                Ok(Expr::unary(UnaryOperator::Negate, operand))
            }
            TokenKind::Punct(Punct::Bang) => {
                self.pos += 1;
                // never capture operators looser than the enclosing position
                let floor = UnaryOperator::Not.precedence().tighter().max(min);
                let operand = self.parse_expression(floor)?;
                Ok(Expr::unary(UnaryOperator::Not, operand))
            }
            TokenKind::Regex if regex_allowed => {
                self.pos += 1;
                Ok(Expr::Regex(token.text.clone()))
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        while self.at_punct(Punct::LBracket) {
            self.pos += 1;
            let key = self.parse_expression(Precedence::Assignment)?;
            self.expect_punct(Punct::RBracket, "']'")?;
            expr = expr.access(key);
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let Some(token) = self.peek() else {
            return Err(self.eof_error("expression"));
        };
        self.pos += 1;

        match &token.kind {
            TokenKind::Integer(radix) => {
                let value = radix
                    .parse_value(&token.text)
                    .map_err(|_| Self::invalid_number(token))?;
                Ok(Expr::Integer(IntegerLiteral {
                    value,
                    text: token.text.clone(),
                    radix: *radix,
                }))
            }
            TokenKind::Float => {
                let value = token
                    .text
                    .parse::<f64>()
                    .map_err(|_| Self::invalid_number(token))?;
                Ok(Expr::Float(FloatLiteral {
                    value,
                    text: token.text.clone(),
                }))
            }
            TokenKind::SingleQuoted => Ok(Expr::string(token.text.clone())),
            TokenKind::DoubleQuoted(parts) => self.parse_interpolation(parts),
            TokenKind::Regex => Err(Self::error_at(
                ParseErrorKind::RegexNotAllowed,
                token.span,
                Some(format!("/{}/", token.text)),
            )),
            TokenKind::Name => Ok(Expr::name(token.text.clone())),
            TokenKind::Variable => Ok(Expr::variable(token.text.clone())),
            TokenKind::Keyword(Keyword::True) => Ok(Expr::boolean(true)),
            TokenKind::Keyword(Keyword::False) => Ok(Expr::boolean(false)),
            TokenKind::Keyword(Keyword::Undef) => Ok(Expr::undef()),
            TokenKind::Punct(Punct::LParen) => {
                let inner = self.parse_expression(Precedence::Assignment)?;
                self.expect_punct(Punct::RParen, "')'")?;
                Ok(inner)
            }
            TokenKind::Punct(Punct::LBracket) => self.parse_array(),
            TokenKind::Punct(Punct::LBrace) => self.parse_hash(),
            TokenKind::Keyword(_) | TokenKind::Punct(_) => Err(Self::unexpected(token, "expression")),
        }
    }

    /// Elements up to the closing `]`; the opening bracket is consumed.
    fn parse_array(&mut self) -> Result<Expr, ParseError> {
        let mut elements = Vec::new();
        loop {
            if self.at_punct(Punct::RBracket) {
                self.pos += 1;
                break;
            }
            elements.push(self.parse_expression(Precedence::Assignment)?);
            if !self.list_continues(Punct::RBracket, "',' or ']'")? {
                break;
            }
        }
        Ok(Expr::Array(elements))
    }

    /// `key => value` pairs up to the closing `}`; the opening brace is
    /// consumed.
    fn parse_hash(&mut self) -> Result<Expr, ParseError> {
        let mut entries = Vec::new();
        loop {
            if self.at_punct(Punct::RBrace) {
                self.pos += 1;
                break;
            }
            let key = self.parse_expression(Precedence::Assignment)?;
            self.expect_punct(Punct::FatArrow, "'=>'")?;
            let value = self.parse_expression(Precedence::Assignment)?;
            entries.push(KeyedEntry { key, value });
            if !self.list_continues(Punct::RBrace, "',' or '}'")? {
                break;
            }
        }
        Ok(Expr::Hash(entries))
    }

    /// After a list element: `true` on a comma, `false` after consuming
    /// the closing delimiter.
    fn list_continues(&mut self, close: Punct, expected: &'static str) -> Result<bool, ParseError> {
        match self.peek() {
            Some(token) if token.kind == TokenKind::Punct(Punct::Comma) => {
                self.pos += 1;
                Ok(true)
            }
            Some(token) if token.kind == TokenKind::Punct(close) => {
                self.pos += 1;
                Ok(false)
            }
            Some(token) => Err(Self::unexpected(token, expected)),
            None => Err(self.eof_error(expected)),
        }
    }

    fn parse_interpolation(&self, parts: &'a [StringPart]) -> Result<Expr, ParseError> {
        let mut builder = Interpolation::new();
        for part in parts {
            builder = match part {
                StringPart::Text(text) => builder.text(text),
                StringPart::Interpolated { tokens, span } => {
                    builder.expr(Self::new(tokens, *span, self.depth).parse()?)
                }
            };
        }
        Ok(builder.build())
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn at_punct(&self, punct: Punct) -> bool {
        self.peek()
            .is_some_and(|t| t.kind == TokenKind::Punct(punct))
    }

    fn expect_punct(&mut self, punct: Punct, expected: &'static str) -> Result<(), ParseError> {
        match self.peek() {
            Some(token) if token.kind == TokenKind::Punct(punct) => {
                self.pos += 1;
                Ok(())
            }
            Some(token) => Err(Self::unexpected(token, expected)),
            None => Err(self.eof_error(expected)),
        }
    }

    fn expect_end(&self) -> Result<(), ParseError> {
        self.peek()
            .map_or(Ok(()), |token| Err(Self::unexpected(token, "end of input")))
    }

    fn current_span(&self) -> Span {
        self.peek().map_or_else(|| self.eof_span(), |t| t.span)
    }

    fn eof_span(&self) -> Span {
        self.tokens.last().map_or(self.origin, |last| last.span)
    }

    fn eof_error(&self, expected: &'static str) -> ParseError {
        Self::error_at(ParseErrorKind::UnexpectedEof { expected }, self.eof_span(), None)
    }

    fn unexpected(token: &Token, expected: &'static str) -> ParseError {
        let found = display_text(token);
        Self::error_at(
            ParseErrorKind::UnexpectedToken {
                expected,
                found: found.clone(),
            },
            token.span,
            Some(found),
        )
    }

    fn invalid_number(token: &Token) -> ParseError {
        Self::error_at(
            ParseErrorKind::InvalidNumber(token.text.clone()),
            token.span,
            Some(token.text.clone()),
        )
    }

    const fn error_at(kind: ParseErrorKind, span: Span, token: Option<String>) -> ParseError {
        ParseError { kind, span, token }
    }
}

/// Token as it would appear in source, for messages.
fn display_text(token: &Token) -> String {
    match &token.kind {
        TokenKind::SingleQuoted => format!("'{}'", token.text),
        TokenKind::DoubleQuoted(_) => format!("\"{}\"", token.text),
        TokenKind::Regex => format!("/{}/", token.text),
        TokenKind::Variable => format!("${}", token.text),
        _ => token.text.clone(),
    }
}
