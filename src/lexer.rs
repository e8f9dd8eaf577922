use std::fmt;

use crate::MAX_NESTING;
use crate::ast::Radix;
use crate::token::{Keyword, Punct, Span, StringPart, Token, TokenKind};

/// Classifies a lexer error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// Quoted string without its closing quote.
    UnterminatedString,
    /// Regex without its closing `/` on the same line.
    UnterminatedRegex,
    /// `${` without a matching `}`.
    UnterminatedInterpolation,
    /// `${}` with nothing inside.
    EmptyInterpolation,
    /// Malformed or out-of-range numeric literal.
    InvalidNumber(String),
    /// `$` not followed by a variable name.
    InvalidVariable,
    /// Character that cannot start any token.
    UnexpectedCharacter(char),
    /// Interpolations nested deeper than [`MAX_NESTING`].
    NestingTooDeep,
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedString => write!(f, "unterminated quoted string"),
            Self::UnterminatedRegex => write!(f, "unterminated regular expression"),
            Self::UnterminatedInterpolation => {
                write!(f, "unterminated interpolation, expected '}}'")
            }
            Self::EmptyInterpolation => write!(f, "empty interpolation"),
            Self::InvalidNumber(text) => write!(f, "invalid numeric literal: {text}"),
            Self::InvalidVariable => write!(f, "expected variable name after '$'"),
            Self::UnexpectedCharacter(ch) => write!(f, "unexpected character: {ch}"),
            Self::NestingTooDeep => {
                write!(f, "interpolation nested deeper than {MAX_NESTING} levels")
            }
        }
    }
}

/// Error produced during lexing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {}, column {}", span.line, span.column)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

/// Tokenize an expression source string into a sequence of tokens.
///
/// # Errors
///
/// Returns `LexError` on unterminated strings, regexes, or
/// interpolations, malformed numbers, and unknown characters.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).tokenize()
}

const fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

const fn is_name_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

/// `::` followed by a word character.
fn starts_separator(rest: &str) -> bool {
    rest.strip_prefix("::")
        .and_then(|after| after.chars().next())
        .is_some_and(is_word_char)
}

fn starts_variable_name(rest: &str) -> bool {
    rest.chars().next().is_some_and(is_word_char) || starts_separator(rest)
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    col: usize,
    /// Interpolation nesting of this fragment.
    depth: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input: input.strip_prefix('\u{FEFF}').unwrap_or(input),
            pos: 0,
            line: 1,
            col: 1,
            depth: 0,
        }
    }

    /// Lexer over a fragment that starts at `span` in the enclosing source.
    const fn at(input: &'a str, span: Span, depth: usize) -> Self {
        Self {
            input,
            pos: 0,
            line: span.line,
            col: span.column,
            depth,
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens: Vec<Token> = Vec::new();

        while let Some(ch) = self.peek() {
            match ch {
                ' ' | '\t' | '\r' | '\n' => self.advance(),
                '#' => self.skip_comment(),
                '\'' => tokens.push(self.read_single_quoted()?),
                '"' => tokens.push(self.read_double_quoted()?),
                '$' => tokens.push(self.read_variable()?),
                '/' if tokens.last().is_none_or(|t| !t.kind.ends_operand()) => {
                    tokens.push(self.read_regex()?);
                }
                c if c.is_ascii_digit() => tokens.push(self.read_number()?),
                c if is_name_start(c) || starts_separator(self.rest()) => {
                    tokens.push(self.read_name());
                }
                c => tokens.push(self.read_punct(c)?),
            }
        }

        Ok(tokens)
    }

    const fn span(&self) -> Span {
        Span::new(self.line, self.col)
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.rest().chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(ch) = self.peek() {
            self.pos += ch.len_utf8();
            if ch == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.advance();
        Some(ch)
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let input = self.input;
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.advance();
        }
        &input[start..self.pos]
    }

    /// `(::)?word(::word)*`
    fn take_qualified_name(&mut self) -> &'a str {
        let input = self.input;
        let start = self.pos;
        loop {
            if starts_separator(self.rest()) {
                self.advance();
                self.advance();
            }
            self.take_while(is_word_char);
            if !starts_separator(self.rest()) {
                break;
            }
        }
        &input[start..self.pos]
    }

    fn skip_comment(&mut self) {
        self.take_while(|c| c != '\n');
    }

    fn read_punct(&mut self, ch: char) -> Result<Token, LexError> {
        let span = self.span();
        self.advance();

        let punct = match ch {
            '=' => self.pick(
                &[
                    ('=', Punct::EqEq),
                    ('~', Punct::Match),
                    ('>', Punct::FatArrow),
                ],
                Punct::Assign,
            ),
            '!' => self.pick(&[('=', Punct::NotEq), ('~', Punct::NoMatch)], Punct::Bang),
            '<' => self.pick(&[('<', Punct::Shl), ('=', Punct::LtEq)], Punct::Lt),
            '>' => self.pick(&[('>', Punct::Shr), ('=', Punct::GtEq)], Punct::Gt),
            '+' => Punct::Plus,
            '-' => Punct::Minus,
            '*' => Punct::Star,
            '/' => Punct::Slash,
            '%' => Punct::Percent,
            '(' => Punct::LParen,
            ')' => Punct::RParen,
            '[' => Punct::LBracket,
            ']' => Punct::RBracket,
            '{' => Punct::LBrace,
            '}' => Punct::RBrace,
            ',' => Punct::Comma,
            other => {
                return Err(LexError {
                    kind: LexErrorKind::UnexpectedCharacter(other),
                    span,
                });
            }
        };

        Ok(Token {
            kind: TokenKind::Punct(punct),
            text: punct.as_str().to_string(),
            span,
        })
    }

    /// Longest match: take the two-character form if the next
    /// character completes one.
    fn pick(&mut self, pairs: &[(char, Punct)], single: Punct) -> Punct {
        for &(next, punct) in pairs {
            if self.peek() == Some(next) {
                self.advance();
                return punct;
            }
        }
        single
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let span = self.span();
        let start = self.pos;
        let mut is_float = false;

        if self.peek() == Some('0') && matches!(self.peek_at(1), Some('x' | 'X')) {
            self.advance();
            self.advance();
            self.take_while(|c| c.is_ascii_hexdigit());
        } else {
            self.take_while(|c| c.is_ascii_digit());
            if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
                self.take_while(|c| c.is_ascii_digit());
                is_float = true;
            }
            if matches!(self.peek(), Some('e' | 'E')) && self.exponent_follows() {
                self.advance();
                if matches!(self.peek(), Some('+' | '-')) {
                    self.advance();
                }
                self.take_while(|c| c.is_ascii_digit());
                is_float = true;
            }
        }

        let junk = self.take_while(is_word_char);
        let text = &self.input[start..self.pos];
        let invalid = || LexError {
            kind: LexErrorKind::InvalidNumber(text.to_string()),
            span,
        };

        if !junk.is_empty() {
            return Err(invalid());
        }

        let kind = if is_float {
            text.parse::<f64>().map_err(|_| invalid())?;
            TokenKind::Float
        } else {
            let radix = Radix::of_literal(text);
            radix.parse_value(text).map_err(|_| invalid())?;
            TokenKind::Integer(radix)
        };

        Ok(Token {
            kind,
            text: text.to_string(),
            span,
        })
    }

    /// After `e`/`E`: a digit, or a sign and a digit.
    fn exponent_follows(&self) -> bool {
        match self.peek_at(1) {
            Some(c) if c.is_ascii_digit() => true,
            Some('+' | '-') => self.peek_at(2).is_some_and(|c| c.is_ascii_digit()),
            _ => false,
        }
    }

    fn read_name(&mut self) -> Token {
        let span = self.span();
        let text = self.take_qualified_name();
        let kind = Keyword::from_word(text).map_or(TokenKind::Name, TokenKind::Keyword);
        Token {
            kind,
            text: text.to_string(),
            span,
        }
    }

    fn read_variable(&mut self) -> Result<Token, LexError> {
        let span = self.span();
        self.advance(); // skip $

        if !starts_variable_name(self.rest()) {
            return Err(LexError {
                kind: LexErrorKind::InvalidVariable,
                span,
            });
        }

        Ok(Token {
            kind: TokenKind::Variable,
            text: self.take_qualified_name().to_string(),
            span,
        })
    }

    fn read_regex(&mut self) -> Result<Token, LexError> {
        let span = self.span();
        self.advance(); // skip opening /
        let start = self.pos;

        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(LexError {
                        kind: LexErrorKind::UnterminatedRegex,
                        span,
                    });
                }
                Some('\\') => {
                    // escapes stay verbatim in the pattern
                    self.advance();
                    if self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                }
                Some('/') => break,
                Some(_) => self.advance(),
            }
        }

        let pattern = self.input[start..self.pos].to_string();
        self.advance(); // skip closing /

        Ok(Token {
            kind: TokenKind::Regex,
            text: pattern,
            span,
        })
    }

    fn read_single_quoted(&mut self) -> Result<Token, LexError> {
        let span = self.span();
        self.advance(); // skip opening quote

        let mut value = String::new();
        loop {
            match self.bump() {
                None => {
                    return Err(LexError {
                        kind: LexErrorKind::UnterminatedString,
                        span,
                    });
                }
                Some('\'') => break,
                Some('\\') => match self.peek() {
                    Some(c @ ('\\' | '\'')) => {
                        value.push(c);
                        self.advance();
                    }
                    _ => value.push('\\'),
                },
                Some(c) => value.push(c),
            }
        }

        Ok(Token {
            kind: TokenKind::SingleQuoted,
            text: value,
            span,
        })
    }

    /// Double-quoted string. `text` holds the raw source between the
    /// quotes; the resolved content is in the parts.
    fn read_double_quoted(&mut self) -> Result<Token, LexError> {
        let span = self.span();
        self.advance(); // skip opening quote
        let raw_start = self.pos;

        let mut parts = Vec::new();
        let mut text = String::new();
        loop {
            match self.peek() {
                None => {
                    return Err(LexError {
                        kind: LexErrorKind::UnterminatedString,
                        span,
                    });
                }
                Some('"') => break,
                Some('\\') => {
                    self.advance();
                    self.read_escape(&mut text);
                }
                Some('$') if self.peek_at(1) == Some('{') => {
                    if !text.is_empty() {
                        parts.push(StringPart::Text(std::mem::take(&mut text)));
                    }
                    parts.push(self.read_braced_interpolation()?);
                }
                Some('$') if starts_variable_name(&self.rest()[1..]) => {
                    if !text.is_empty() {
                        parts.push(StringPart::Text(std::mem::take(&mut text)));
                    }
                    let var_span = self.span();
                    self.advance(); // skip $
                    let name = self.take_qualified_name().to_string();
                    parts.push(StringPart::Interpolated {
                        tokens: vec![Token {
                            kind: TokenKind::Variable,
                            text: name,
                            span: var_span,
                        }],
                        span: var_span,
                    });
                }
                Some(c) => {
                    text.push(c);
                    self.advance();
                }
            }
        }

        let raw = self.input[raw_start..self.pos].to_string();
        self.advance(); // skip closing quote

        if !text.is_empty() || parts.is_empty() {
            parts.push(StringPart::Text(text));
        }

        Ok(Token {
            kind: TokenKind::DoubleQuoted(parts),
            text: raw,
            span,
        })
    }

    fn read_escape(&mut self, value: &mut String) {
        match self.bump() {
            Some('n') => value.push('\n'),
            Some('t') => value.push('\t'),
            Some('r') => value.push('\r'),
            Some('s') => value.push(' '),
            Some(c @ ('"' | '\\' | '$' | '\'')) => value.push(c),
            Some(c) => {
                value.push('\\');
                value.push(c);
            }
            None => value.push('\\'),
        }
    }

    fn read_braced_interpolation(&mut self) -> Result<StringPart, LexError> {
        let span = self.span();
        self.advance(); // skip $
        self.advance(); // skip {
        let inner_span = self.span();
        let start = self.pos;

        let mut depth = 0usize;
        loop {
            match self.peek() {
                None => {
                    return Err(LexError {
                        kind: LexErrorKind::UnterminatedInterpolation,
                        span,
                    });
                }
                Some('}') if depth == 0 => break,
                Some('}') => {
                    depth -= 1;
                    self.advance();
                }
                Some('{') => {
                    depth += 1;
                    self.advance();
                }
                Some(quote @ ('"' | '\'')) => self.skip_nested_quoted(quote, span)?,
                Some(_) => self.advance(),
            }
        }

        let inner = &self.input[start..self.pos];
        self.advance(); // skip }

        if self.depth >= MAX_NESTING {
            return Err(LexError {
                kind: LexErrorKind::NestingTooDeep,
                span,
            });
        }
        let mut tokens = Self::at(inner, inner_span, self.depth + 1).tokenize()?;
        match tokens.first_mut() {
            None => {
                return Err(LexError {
                    kind: LexErrorKind::EmptyInterpolation,
                    span,
                });
            }
            // a leading bare word names a variable: "${var}" is "$var"
            Some(first) if first.kind == TokenKind::Name => first.kind = TokenKind::Variable,
            Some(_) => {}
        }

        Ok(StringPart::Interpolated { tokens, span })
    }

    fn skip_nested_quoted(&mut self, quote: char, span: Span) -> Result<(), LexError> {
        self.advance(); // skip opening quote
        loop {
            match self.bump() {
                None => {
                    return Err(LexError {
                        kind: LexErrorKind::UnterminatedInterpolation,
                        span,
                    });
                }
                Some('\\') => self.advance(),
                Some(c) if c == quote => return Ok(()),
                Some(_) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .expect("should tokenize")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn assignment_tokens() {
        let tokens = tokenize("$a = 10").expect("should tokenize");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].kind, TokenKind::Variable);
        assert_eq!(tokens[0].text, "a");
        assert_eq!(tokens[1].kind, TokenKind::Punct(Punct::Assign));
        assert_eq!(tokens[2].kind, TokenKind::Integer(Radix::Decimal));
        assert_eq!(tokens[2].text, "10");
    }

    #[test]
    fn greedy_operators() {
        assert_eq!(
            kinds("<< <= < >> >= > == =~ => != !~ !"),
            vec![
                TokenKind::Punct(Punct::Shl),
                TokenKind::Punct(Punct::LtEq),
                TokenKind::Punct(Punct::Lt),
                TokenKind::Punct(Punct::Shr),
                TokenKind::Punct(Punct::GtEq),
                TokenKind::Punct(Punct::Gt),
                TokenKind::Punct(Punct::EqEq),
                TokenKind::Punct(Punct::Match),
                TokenKind::Punct(Punct::FatArrow),
                TokenKind::Punct(Punct::NotEq),
                TokenKind::Punct(Punct::NoMatch),
                TokenKind::Punct(Punct::Bang),
            ]
        );
    }

    #[test]
    fn number_radixes() {
        let tokens = tokenize("0xAB 0777 0 12 2.5 1e3").expect("should tokenize");
        assert_eq!(tokens[0].kind, TokenKind::Integer(Radix::Hex));
        assert_eq!(tokens[1].kind, TokenKind::Integer(Radix::Octal));
        assert_eq!(tokens[2].kind, TokenKind::Integer(Radix::Decimal));
        assert_eq!(tokens[3].kind, TokenKind::Integer(Radix::Decimal));
        assert_eq!(tokens[4].kind, TokenKind::Float);
        assert_eq!(tokens[5].kind, TokenKind::Float);
        assert_eq!(tokens[5].text, "1e3");
    }

    #[test]
    fn invalid_numbers() {
        for input in ["0x", "0789", "12abc", "0xZZ", "99999999999999999999"] {
            let err = tokenize(input).unwrap_err();
            assert!(
                matches!(err.kind, LexErrorKind::InvalidNumber(_)),
                "{input}: {err}"
            );
        }
    }

    #[test]
    fn slash_after_operand_is_division() {
        assert_eq!(
            kinds("6/3"),
            vec![
                TokenKind::Integer(Radix::Decimal),
                TokenKind::Punct(Punct::Slash),
                TokenKind::Integer(Radix::Decimal),
            ]
        );
    }

    #[test]
    fn slash_after_operator_is_regex() {
        let tokens = tokenize("'a' =~ /b.*/").expect("should tokenize");
        assert_eq!(tokens[2].kind, TokenKind::Regex);
        assert_eq!(tokens[2].text, "b.*");
    }

    #[test]
    fn regex_keeps_escaped_slash() {
        let tokens = tokenize(r"/a\/b/").expect("should tokenize");
        assert_eq!(tokens[0].text, r"a\/b");
    }

    #[test]
    fn unterminated_regex() {
        let err = tokenize("$a =~ /abc").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedRegex);
        assert_eq!(err.span, Span::new(1, 7));
    }

    #[test]
    fn single_quoted_is_verbatim() {
        let tokens = tokenize(r"'it\'s $x \n'").expect("should tokenize");
        assert_eq!(tokens[0].kind, TokenKind::SingleQuoted);
        assert_eq!(tokens[0].text, r"it's $x \n");
    }

    #[test]
    fn unterminated_single_quote() {
        let err = tokenize("'open").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedString);
    }

    #[test]
    fn double_quoted_without_interpolation() {
        let tokens = tokenize(r#""a\tb""#).expect("should tokenize");
        assert_eq!(
            tokens[0].kind,
            TokenKind::DoubleQuoted(vec![StringPart::Text("a\tb".to_string())])
        );
        assert_eq!(tokens[0].text, r"a\tb");
    }

    #[test]
    fn bare_variable_interpolation() {
        let tokens = tokenize(r#""x$var y""#).expect("should tokenize");
        let TokenKind::DoubleQuoted(parts) = &tokens[0].kind else {
            panic!("expected double-quoted string");
        };
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], StringPart::Text("x".to_string()));
        assert!(matches!(
            &parts[1],
            StringPart::Interpolated { tokens, .. }
            if tokens.len() == 1 && tokens[0].kind == TokenKind::Variable && tokens[0].text == "var"
        ));
        assert_eq!(parts[2], StringPart::Text(" y".to_string()));
    }

    #[test]
    fn braced_interpolation_names_a_variable() {
        let tokens = tokenize(r#""${var+2}""#).expect("should tokenize");
        let TokenKind::DoubleQuoted(parts) = &tokens[0].kind else {
            panic!("expected double-quoted string");
        };
        let StringPart::Interpolated { tokens: inner, .. } = &parts[0] else {
            panic!("expected interpolation");
        };
        assert_eq!(inner[0].kind, TokenKind::Variable);
        assert_eq!(inner[1].kind, TokenKind::Punct(Punct::Plus));
        assert_eq!(inner[2].text, "2");
    }

    #[test]
    fn interpolation_positions_are_absolute() {
        let tokens = tokenize("$a = \"yo${x + 'b'}\"").expect("should tokenize");
        let TokenKind::DoubleQuoted(parts) = &tokens[2].kind else {
            panic!("expected double-quoted string");
        };
        let StringPart::Interpolated { tokens: inner, span } = &parts[1] else {
            panic!("expected interpolation");
        };
        assert_eq!(*span, Span::new(1, 9));
        assert_eq!(inner[0].span, Span::new(1, 11));
        assert_eq!(inner[2].span, Span::new(1, 15));
    }

    #[test]
    fn interpolation_with_nested_braces() {
        let tokens = tokenize(r#""${ {'k' => '}'}[k] }""#).expect("should tokenize");
        let TokenKind::DoubleQuoted(parts) = &tokens[0].kind else {
            panic!("expected double-quoted string");
        };
        assert_eq!(parts.len(), 1);
    }

    #[test]
    fn unterminated_interpolation() {
        let err = tokenize(r#""${x""#).unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedInterpolation);
    }

    #[test]
    fn empty_interpolation() {
        let err = tokenize(r#""${ }""#).unwrap_err();
        assert_eq!(err.kind, LexErrorKind::EmptyInterpolation);
    }

    #[test]
    fn lone_dollar_in_string_is_text() {
        let tokens = tokenize(r#""cost: $ 5""#).expect("should tokenize");
        assert_eq!(
            tokens[0].kind,
            TokenKind::DoubleQuoted(vec![StringPart::Text("cost: $ 5".to_string())])
        );
    }

    #[test]
    fn keywords_and_names() {
        assert_eq!(
            kinds("true false undef and or in foo ::top::name"),
            vec![
                TokenKind::Keyword(Keyword::True),
                TokenKind::Keyword(Keyword::False),
                TokenKind::Keyword(Keyword::Undef),
                TokenKind::Keyword(Keyword::And),
                TokenKind::Keyword(Keyword::Or),
                TokenKind::Keyword(Keyword::In),
                TokenKind::Name,
                TokenKind::Name,
            ]
        );
    }

    #[test]
    fn qualified_variable() {
        let tokens = tokenize("$::os::family").expect("should tokenize");
        assert_eq!(tokens[0].text, "::os::family");
    }

    #[test]
    fn dollar_without_name() {
        let err = tokenize("$ = 1").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::InvalidVariable);
    }

    #[test]
    fn comments_are_skipped() {
        let tokens = tokenize("$a = 1 # trailing\n+ 2").expect("should tokenize");
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[4].span, Span::new(2, 3));
    }

    #[test]
    fn unknown_character() {
        let err = tokenize("$a = 1 ; 2").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnexpectedCharacter(';'));
        assert_eq!(err.span, Span::new(1, 8));
    }
}
