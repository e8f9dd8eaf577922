//! Lexer edge cases and error tests.

use egrammar::{LexErrorKind, Punct, Radix, Span, StringPart, TokenKind, tokenize};

// -----------------------------------------------------------
// Basic lexer behaviour.
// -----------------------------------------------------------

#[test]
fn lex_empty_input() {
    let tokens = tokenize("").expect("tokenize");
    assert!(tokens.is_empty());
}

#[test]
fn lex_only_whitespace_and_comments() {
    let tokens = tokenize("  \t\n # nothing here\n\r\n").expect("tokenize");
    assert!(tokens.is_empty());
}

#[test]
fn lex_bom_is_skipped() {
    let tokens = tokenize("\u{FEFF}$a").expect("tokenize");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].span, Span::new(1, 1));
}

#[test]
fn lex_no_spaces_needed() {
    let tokens = tokenize("{'a'=>1,'b'=>2}[b]").expect("tokenize");
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind.clone()).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Punct(Punct::LBrace),
            TokenKind::SingleQuoted,
            TokenKind::Punct(Punct::FatArrow),
            TokenKind::Integer(Radix::Decimal),
            TokenKind::Punct(Punct::Comma),
            TokenKind::SingleQuoted,
            TokenKind::Punct(Punct::FatArrow),
            TokenKind::Integer(Radix::Decimal),
            TokenKind::Punct(Punct::RBrace),
            TokenKind::Punct(Punct::LBracket),
            TokenKind::Name,
            TokenKind::Punct(Punct::RBracket),
        ]
    );
}

#[test]
fn lex_numbers_keep_spelling() {
    let tokens = tokenize("0XFF 0.5 1.5e-3 2E10 007").expect("tokenize");
    let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, ["0XFF", "0.5", "1.5e-3", "2E10", "007"]);
    assert_eq!(tokens[0].kind, TokenKind::Integer(Radix::Hex));
    assert_eq!(tokens[1].kind, TokenKind::Float);
    assert_eq!(tokens[2].kind, TokenKind::Float);
    assert_eq!(tokens[3].kind, TokenKind::Float);
    assert_eq!(tokens[4].kind, TokenKind::Integer(Radix::Octal));
}

#[test]
fn lex_exponent_needs_digits() {
    let err = tokenize("1e").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::InvalidNumber("1e".to_string()));
}

#[test]
fn lex_dot_without_fraction() {
    let err = tokenize("1.").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnexpectedCharacter('.'));
    assert_eq!(err.span, Span::new(1, 2));
}

// -----------------------------------------------------------
// Regex versus division.
// -----------------------------------------------------------

#[test]
fn lex_division_after_closing_paren() {
    let tokens = tokenize("(6)/3").expect("tokenize");
    assert_eq!(tokens[3].kind, TokenKind::Punct(Punct::Slash));
}

#[test]
fn lex_division_after_variable() {
    let tokens = tokenize("$x / $y").expect("tokenize");
    assert_eq!(tokens[1].kind, TokenKind::Punct(Punct::Slash));
}

#[test]
fn lex_regex_at_start() {
    let tokens = tokenize("/^a+$/").expect("tokenize");
    assert_eq!(tokens[0].kind, TokenKind::Regex);
    assert_eq!(tokens[0].text, "^a+$");
}

#[test]
fn lex_regex_does_not_span_lines() {
    let err = tokenize("$a =~ /abc\ndef/").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnterminatedRegex);
}

// -----------------------------------------------------------
// Strings.
// -----------------------------------------------------------

#[test]
fn lex_double_quoted_escapes() {
    let tokens = tokenize(r#""a\"b\\c\$d\se\q""#).expect("tokenize");
    assert_eq!(
        tokens[0].kind,
        TokenKind::DoubleQuoted(vec![StringPart::Text("a\"b\\c$d e\\q".to_string())])
    );
}

#[test]
fn lex_empty_double_quoted() {
    let tokens = tokenize("\"\"").expect("tokenize");
    assert_eq!(
        tokens[0].kind,
        TokenKind::DoubleQuoted(vec![StringPart::Text(String::new())])
    );
}

#[test]
fn lex_escaped_dollar_is_not_interpolated() {
    let tokens = tokenize(r#""\$var""#).expect("tokenize");
    assert_eq!(
        tokens[0].kind,
        TokenKind::DoubleQuoted(vec![StringPart::Text("$var".to_string())])
    );
}

#[test]
fn lex_single_quoted_keeps_dollar() {
    let tokens = tokenize("'${x}'").expect("tokenize");
    assert_eq!(tokens[0].kind, TokenKind::SingleQuoted);
    assert_eq!(tokens[0].text, "${x}");
}

#[test]
fn lex_unterminated_double_quote_position() {
    let err = tokenize("$a = \"open").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnterminatedString);
    assert_eq!(err.span, Span::new(1, 6));
}

#[test]
fn lex_error_inside_interpolation() {
    let err = tokenize("\"${1 ; 2}\"").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnexpectedCharacter(';'));
    assert_eq!(err.span, Span::new(1, 6));
}

#[test]
fn lex_multiline_string_positions() {
    let tokens = tokenize("\"a\nb\" + $c").expect("tokenize");
    assert_eq!(tokens[1].span, Span::new(2, 4));
    assert_eq!(tokens[2].span, Span::new(2, 6));
}

#[test]
fn lex_error_display_includes_location() {
    let err = tokenize("$a = @").unwrap_err();
    assert_eq!(err.to_string(), "unexpected character: @ at line 1, column 6");
}
