//! Demonstrate error handling for invalid expression input.

use egrammar::ParseErrorKind;

fn main() {
    // Unterminated quoted string
    match egrammar::parse_str("$a = \"unclosed") {
        Ok(_) => println!("Parsed OK (unexpected)"),
        Err(e) => {
            println!("Error: {e}");
            println!("  Kind: {:?}", e.kind);
            println!("  Location: line {}, column {}", e.span.line, e.span.column);
        }
    }

    println!();

    // Unclosed bracket
    match egrammar::parse_str("$a = [1, 2") {
        Ok(_) => println!("Parsed OK (unexpected)"),
        Err(e) => {
            println!("Error: {}", e.message());
            println!("  Location: {}", e.span);
        }
    }

    println!();

    // Regex outside a match operator
    match egrammar::parse_str("$a = /.*/ == /.*/") {
        Ok(_) => println!("Parsed OK (unexpected)"),
        Err(e) if e.kind == ParseErrorKind::RegexNotAllowed => {
            println!("Regex rejected: {e}");
            if let Some(token) = &e.token {
                println!("  Offending token: {token}");
            }
        }
        Err(e) => println!("Error: {e}"),
    }
}
