#![allow(dead_code)]

use egrammar::{Expr, dump, parse, parse_str, tokenize};

/// Parse `input` and compare its dump with `expected`.
pub fn assert_dump(input: &str, expected: &str) {
    let tokens = tokenize(input).expect("tokenize failed");
    let expr = parse(&tokens).unwrap_or_else(|e| panic!("parse failed for {input:?}: {e}"));
    let output = dump(&expr);
    assert_eq!(
        output, expected,
        "dump mismatch for {input:?}:\n--- expected ---\n{expected}\n--- got ---\n{output}"
    );
}

/// Assert that a factory-built tree matches what parsing `source` gives,
/// both structurally and by dump.
pub fn assert_parity(built: &Expr, source: &str) {
    let parsed = parse_str(source).unwrap_or_else(|e| panic!("parse failed for {source:?}: {e}"));
    assert_eq!(
        dump(built),
        dump(&parsed),
        "dump mismatch against {source:?}"
    );
    assert_eq!(*built, parsed, "tree mismatch against {source:?}");
}
