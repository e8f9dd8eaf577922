//! Tokenize and parse an expression, then print its canonical dump.

fn main() {
    let input = "$a = {'k' => [1, 0x1F, \"yo${var + 2}yo\"]}['k'] in $list";

    let tokens = egrammar::tokenize(input).expect("tokenize failed");
    println!("Tokens: {}", tokens.len());
    for token in &tokens {
        println!("  {:>3}:{:<3} {:?} {}", token.span.line, token.span.column, token.kind, token.text);
    }

    let expr = egrammar::parse(&tokens).expect("parse failed");
    println!("\nDump:\n{}", egrammar::dump(&expr));
}
