//! Build expression trees with the factory and compare them to parsed ones.

use egrammar::{Expr, Operator, Sequence, dump, parse_str};

fn main() {
    // Nested combinators: the tighter operation is built first.
    let nested = Expr::variable("a").assign(
        Expr::integer(1).plus(Expr::integer(2).times(Expr::integer(3))),
    );
    println!("nested:   {}", dump(&nested));

    // A flat sequence lets the precedence table do the grouping.
    let flat = Sequence::new(Expr::variable("a"))
        .assign(Expr::integer(1))
        .then(Operator::Plus, Expr::integer(2))
        .then(Operator::Multiply, Expr::integer(3))
        .reduce();
    println!("sequence: {}", dump(&flat));

    let parsed = parse_str("$a = 1 + 2 * 3").expect("parse failed");
    println!("parsed:   {parsed}");
    println!("all equal: {}", nested == flat && flat == parsed);

    let greeting = Expr::interpolate()
        .text("hello ")
        .expr(Expr::variable("name"))
        .text("!")
        .build();
    println!("\ninterpolation: {}", dump(&greeting));

    let lookup = Expr::hash([(Expr::string("k"), Expr::hex(0x1F))])
        .access(Expr::string("k"))
        .matches_regex("^3");
    println!("match:         {}", dump(&lookup));
}
