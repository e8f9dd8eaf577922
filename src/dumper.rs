//! Canonical prefix-notation dump of an expression tree.
//!
//! The dump is the structural-equality format used by tests and tooling:
//! `$a = 1 + 2 * 3` dumps as `(= $a (+ 1 (* 2 3)))`. It is not meant to
//! be parsed back.

use std::fmt;

use crate::ast::{Expr, KeyedEntry, Operator, Segment, UnaryOperator};

/// Render an expression tree in canonical dump form.
#[must_use]
pub fn dump(expr: &Expr) -> String {
    let mut out = String::new();
    dump_expr(&mut out, expr);
    out
}

fn dump_expr(out: &mut String, expr: &Expr) {
    match expr {
        Expr::Integer(lit) => out.push_str(&lit.text),
        Expr::Float(lit) => out.push_str(&lit.text),
        Expr::Str(lit) => dump_quoted(out, &lit.value, lit.quote.as_char()),
        Expr::Bool(value) => out.push_str(if *value { "true" } else { "false" }),
        Expr::Undef => out.push_str(":undef"),
        Expr::Regex(pattern) => {
            out.push('/');
            out.push_str(pattern);
            out.push('/');
        }
        Expr::Variable(name) => {
            out.push('$');
            out.push_str(name);
        }
        Expr::Name(name) => out.push_str(name),
        Expr::Array(elements) => {
            out.push_str("([]");
            for element in elements {
                out.push(' ');
                dump_expr(out, element);
            }
            out.push(')');
        }
        Expr::Hash(entries) => {
            out.push_str("({}");
            for entry in entries {
                out.push(' ');
                dump_entry(out, entry);
            }
            out.push(')');
        }
        Expr::Unary { op, operand } => dump_node(out, op.symbol(), &[&**operand]),
        Expr::Binary { op, left, right } => dump_node(out, op.symbol(), &[&**left, &**right]),
        Expr::Assign { target, value } => dump_node(out, "=", &[&**target, &**value]),
        Expr::Access { target, key } => dump_node(out, "slice", &[&**target, &**key]),
        Expr::Concat(segments) => {
            out.push_str("(cat");
            for segment in segments {
                out.push(' ');
                match segment {
                    Segment::Text(text) => dump_quoted(out, text, '\''),
                    Segment::Expr(inner) => dump_node(out, "str", &[inner]),
                }
            }
            out.push(')');
        }
    }
}

/// `(head child child ...)`
fn dump_node(out: &mut String, head: &str, children: &[&Expr]) {
    out.push('(');
    out.push_str(head);
    for child in children {
        out.push(' ');
        dump_expr(out, child);
    }
    out.push(')');
}

fn dump_entry(out: &mut String, entry: &KeyedEntry) {
    out.push('(');
    dump_expr(out, &entry.key);
    out.push(' ');
    dump_expr(out, &entry.value);
    out.push(')');
}

/// Quote `text`, escaping backslashes and the quote character.
fn dump_quoted(out: &mut String, text: &str, quote: char) {
    out.push(quote);
    for ch in text.chars() {
        if ch == quote || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push(quote);
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&dump(self))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
