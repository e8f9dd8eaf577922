//! Lexer, parser, tree factory, and canonical dumper for the expression
//! and assignment grammar of a declarative configuration language.
//!
//! Source text becomes an immutable [`Expr`] tree with correct operator
//! precedence and associativity. The same trees can be built by hand
//! through the factory methods on [`Expr`], and any tree can be rendered
//! in a canonical prefix form with [`dump`].
//!
//! # Quick start
//!
//! ## Parse and dump an expression
//!
//! ```
//! use egrammar::{tokenize, parse, dump};
//!
//! let tokens = tokenize("$a = 1 + 2 * 3").unwrap();
//! let expr = parse(&tokens).unwrap();
//! assert_eq!(dump(&expr), "(= $a (+ 1 (* 2 3)))");
//! ```
//!
//! ## Build the same tree programmatically
//!
//! ```
//! use egrammar::{Expr, dump, parse_str};
//!
//! let built = Expr::variable("a").assign(
//!     Expr::integer(1).plus(Expr::integer(2).times(Expr::integer(3))),
//! );
//! assert_eq!(built, parse_str("$a = 1 + 2 * 3").unwrap());
//! assert_eq!(dump(&built), "(= $a (+ 1 (* 2 3)))");
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod ast;
pub mod dumper;
pub mod factory;
pub mod lexer;
pub mod parser;
pub mod precedence;
pub mod token;

pub use ast::{
    Expr, FloatLiteral, IntegerLiteral, KeyedEntry, Operator, Quote, Radix, Segment,
    StringLiteral, UnaryOperator,
};
pub use dumper::dump;
pub use factory::{Interpolation, Sequence};
pub use lexer::{LexError, LexErrorKind, tokenize};
pub use parser::{ParseError, ParseErrorKind, parse};
pub use precedence::{Associativity, Infix, Precedence};
pub use token::{Keyword, Punct, Span, StringPart, Token, TokenKind};

/// Deepest nesting the lexer and parser accept before reporting an error
/// instead of recursing further: interpolations inside interpolations for
/// the lexer, nested sub-expressions for the parser.
pub const MAX_NESTING: usize = 64;

/// Tokenize and parse an expression source string in one step.
///
/// Lex errors are reported as [`ParseErrorKind::Lex`].
pub fn parse_str(input: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(input)?;
    parse(&tokens)
}
