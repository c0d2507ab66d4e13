//! Monkey parser: converts a token stream into an AST.
//!
//! Pratt parsing over per-token prefix and infix rule tables. Syntax errors
//! are collected rather than raised, so callers always get a program back.

mod parse_expr;
mod parse_stmt;
mod parser;

pub use parse_expr::{Precedence, MAX_EXPR_DEPTH};
pub use parser::{ParseResult, Parser};

use monkey_lexer::Lexer;

/// Parse everything `lexer` produces.
pub fn parse(lexer: Lexer) -> ParseResult {
    Parser::new(lexer).parse()
}
