//! Monkey lexer: converts source text into a token stream.

pub mod lexer;

pub use lexer::Lexer;
pub use monkey_types::token::{self, Token, TokenKind, ALL_KEYWORDS};
pub use monkey_types::Span;

/// Start lexing `source`. Tokens are produced on demand.
pub fn lex(source: &str) -> Lexer {
    Lexer::new(source)
}
