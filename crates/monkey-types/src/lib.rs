//! Shared types for the Monkey interpreter.
//!
//! This crate defines the tokens, AST node types, source spans and syntax
//! error types used by every stage of the pipeline.

mod error;
mod span;
pub mod ast;
pub mod token;

pub use error::{ErrorCode, SyntaxError, SyntaxErrors};
pub use span::Span;
pub use token::{Token, TokenKind, ALL_KEYWORDS};
