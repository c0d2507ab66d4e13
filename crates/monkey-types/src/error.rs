use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric syntax error code (E100–E199).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    /// A specific token was required and something else was found.
    pub const UNEXPECTED_TOKEN: Self = Self(100);
    /// A token appeared in expression position with no prefix rule.
    pub const NO_PREFIX_RULE: Self = Self(101);
    /// An integer literal does not fit in 64 bits.
    pub const INVALID_INTEGER: Self = Self(102);
    /// Expressions nested deeper than the parser allows.
    pub const NESTING_LIMIT_EXCEEDED: Self = Self(103);
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// A recoverable syntax error recorded by the parser.
///
/// `Display` yields only the message so hosts can print errors exactly as
/// they were recorded; the code and span are there for structured output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct SyntaxError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(flatten)]
    pub span: Span,
}

impl SyntaxError {
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            code,
            message: message.into(),
            span,
        }
    }
}

/// Ordered list of syntax errors, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxErrors {
    pub errors: Vec<SyntaxError>,
}

impl SyntaxErrors {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn push(&mut self, error: SyntaxError) {
        self.errors.push(error);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SyntaxError> {
        self.errors.iter()
    }

    /// The plain messages, one per error.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }
}

impl<'a> IntoIterator for &'a SyntaxErrors {
    type Item = &'a SyntaxError;
    type IntoIter = std::slice::Iter<'a, SyntaxError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::UNEXPECTED_TOKEN.to_string(), "E100");
        assert_eq!(ErrorCode::NESTING_LIMIT_EXCEEDED.to_string(), "E103");
    }

    #[test]
    fn test_syntax_error_displays_message_only() {
        let err = SyntaxError::new(
            ErrorCode::UNEXPECTED_TOKEN,
            "Expected next token to be ), got EOF instead.",
            Span::point(1, 8),
        );
        assert_eq!(err.to_string(), "Expected next token to be ), got EOF instead.");
    }

    #[test]
    fn test_syntax_errors_collects_in_order() {
        let mut errors = SyntaxErrors::empty();
        assert!(!errors.has_errors());
        errors.push(SyntaxError::new(ErrorCode::NO_PREFIX_RULE, "first", Span::point(1, 1)));
        errors.push(SyntaxError::new(ErrorCode::INVALID_INTEGER, "second", Span::point(2, 1)));
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.messages(), vec!["first", "second"]);
    }

    #[test]
    fn test_syntax_error_json_shape() {
        let err = SyntaxError::new(ErrorCode::NO_PREFIX_RULE, "oops", Span::new(2, 3, 2, 4));
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], 101);
        assert_eq!(json["message"], "oops");
        assert_eq!(json["start_line"], 2);
        assert_eq!(json["end_col"], 4);
    }
}
