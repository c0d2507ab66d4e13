//! Runtime error types for the Monkey evaluator.

use monkey_types::ast::{InfixOp, PrefixOp};

use crate::object::Object;

/// Evaluation error: everything that stops a statement list early.
///
/// `Display` yields the message shown to users after `ERROR: `.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    /// Name bound neither in the environment chain nor as a builtin.
    #[error("identifier not found: {0}")]
    IdentifierNotFound(String),
    #[error("unknown operator: {operator}{operand}")]
    UnknownPrefixOperator {
        operator: PrefixOp,
        operand: &'static str,
    },
    #[error("unknown operator: {left} {operator} {right}")]
    UnknownInfixOperator {
        left: &'static str,
        operator: InfixOp,
        right: &'static str,
    },
    /// Infix operands of different types.
    #[error("type mismatch: {left} {operator} {right}")]
    TypeMismatch {
        left: &'static str,
        operator: InfixOp,
        right: &'static str,
    },
    #[error("division by zero")]
    DivisionByZero,
    #[error("not a function: {0}")]
    NotAFunction(&'static str),
    #[error("index operator not supported: {0}")]
    IndexNotSupported(&'static str),
    /// Builtin called with the wrong number of arguments.
    #[error("wrong number of arguments. got={got}, want={want}")]
    WrongArgumentCount { got: usize, want: usize },
    /// User function called with the wrong number of arguments.
    #[error("wrong number of arguments to function: want={want}, got={got}")]
    WrongArity { want: usize, got: usize },
    #[error("argument to `{builtin}` not supported, got {got}")]
    UnsupportedArgument {
        builtin: &'static str,
        got: &'static str,
    },
    #[error("argument to `{builtin}` must be ARRAY, got {got}")]
    ExpectedArray {
        builtin: &'static str,
        got: &'static str,
    },
    #[error("maximum call depth of {0} exceeded")]
    CallDepthExceeded(usize),
    /// `return` statement (used internally for control flow; never escapes
    /// a function call or [`crate::evaluate`]).
    #[error("return")]
    Return(Object),
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;
