//! Monkey tree-walking evaluator.
//!
//! Executes a parsed [`Program`] directly against a chained
//! [`Environment`]. Runtime failures are first-class values: evaluation
//! never panics on bad input, it produces [`Object::Error`].

pub mod builtins;
pub mod env;
pub mod error;
pub mod evaluator;
pub mod object;

pub use env::{Env, Environment};
pub use error::{EvalError, EvalResult};
pub use evaluator::{Evaluator, DEFAULT_MAX_DEPTH};
pub use object::{Builtin, Function, Object};

use monkey_types::ast::Program;

/// Evaluate `program` against `env` with a default [`Evaluator`].
pub fn evaluate(program: &Program, env: &Env) -> Object {
    Evaluator::new().eval(program, env)
}

/// A fresh, empty top-level environment.
pub fn new_env() -> Env {
    Environment::new().into_shared()
}
