//! Runtime values.

use std::fmt;
use std::rc::Rc;

use monkey_types::ast::{BlockStatement, Identifier};

use crate::env::Env;
use crate::error::EvalResult;

/// Native implementation of a builtin; receives already evaluated arguments.
pub type BuiltinFn = fn(&[Object]) -> EvalResult<Object>;

/// A named native function.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// A closure: parameters and body plus the environment the literal was
/// evaluated in.
pub struct Function {
    pub parameters: Vec<Identifier>,
    pub body: Rc<BlockStatement>,
    pub env: Env,
}

impl fmt::Debug for Function {
    // The captured environment may contain this very function.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.parameters.iter().map(|p| p.value.as_str()).collect();
        f.debug_struct("Function")
            .field("parameters", &names)
            .field("body", &self.body.to_string())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("fn(")?;
        for (i, param) in self.parameters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&param.value)?;
        }
        write!(f, ") {}", self.body)
    }
}

/// A Monkey runtime value.
///
/// Arrays and functions are reference-counted: cloning an `Object` never
/// copies their contents.
#[derive(Debug, Clone)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    String(String),
    Array(Rc<Vec<Object>>),
    Null,
    Function(Rc<Function>),
    Builtin(Builtin),
    /// A runtime error surfaced as the result of a program.
    Error(String),
}

impl Object {
    pub fn array(elements: Vec<Object>) -> Self {
        Object::Array(Rc::new(elements))
    }

    /// Upper-case type tag used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Integer(_) => "INTEGER",
            Object::Boolean(_) => "BOOLEAN",
            Object::String(_) => "STRING",
            Object::Array(_) => "ARRAY",
            Object::Null => "NULL",
            Object::Function(_) => "FUNCTION",
            Object::Builtin(_) => "BUILTIN",
            Object::Error(_) => "ERROR",
        }
    }

    /// Only `null` and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Null | Object::Boolean(false))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Object::Error(_))
    }

    /// User-facing rendering, as printed by the front ends.
    pub fn inspect(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Integer(n) => write!(f, "{n}"),
            Object::Boolean(b) => write!(f, "{b}"),
            Object::String(s) => f.write_str(s),
            Object::Array(elements) => {
                f.write_str("[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{element}")?;
                }
                f.write_str("]")
            }
            Object::Null => f.write_str("null"),
            Object::Function(func) => write!(f, "{func}"),
            Object::Builtin(_) => f.write_str("builtin function"),
            Object::Error(message) => write!(f, "ERROR: {message}"),
        }
    }
}

/// Structural equality for hosts and tests. Functions compare by identity.
/// The language's own `==` lives in the evaluator.
impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Object::Integer(a), Object::Integer(b)) => a == b,
            (Object::Boolean(a), Object::Boolean(b)) => a == b,
            (Object::String(a), Object::String(b)) => a == b,
            (Object::Array(a), Object::Array(b)) => a == b,
            (Object::Null, Object::Null) => true,
            (Object::Function(a), Object::Function(b)) => Rc::ptr_eq(a, b),
            (Object::Builtin(a), Object::Builtin(b)) => a == b,
            (Object::Error(a), Object::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl From<i64> for Object {
    fn from(value: i64) -> Self {
        Object::Integer(value)
    }
}

impl From<bool> for Object {
    fn from(value: bool) -> Self {
        Object::Boolean(value)
    }
}

impl From<&str> for Object {
    fn from(value: &str) -> Self {
        Object::String(value.to_string())
    }
}
