//! Builtin functions: `len`, `first`, `last`, `rest`, `push`.
//!
//! Looked up only after the environment chain misses, so a user binding
//! with the same name shadows the builtin.

use crate::error::{EvalError, EvalResult};
use crate::object::{Builtin, Object};

/// Every builtin, in registration order.
pub const BUILTINS: &[Builtin] = &[
    Builtin { name: "len", func: len },
    Builtin { name: "first", func: first },
    Builtin { name: "last", func: last },
    Builtin { name: "rest", func: rest },
    Builtin { name: "push", func: push },
];

/// Find a builtin by name.
pub fn lookup(name: &str) -> Option<Builtin> {
    BUILTINS.iter().find(|b| b.name == name).copied()
}

fn check_arity(args: &[Object], want: usize) -> EvalResult<()> {
    if args.len() == want {
        Ok(())
    } else {
        Err(EvalError::WrongArgumentCount {
            got: args.len(),
            want,
        })
    }
}

/// The single array argument of `first`/`last`/`rest`.
fn array_arg<'a>(builtin: &'static str, args: &'a [Object]) -> EvalResult<&'a [Object]> {
    check_arity(args, 1)?;
    match &args[0] {
        Object::Array(elements) => Ok(elements.as_slice()),
        other => Err(EvalError::ExpectedArray {
            builtin,
            got: other.type_name(),
        }),
    }
}

/// Length of a string (in characters) or an array.
fn len(args: &[Object]) -> EvalResult<Object> {
    check_arity(args, 1)?;
    let n = match &args[0] {
        Object::String(s) => s.chars().count(),
        Object::Array(elements) => elements.len(),
        other => {
            return Err(EvalError::UnsupportedArgument {
                builtin: "len",
                got: other.type_name(),
            })
        }
    };
    Ok(Object::Integer(n as i64))
}

fn first(args: &[Object]) -> EvalResult<Object> {
    let elements = array_arg("first", args)?;
    Ok(elements.first().cloned().unwrap_or(Object::Null))
}

fn last(args: &[Object]) -> EvalResult<Object> {
    let elements = array_arg("last", args)?;
    Ok(elements.last().cloned().unwrap_or(Object::Null))
}

/// Everything after the first element, as a new array; `null` when empty.
fn rest(args: &[Object]) -> EvalResult<Object> {
    let elements = array_arg("rest", args)?;
    match elements.split_first() {
        Some((_, tail)) => Ok(Object::array(tail.to_vec())),
        None => Ok(Object::Null),
    }
}

/// A new array with the value appended; the argument is left untouched.
fn push(args: &[Object]) -> EvalResult<Object> {
    check_arity(args, 2)?;
    match &args[0] {
        Object::Array(elements) => {
            let mut extended = Vec::with_capacity(elements.len() + 1);
            extended.extend(elements.iter().cloned());
            extended.push(args[1].clone());
            Ok(Object::array(extended))
        }
        other => Err(EvalError::ExpectedArray {
            builtin: "push",
            got: other.type_name(),
        }),
    }
}
