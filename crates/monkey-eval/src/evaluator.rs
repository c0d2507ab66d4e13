//! Core expression and statement evaluator.

use std::rc::Rc;

use monkey_types::ast::*;

use crate::builtins;
use crate::env::{Env, Environment};
use crate::error::{EvalError, EvalResult};
use crate::object::{Function, Object};

/// Nested user-function calls allowed before evaluation stops.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Remaining native stack below which a call grows the stack (stacker red zone).
const RED_ZONE: usize = 128 * 1024;
/// Size of each stack extension.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// The tree-walking evaluator: walks AST nodes against an environment and
/// produces Objects.
#[derive(Debug, Clone)]
pub struct Evaluator {
    /// Current user-function call depth.
    depth: usize,
    max_depth: usize,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// Create an evaluator with the default call-depth limit.
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    /// Create an evaluator that allows at most `max_depth` nested calls.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            depth: 0,
            max_depth,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Evaluate a program and fold the outcome into a single Object.
    ///
    /// A top-level `return` yields its value; a runtime error yields
    /// [`Object::Error`].
    pub fn eval(&mut self, program: &Program, env: &Env) -> Object {
        match self.eval_program(program, env) {
            Ok(value) | Err(EvalError::Return(value)) => value,
            Err(err) => {
                tracing::debug!(error = %err, "evaluation failed");
                Object::Error(err.to_string())
            }
        }
    }

    /// Evaluate a program's statements in order; the value is the last
    /// statement's. A `return` surfaces as `Err(EvalError::Return)`.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn eval_program(&mut self, program: &Program, env: &Env) -> EvalResult<Object> {
        self.depth = 0;
        self.eval_statements(&program.statements, env)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Statements
    // ══════════════════════════════════════════════════════════════════════

    /// Run statements in order, stopping at the first error or `return`.
    /// Returns the last statement's value, or Null when there are none.
    pub fn eval_statements(&mut self, statements: &[Statement], env: &Env) -> EvalResult<Object> {
        let mut last = Object::Null;
        for statement in statements {
            last = self.eval_statement(statement, env)?;
        }
        Ok(last)
    }

    /// Execute a single statement. `let` yields Null.
    pub fn eval_statement(&mut self, statement: &Statement, env: &Env) -> EvalResult<Object> {
        match statement {
            Statement::Let(stmt) => {
                let value = self.eval_expression(&stmt.value, env)?;
                env.borrow_mut().set(stmt.name.value.as_str(), value);
                Ok(Object::Null)
            }
            Statement::Return(stmt) => {
                let value = self.eval_expression(&stmt.value, env)?;
                Err(EvalError::Return(value))
            }
            Statement::Expression(stmt) => self.eval_expression(&stmt.expression, env),
            // Bare blocks share the surrounding scope.
            Statement::Block(block) => stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, || {
                self.eval_statements(&block.statements, env)
            }),
        }
    }

    fn eval_block(&mut self, block: &BlockStatement, env: &Env) -> EvalResult<Object> {
        self.eval_statements(&block.statements, env)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expressions
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate an expression to an Object.
    pub fn eval_expression(&mut self, expr: &Expression, env: &Env) -> EvalResult<Object> {
        match expr {
            Expression::Identifier(ident) => self.eval_identifier(ident, env),
            Expression::Integer(lit) => Ok(Object::Integer(lit.value)),
            Expression::String(lit) => Ok(Object::String(lit.value.clone())),
            Expression::Boolean(lit) => Ok(Object::Boolean(lit.value)),

            Expression::Prefix(prefix) => {
                let right = self.eval_expression(&prefix.right, env)?;
                eval_prefix(prefix.operator, right)
            }
            Expression::Infix(infix) => {
                let left = self.eval_expression(&infix.left, env)?;
                let right = self.eval_expression(&infix.right, env)?;
                eval_infix(infix.operator, left, right)
            }

            Expression::If(if_expr) => self.eval_if(if_expr, env),
            Expression::Function(func) => Ok(Object::Function(Rc::new(Function {
                parameters: func.parameters.clone(),
                body: Rc::clone(&func.body),
                env: Rc::clone(env),
            }))),
            Expression::Call(call) => {
                let function = self.eval_expression(&call.function, env)?;
                let arguments = self.eval_expressions(&call.arguments, env)?;
                self.apply_function(function, arguments)
            }

            Expression::Array(array) => {
                let elements = self.eval_expressions(&array.elements, env)?;
                Ok(Object::array(elements))
            }
            Expression::Index(index) => {
                let left = self.eval_expression(&index.left, env)?;
                let index = self.eval_expression(&index.index, env)?;
                eval_index(left, index)
            }
        }
    }

    /// Environment chain first, then builtins.
    fn eval_identifier(&self, ident: &Identifier, env: &Env) -> EvalResult<Object> {
        if let Some(value) = env.borrow().get(&ident.value) {
            return Ok(value);
        }
        builtins::lookup(&ident.value)
            .map(Object::Builtin)
            .ok_or_else(|| EvalError::IdentifierNotFound(ident.value.clone()))
    }

    /// Left to right; the first error wins.
    fn eval_expressions(&mut self, exprs: &[Expression], env: &Env) -> EvalResult<Vec<Object>> {
        let mut values = Vec::with_capacity(exprs.len());
        for expr in exprs {
            values.push(self.eval_expression(expr, env)?);
        }
        Ok(values)
    }

    fn eval_if(&mut self, if_expr: &IfExpression, env: &Env) -> EvalResult<Object> {
        let condition = self.eval_expression(&if_expr.condition, env)?;
        if condition.is_truthy() {
            self.eval_block(&if_expr.consequence, env)
        } else if let Some(alternative) = &if_expr.alternative {
            self.eval_block(alternative, env)
        } else {
            Ok(Object::Null)
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Calls
    // ══════════════════════════════════════════════════════════════════════

    /// Call a function or builtin with already evaluated arguments.
    pub fn apply_function(&mut self, function: Object, arguments: Vec<Object>) -> EvalResult<Object> {
        match function {
            Object::Function(func) => self.call_function(&func, arguments),
            Object::Builtin(builtin) => {
                tracing::trace!(builtin = builtin.name, args = arguments.len(), "builtin call");
                (builtin.func)(&arguments)
            }
            other => Err(EvalError::NotAFunction(other.type_name())),
        }
    }

    fn call_function(&mut self, func: &Function, arguments: Vec<Object>) -> EvalResult<Object> {
        if arguments.len() != func.parameters.len() {
            return Err(EvalError::WrongArity {
                want: func.parameters.len(),
                got: arguments.len(),
            });
        }
        if self.depth >= self.max_depth {
            return Err(EvalError::CallDepthExceeded(self.max_depth));
        }

        let mut scope = Environment::new_enclosed(Rc::clone(&func.env));
        for (param, arg) in func.parameters.iter().zip(arguments) {
            scope.set(param.value.as_str(), arg);
        }
        let scope = scope.into_shared();

        self.depth += 1;
        tracing::trace!(depth = self.depth, "call");
        let result = stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, || {
            self.eval_block(&func.body, &scope)
        });
        self.depth -= 1;

        match result {
            Err(EvalError::Return(value)) => Ok(value),
            other => other,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Operators
// ══════════════════════════════════════════════════════════════════════════

fn eval_prefix(operator: PrefixOp, right: Object) -> EvalResult<Object> {
    match (operator, right) {
        (PrefixOp::Not, right) => Ok(Object::Boolean(!right.is_truthy())),
        (PrefixOp::Neg, Object::Integer(n)) => Ok(Object::Integer(n.wrapping_neg())),
        (PrefixOp::Neg, right) => Err(EvalError::UnknownPrefixOperator {
            operator,
            operand: right.type_name(),
        }),
    }
}

fn eval_infix(operator: InfixOp, left: Object, right: Object) -> EvalResult<Object> {
    match (&left, &right) {
        (Object::Integer(a), Object::Integer(b)) => eval_integer_infix(operator, *a, *b),
        (Object::String(a), Object::String(b)) if operator == InfixOp::Add => {
            let mut joined = String::with_capacity(a.len() + b.len());
            joined.push_str(a);
            joined.push_str(b);
            Ok(Object::String(joined))
        }
        (Object::String(_), Object::String(_)) => Err(EvalError::UnknownInfixOperator {
            left: "STRING",
            operator,
            right: "STRING",
        }),
        _ => match operator {
            InfixOp::Eq => Ok(Object::Boolean(identical(&left, &right))),
            InfixOp::NotEq => Ok(Object::Boolean(!identical(&left, &right))),
            _ if left.type_name() != right.type_name() => Err(EvalError::TypeMismatch {
                left: left.type_name(),
                operator,
                right: right.type_name(),
            }),
            _ => Err(EvalError::UnknownInfixOperator {
                left: left.type_name(),
                operator,
                right: right.type_name(),
            }),
        },
    }
}

fn eval_integer_infix(operator: InfixOp, a: i64, b: i64) -> EvalResult<Object> {
    let value = match operator {
        InfixOp::Add => Object::Integer(a.wrapping_add(b)),
        InfixOp::Sub => Object::Integer(a.wrapping_sub(b)),
        InfixOp::Mul => Object::Integer(a.wrapping_mul(b)),
        InfixOp::Div => {
            if b == 0 {
                return Err(EvalError::DivisionByZero);
            }
            Object::Integer(a.wrapping_div(b))
        }
        InfixOp::Less => Object::Boolean(a < b),
        InfixOp::Greater => Object::Boolean(a > b),
        InfixOp::Eq => Object::Boolean(a == b),
        InfixOp::NotEq => Object::Boolean(a != b),
    };
    Ok(value)
}

/// `==` for operands that are not both integers or both strings.
/// Booleans and null compare by value; arrays and functions by identity.
fn identical(left: &Object, right: &Object) -> bool {
    match (left, right) {
        (Object::Boolean(a), Object::Boolean(b)) => a == b,
        (Object::Null, Object::Null) => true,
        (Object::Array(a), Object::Array(b)) => Rc::ptr_eq(a, b),
        (Object::Function(a), Object::Function(b)) => Rc::ptr_eq(a, b),
        (Object::Builtin(a), Object::Builtin(b)) => a == b,
        _ => false,
    }
}

/// `array[integer]`; out-of-range indices yield Null.
fn eval_index(left: Object, index: Object) -> EvalResult<Object> {
    match (&left, &index) {
        (Object::Array(elements), Object::Integer(i)) => Ok(usize::try_from(*i)
            .ok()
            .and_then(|i| elements.get(i))
            .cloned()
            .unwrap_or(Object::Null)),
        (Object::Array(_), other) => Err(EvalError::IndexNotSupported(other.type_name())),
        (other, _) => Err(EvalError::IndexNotSupported(other.type_name())),
    }
}
