//! Chained variable environment for the Monkey evaluator.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::object::Object;

/// Shared handle to an environment. Closures keep their defining
/// environment alive through one of these.
pub type Env = Rc<RefCell<Environment>>;

/// One scope level plus an optional link to the enclosing scope.
///
/// Lookups search this scope first and then walk outward.
/// `set` always binds in this scope, shadowing any outer binding.
#[derive(Default)]
pub struct Environment {
    store: HashMap<String, Object>,
    outer: Option<Env>,
}

impl Environment {
    /// Create an empty top-level environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty scope whose lookups fall back to `outer`.
    pub fn new_enclosed(outer: Env) -> Self {
        Self {
            store: HashMap::new(),
            outer: Some(outer),
        }
    }

    /// Wrap in a shared handle.
    pub fn into_shared(self) -> Env {
        Rc::new(RefCell::new(self))
    }

    /// Look up a name, innermost scope first.
    pub fn get(&self, name: &str) -> Option<Object> {
        match self.store.get(name) {
            Some(value) => Some(value.clone()),
            None => self.outer.as_ref().and_then(|outer| outer.borrow().get(name)),
        }
    }

    /// Bind `name` in this scope.
    pub fn set(&mut self, name: impl Into<String>, value: Object) {
        self.store.insert(name.into(), value);
    }

    /// Names bound in this scope, sorted.
    pub fn local_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.store.keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for Environment {
    // Bindings may hold closures that point back at this environment.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("names", &self.local_names())
            .field("has_outer", &self.outer.is_some())
            .finish()
    }
}
