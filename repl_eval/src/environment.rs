//! Persistent name bindings
//!
//! One environment lives for the whole session; every submission reads and
//! writes the same bindings.

use crate::builtins;
use crate::value::{Namespace, Value};
use std::collections::HashMap;

/// Name to value mapping shared by all evaluations
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: HashMap<String, Value>,
}

impl Environment {
    /// Creates an environment with no bindings at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates an environment holding the core builtins
    pub fn with_builtins() -> Self {
        let mut env = Self::empty();
        for builtin in builtins::core() {
            env.set(builtin.name().to_string(), Value::Builtin(builtin));
        }
        env
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    /// Removes a binding, returning its value if it existed
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.bindings.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Binds a namespace under its own name
    pub fn install(&mut self, namespace: Namespace) {
        let name = namespace.name().to_string();
        self.set(name, Value::namespace(namespace));
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
