use crate::error::{LoxError, Result};
use crate::token::Token;
use crate::value::Value;
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared handle to a scope.  Blocks, calls and closures all hold these; a
/// scope lives as long as any of them still points at it.
pub type EnvRef = Rc<RefCell<Environment>>;

/// One scope in the chain: name → value, plus the enclosing scope.  The global
/// scope is the only one without an enclosing link.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<EnvRef>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: EnvRef) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Wraps a fresh child of `enclosing` in a shared handle.
    pub fn child_of(enclosing: &EnvRef) -> EnvRef {
        Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(enclosing))))
    }

    pub fn enclosing(&self) -> Option<EnvRef> {
        self.enclosing.clone()
    }

    /// Binds `name` in this scope, overwriting any previous binding here.
    pub fn define(&mut self, name: &str, value: Value) {
        debug!("define '{}' ({})", name, value.type_name());
        self.values.insert(name.to_string(), value);
    }

    /// Dynamic lookup through the chain.
    pub fn get(&self, name: &Token) -> Result<Value> {
        if let Some(value) = self.values.get(&name.lexeme) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(undefined(name))
        }
    }

    /// Updates the nearest existing binding; never creates one.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<()> {
        if let Some(slot) = self.values.get_mut(&name.lexeme) {
            *slot = value;
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(undefined(name))
        }
    }

    /// Reads `name` exactly `distance` scopes up, without searching.
    ///
    /// Returns `None` only if the resolver and the runtime chain disagree.
    pub fn get_at(&self, distance: usize, name: &str) -> Option<Value> {
        if distance == 0 {
            return self.values.get(name).cloned();
        }

        self.enclosing
            .as_ref()?
            .borrow()
            .get_at(distance - 1, name)
    }

    /// Writes `name` exactly `distance` scopes up.  Returns `false` when the
    /// chain is shorter than `distance`.
    pub fn assign_at(&mut self, distance: usize, name: &str, value: Value) -> bool {
        if distance == 0 {
            self.values.insert(name.to_string(), value);
            return true;
        }

        match &self.enclosing {
            Some(enclosing) => enclosing.borrow_mut().assign_at(distance - 1, name, value),
            None => false,
        }
    }

    /// Number of scopes between this one and the global scope.
    pub fn depth(&self) -> usize {
        match &self.enclosing {
            Some(enclosing) => 1 + enclosing.borrow().depth(),
            None => 0,
        }
    }
}

fn undefined(name: &Token) -> LoxError {
    LoxError::runtime(name, format!("Undefined variable '{}'.", name.lexeme))
}
