use crate::object::Object;
use std::{cell::RefCell, collections::HashMap, rc::Rc};

/// Shared handle to a scope. Function values keep the scope they were created
/// in alive through one of these.
pub type Env = Rc<RefCell<Environment>>;

#[derive(Default, Debug)]
pub struct Environment {
    store: HashMap<String, Object>,
    outer: Option<Env>,
}

impl Environment {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn new_shared() -> Env {
        Rc::new(RefCell::new(Self::new()))
    }

    /// A fresh scope whose lookups fall back to `outer`.
    pub fn extend(outer: &Env) -> Env {
        Rc::new(RefCell::new(Environment {
            store: HashMap::new(),
            outer: Some(Rc::clone(outer)),
        }))
    }

    /// Always binds in this scope, shadowing any binding of the same name
    /// further out.
    pub fn set(&mut self, key: &str, value: Object) {
        self.store.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<Object> {
        match self.store.get(key) {
            Some(value) => Some(value.clone()),
            None => self.outer.as_ref().and_then(|outer| outer.borrow().get(key)),
        }
    }
}
