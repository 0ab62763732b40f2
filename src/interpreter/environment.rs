use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use crate::interpreter::object::Object;

pub type Env = Rc<RefCell<Environment>>;

/// One lexical scope.
///
/// Scopes are shared: a function value keeps the scope it was defined in alive, and that scope
/// may in turn hold the function. Such cycles are never broken and live until the process exits.
#[derive(Debug, Default)]
pub struct Environment {
    store: HashMap<String, Object>,
    outer: Option<Env>,
}

impl Environment {
    pub fn new_global() -> Env {
        Rc::new(RefCell::new(Environment::default()))
    }

    pub fn new_enclosed(outer: Env) -> Env {
        Rc::new(RefCell::new(Environment {
            store: HashMap::new(),
            outer: Some(outer),
        }))
    }

    pub fn get(&self, name: &str) -> Option<Object> {
        self.store.get(name).cloned()
            .or_else(|| self.outer.as_ref().and_then(|outer| outer.borrow().get(name)))
    }

    // Always binds in this scope, shadowing any outer binding
    pub fn set(&mut self, name: impl Into<String>, value: Object) {
        self.store.insert(name.into(), value);
    }
}

pub fn make_environment() -> Env {
    Environment::new_global()
}

pub fn make_enclosed_environment(outer: &Env) -> Env {
    Environment::new_enclosed(Rc::clone(outer))
}

#[cfg(test)]
mod tests {
    use crate::interpreter::object::{NULL, TRUE};
    use super::*;

    #[test]
    fn test_lookup_walks_outward() {
        let global = make_environment();
        global.borrow_mut().set("a", Object::Integer(1));
        global.borrow_mut().set("b", TRUE);

        let inner = make_enclosed_environment(&global);
        inner.borrow_mut().set("a", Object::Integer(2));

        assert_eq!(Some(Object::Integer(2)), inner.borrow().get("a"));
        assert_eq!(Some(TRUE), inner.borrow().get("b"));
        assert_eq!(None, inner.borrow().get("c"));

        assert_eq!(Some(Object::Integer(1)), global.borrow().get("a"));
        assert_eq!(None, global.borrow().get("c"));
    }

    #[test]
    fn test_set_overwrites_in_same_scope() {
        let env = make_environment();
        env.borrow_mut().set("x", Object::Integer(1));
        env.borrow_mut().set("x", NULL);

        assert_eq!(Some(NULL), env.borrow().get("x"));
    }
}
