// ABOUTME: Environment module for managing variable bindings and lexical scopes

use crate::error::RuntimeError;
use crate::token::Token;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<String, Value>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates a new global environment with no parent.
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
        })
    }

    /// Creates a new child environment enclosed by `parent`.
    pub fn with_parent(parent: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(parent),
        })
    }

    /// Unconditionally binds `name` in this frame. Redefinition is allowed,
    /// in particular at the global scope.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.bindings.borrow_mut().insert(name.into(), value);
    }

    /// Looks up the nearest enclosing binding of `name.lexeme`.
    pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
        if let Some(value) = self.bindings.borrow().get(&name.lexeme) {
            return Ok(value.clone());
        }

        if let Some(parent) = &self.parent {
            return parent.get(name);
        }

        Err(undefined(name))
    }

    /// Mutates the nearest enclosing binding of `name.lexeme`.
    pub fn assign(&self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        if self.bindings.borrow().contains_key(&name.lexeme) {
            self.bindings.borrow_mut().insert(name.lexeme.clone(), value);
            return Ok(());
        }

        if let Some(parent) = &self.parent {
            return parent.assign(name, value);
        }

        Err(undefined(name))
    }
}

fn undefined(name: &Token) -> RuntimeError {
    RuntimeError::new(name.clone(), format!("Undefined variable '{}'.", name.lexeme))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenType;

    fn ident(name: &str) -> Token {
        Token::new(TokenType::Identifier, name.to_string(), None, 1)
    }

    #[test]
    fn define_and_get() {
        let env = Environment::new();
        env.define("x", Value::Number(42.0));
        assert_eq!(env.get(&ident("x")).unwrap(), Value::Number(42.0));
    }

    #[test]
    fn get_undefined_is_a_runtime_error() {
        let env = Environment::new();
        let err = env.get(&ident("missing")).unwrap_err();
        assert_eq!(err.message, "Undefined variable 'missing'.");
    }

    #[test]
    fn child_shadows_parent() {
        let parent = Environment::new();
        parent.define("x", Value::Number(1.0));
        let child = Environment::with_parent(parent);
        child.define("x", Value::Number(2.0));
        assert_eq!(child.get(&ident("x")).unwrap(), Value::Number(2.0));
    }

    #[test]
    fn child_sees_parent_binding() {
        let parent = Environment::new();
        parent.define("x", Value::Number(1.0));
        let child = Environment::with_parent(parent);
        assert_eq!(child.get(&ident("x")).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn assign_mutates_nearest_enclosing_binding() {
        let parent = Environment::new();
        parent.define("x", Value::Number(1.0));
        let child = Environment::with_parent(parent.clone());

        child.assign(&ident("x"), Value::Number(9.0)).unwrap();

        assert_eq!(parent.get(&ident("x")).unwrap(), Value::Number(9.0));
        assert_eq!(child.get(&ident("x")).unwrap(), Value::Number(9.0));
    }

    #[test]
    fn assign_undefined_is_a_runtime_error() {
        let env = Environment::new();
        assert!(env.assign(&ident("missing"), Value::Nil).is_err());
    }

    #[test]
    fn redefinition_shadows_in_the_same_scope() {
        let env = Environment::new();
        env.define("x", Value::Number(1.0));
        env.define("x", Value::Number(2.0));
        assert_eq!(env.get(&ident("x")).unwrap(), Value::Number(2.0));
    }
}
