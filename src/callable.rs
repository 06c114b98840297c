// ABOUTME: Callable values — built-in natives and user-defined Lox functions

use crate::ast::Stmt;
use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::token::Token;
use crate::value::Value;
use std::fmt;
use std::rc::Rc;
use std::time::Instant;

/// A capability over built-in and user-defined functions, invoked by Call
/// expressions. Modeled as a small tagged enum rather than a trait object,
/// per spec.md §9 — the built-in set is closed and fixed.
#[derive(Debug, Clone)]
pub enum Callable {
    Native(NativeFn),
    User(Rc<LoxFunction>),
}

impl Callable {
    pub fn arity(&self) -> usize {
        match self {
            Callable::Native(n) => n.arity,
            Callable::User(f) => f.params.len(),
        }
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Native(_) => write!(f, "<native fn>"),
            Callable::User(func) => write!(f, "<fn {}>", func.name.lexeme),
        }
    }
}

#[derive(Clone)]
pub struct NativeFn {
    pub name: &'static str,
    pub arity: usize,
    pub func: fn(&[Value]) -> Result<Value, RuntimeError>,
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFn").field("name", &self.name).finish()
    }
}

/// A user-defined function. Stores its declaration and, per spec.md §4.7 and
/// the Open Question resolution in DESIGN.md, the **global** environment —
/// not the environment active at the point of definition — as the scope its
/// call frame is nested under.
#[derive(Debug)]
pub struct LoxFunction {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Rc<Vec<Stmt>>,
    pub globals: Rc<Environment>,
}

/// Elapsed-seconds reading for the built-in `clock()`. Monotonic because it
/// is measured from a process-lifetime `Instant`, never the wall clock.
pub fn clock() -> Callable {
    thread_local! {
        static START: Instant = Instant::now();
    }

    Callable::Native(NativeFn {
        name: "clock",
        arity: 0,
        func: |_args| Ok(Value::Number(START.with(|start| start.elapsed().as_secs_f64()))),
    })
}
