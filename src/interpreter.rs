// ABOUTME: Tree-walking evaluator — executes a parsed program against an environment chain

use crate::ast::{Expr, Stmt};
use crate::callable::{clock, Callable, LoxFunction};
use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::token::{Token, TokenType};
use crate::value::Value;
use std::rc::Rc;

pub struct Interpreter {
    pub globals: Rc<Environment>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        let globals = Environment::new();
        globals.define("clock", Value::Callable(clock()));
        Interpreter { globals }
    }

    /// Executes a program's statements against the global environment, in
    /// source order, stopping at the first runtime error.
    pub fn interpret(&self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        self.execute_block(statements, &self.globals)
    }

    fn execute(&self, stmt: &Stmt, env: &Rc<Environment>) -> Result<(), RuntimeError> {
        match stmt {
            Stmt::Expression { expression } => {
                self.evaluate(expression, env)?;
                Ok(())
            }
            Stmt::Print { expression } => {
                let value = self.evaluate(expression, env)?;
                println!("{value}");
                Ok(())
            }
            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr, env)?,
                    None => Value::Nil,
                };
                env.define(name.lexeme.clone(), value);
                Ok(())
            }
            Stmt::Block { statements } => {
                let block_env = Environment::with_parent(env.clone());
                self.execute_block(statements, &block_env)
            }
            Stmt::If { condition, then_branch, else_branch } => {
                if self.evaluate(condition, env)?.is_truthy() {
                    self.execute(then_branch, env)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch, env)
                } else {
                    Ok(())
                }
            }
            Stmt::While { condition, body } => {
                while self.evaluate(condition, env)?.is_truthy() {
                    self.execute(body, env)?;
                }
                Ok(())
            }
            Stmt::Function { name, params, body } => {
                let function = LoxFunction {
                    name: name.clone(),
                    params: params.clone(),
                    body: Rc::new(body.clone()),
                    globals: self.globals.clone(),
                };
                env.define(name.lexeme.clone(), Value::Callable(Callable::User(Rc::new(function))));
                Ok(())
            }
        }
    }

    /// Runs `statements` with `env` as the active environment. The caller's
    /// own environment is never touched — passing a fresh child frame here
    /// and never mutating a shared "current" pointer is what gives block
    /// scopes their restore-on-every-exit-path guarantee (spec.md §5, §8)
    /// for free: a propagated error simply drops `env` along with the
    /// stack frame that created it.
    pub fn execute_block(&self, statements: &[Stmt], env: &Rc<Environment>) -> Result<(), RuntimeError> {
        for stmt in statements {
            self.execute(stmt, env)?;
        }
        Ok(())
    }

    fn evaluate(&self, expr: &Expr, env: &Rc<Environment>) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal { value } => Ok(value.clone()),
            Expr::Grouping { expression } => self.evaluate(expression, env),
            Expr::Variable { name } => env.get(name),
            Expr::Assign { name, value } => {
                let value = self.evaluate(value, env)?;
                env.assign(name, value.clone())?;
                Ok(value)
            }
            Expr::Unary { operator, right } => self.evaluate_unary(operator, right, env),
            Expr::Binary { left, operator, right } => self.evaluate_binary(left, operator, right, env),
            Expr::Logical { left, operator, right } => self.evaluate_logical(left, operator, right, env),
            Expr::Call { callee, paren, arguments } => self.evaluate_call(callee, paren, arguments, env),
        }
    }

    fn evaluate_unary(&self, operator: &Token, right: &Expr, env: &Rc<Environment>) -> Result<Value, RuntimeError> {
        let right = self.evaluate(right, env)?;
        match operator.token_type {
            TokenType::Bang => Ok(Value::Bool(!right.is_truthy())),
            TokenType::Minus => Ok(Value::Number(-check_number_operand(operator, &right)?)),
            _ => unreachable!("unary operator must be ! or -"),
        }
    }

    fn evaluate_binary(
        &self,
        left: &Expr,
        operator: &Token,
        right: &Expr,
        env: &Rc<Environment>,
    ) -> Result<Value, RuntimeError> {
        let left = self.evaluate(left, env)?;
        let right = self.evaluate(right, env)?;

        match operator.token_type {
            TokenType::Minus => {
                let (a, b) = check_number_operands(operator, &left, &right)?;
                Ok(Value::Number(a - b))
            }
            TokenType::Slash => {
                let (a, b) = check_number_operands(operator, &left, &right)?;
                Ok(Value::Number(a / b))
            }
            TokenType::Star => {
                let (a, b) = check_number_operands(operator, &left, &right)?;
                Ok(Value::Number(a * b))
            }
            TokenType::Greater => {
                let (a, b) = check_number_operands(operator, &left, &right)?;
                Ok(Value::Bool(a > b))
            }
            TokenType::GreaterEqual => {
                let (a, b) = check_number_operands(operator, &left, &right)?;
                Ok(Value::Bool(a >= b))
            }
            TokenType::Less => {
                let (a, b) = check_number_operands(operator, &left, &right)?;
                Ok(Value::Bool(a < b))
            }
            TokenType::LessEqual => {
                let (a, b) = check_number_operands(operator, &left, &right)?;
                Ok(Value::Bool(a <= b))
            }
            TokenType::BangEqual => Ok(Value::Bool(left != right)),
            TokenType::EqualEqual => Ok(Value::Bool(left == right)),
            TokenType::Plus => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{a}{b}"))),
                _ => Err(RuntimeError::new(
                    operator.clone(),
                    "Operands must be two numbers or two strings.",
                )),
            },
            _ => unreachable!("binary operator must be one of the arithmetic/comparison/equality set"),
        }
    }

    /// Short-circuits: `or` returns its left operand unchanged (not coerced
    /// to Bool) when truthy; `and` returns its left operand unchanged when
    /// falsy. Neither evaluates the right operand in that case.
    fn evaluate_logical(
        &self,
        left: &Expr,
        operator: &Token,
        right: &Expr,
        env: &Rc<Environment>,
    ) -> Result<Value, RuntimeError> {
        let left = self.evaluate(left, env)?;

        if operator.token_type == TokenType::Or {
            if left.is_truthy() {
                return Ok(left);
            }
        } else if !left.is_truthy() {
            return Ok(left);
        }

        self.evaluate(right, env)
    }

    fn evaluate_call(
        &self,
        callee: &Expr,
        paren: &Token,
        arguments: &[Expr],
        env: &Rc<Environment>,
    ) -> Result<Value, RuntimeError> {
        let callee = self.evaluate(callee, env)?;

        let mut args = Vec::with_capacity(arguments.len());
        for argument in arguments {
            args.push(self.evaluate(argument, env)?);
        }

        let Value::Callable(callable) = callee else {
            return Err(RuntimeError::new(paren.clone(), "Can only call functions and classes."));
        };

        if args.len() != callable.arity() {
            return Err(RuntimeError::new(
                paren.clone(),
                format!("Expected {} arguments but got {}.", callable.arity(), args.len()),
            ));
        }

        match callable {
            Callable::Native(native) => (native.func)(&args),
            Callable::User(function) => self.call_user_function(&function, args),
        }
    }

    /// Per spec.md §4.7/§9, the call frame is enclosed by the **global**
    /// environment, not the environment active at the call site or at the
    /// function's definition — this mirrors the source's behavior rather
    /// than implementing standard Lox lexical closures.
    fn call_user_function(&self, function: &Rc<LoxFunction>, args: Vec<Value>) -> Result<Value, RuntimeError> {
        let call_env = Environment::with_parent(function.globals.clone());
        for (param, arg) in function.params.iter().zip(args) {
            call_env.define(param.lexeme.clone(), arg);
        }
        self.execute_block(&function.body, &call_env)?;
        Ok(Value::Nil)
    }
}

fn check_number_operand(operator: &Token, operand: &Value) -> Result<f64, RuntimeError> {
    match operand {
        Value::Number(n) => Ok(*n),
        _ => Err(RuntimeError::new(operator.clone(), "Operand must be a number.")),
    }
}

fn check_number_operands(operator: &Token, left: &Value, right: &Value) -> Result<(f64, f64), RuntimeError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
        _ => Err(RuntimeError::new(operator.clone(), "Operands must be a number.")),
    }
}
