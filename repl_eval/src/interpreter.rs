//! Tree-walking interpreter

use crate::ast::{BoolOp, Expr, Stmt};
use crate::environment::Environment;
use crate::error::{EvalError, RuntimeError};
use crate::ops;
use crate::parser::{parse_expression, parse_program};
use crate::value::{Args, Output, Value};
use crate::Evaluator;
use log::{debug, trace};

/// Interpreter over a persistent environment
#[derive(Debug, Clone)]
pub struct Interpreter {
    env: Environment,
    output: Output,
}

impl Interpreter {
    /// Creates an interpreter with the core builtins bound
    pub fn new() -> Self {
        Self::with_environment(Environment::with_builtins())
    }

    pub fn with_environment(env: Environment) -> Self {
        Self {
            env,
            output: Output::new(),
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    fn lookup(&self, name: &str) -> Result<Value, RuntimeError> {
        self.env
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::undefined_name(name))
    }

    fn eval(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::None => Ok(Value::None),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Int(i) => Ok(Value::Int(*i)),
            Expr::Float(x) => Ok(Value::Float(*x)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Name(name) => self.lookup(name),
            Expr::Attribute { target, name } => {
                let target = self.eval(target)?;
                attribute(&target, name)
            }
            Expr::Call {
                func,
                args,
                keywords,
            } => {
                let callee = self.eval(func)?;
                let mut call_args = Args::default();
                for arg in args {
                    call_args.positional.push(self.eval(arg)?);
                }
                for (key, arg) in keywords {
                    call_args.keywords.push((key.clone(), self.eval(arg)?));
                }
                match callee {
                    Value::Builtin(builtin) => {
                        trace!("calling {}", builtin.name());
                        builtin.call(&mut self.output, call_args)
                    }
                    other => Err(RuntimeError::type_error(format!(
                        "'{}' object is not callable",
                        other.type_name()
                    ))),
                }
            }
            Expr::Unary { op, operand } => {
                let value = self.eval(operand)?;
                ops::unary(*op, &value)
            }
            Expr::Binary { op, left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                ops::binary(*op, &left, &right)
            }
            Expr::Compare { first, rest } => {
                let mut left = self.eval(first)?;
                for (op, operand) in rest {
                    let right = self.eval(operand)?;
                    if !ops::compare(*op, &left, &right)? {
                        return Ok(Value::Bool(false));
                    }
                    left = right;
                }
                Ok(Value::Bool(true))
            }
            Expr::Logical { op, left, right } => {
                let left = self.eval(left)?;
                let short_circuit = match op {
                    BoolOp::And => !left.is_truthy(),
                    BoolOp::Or => left.is_truthy(),
                };
                if short_circuit {
                    Ok(left)
                } else {
                    self.eval(right)
                }
            }
        }
    }

    fn exec(&mut self, stmt: &Stmt) -> Result<(), RuntimeError> {
        match stmt {
            Stmt::Expr(expr) => {
                self.eval(expr)?;
            }
            Stmt::Assign { name, value } => {
                let value = self.eval(value)?;
                self.env.set(name.clone(), value);
            }
            Stmt::AugAssign { name, op, value } => {
                let current = self.lookup(name)?;
                let rhs = self.eval(value)?;
                let updated = ops::binary(*op, &current, &rhs)?;
                self.env.set(name.clone(), updated);
            }
            Stmt::Del(names) => {
                for name in names {
                    if self.env.remove(name).is_none() {
                        return Err(RuntimeError::undefined_name(name));
                    }
                }
            }
            Stmt::Pass => {}
        }
        Ok(())
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn attribute(target: &Value, name: &str) -> Result<Value, RuntimeError> {
    match target {
        Value::Namespace(ns) => ns.get(name).cloned().ok_or_else(|| {
            RuntimeError::attribute_error(format!(
                "module '{}' has no attribute '{}'",
                ns.name(),
                name
            ))
        }),
        other => Err(RuntimeError::attribute_error(format!(
            "'{}' object has no attribute '{}'",
            other.type_name(),
            name
        ))),
    }
}

impl Evaluator for Interpreter {
    fn eval_expression(&mut self, source: &str) -> Result<Option<Value>, EvalError> {
        let expr = parse_expression(source)?;
        let value = self.eval(&expr)?;
        debug!("expression evaluated to {}", value.type_name());
        Ok(if value.is_none() { None } else { Some(value) })
    }

    fn exec_statements(&mut self, source: &str) -> Result<(), EvalError> {
        let program = parse_program(source)?;
        debug!("executing {} statement(s)", program.len());
        for stmt in &program {
            self.exec(stmt)?;
        }
        Ok(())
    }

    fn take_output(&mut self) -> Vec<String> {
        self.output.take()
    }
}
