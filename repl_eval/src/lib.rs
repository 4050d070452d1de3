//! # REPL Evaluator
//!
//! A small expression/statement interpreter for the handheld REPL.
//!
//! ## Grammar
//!
//! A dynamically typed, Python-flavored subset: numbers, strings, booleans
//! and `None`; arithmetic, comparisons and boolean logic; calls to
//! built-in functions; attribute access on host namespaces; and
//! `;`-separated statements (`name = expr`, augmented assignment, `del`,
//! `pass`, expression statements).
//!
//! ## Evaluation model
//!
//! Callers see two entry points. `eval_expression` accepts exactly one
//! expression and yields its value; `exec_statements` runs statements for
//! their effects. Both read and write one persistent `Environment`. Text
//! printed during either call is buffered until `take_output`.

pub mod ast;
pub mod builtins;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod ops;
pub mod parser;
pub mod value;

pub use environment::Environment;
pub use error::{ErrorKind, EvalError, RuntimeError, SyntaxError};
pub use interpreter::Interpreter;
pub use value::{Args, Builtin, Namespace, Output, Value, MAX_STRING_LEN};

/// An interpreter the console can drive
///
/// Implementations must keep state between calls: a name bound by
/// `exec_statements` is visible to later calls of either method.
pub trait Evaluator {
    /// Evaluates `source` as a single expression
    ///
    /// Returns `Ok(None)` when the expression produced no value. Text that
    /// is not an expression fails with `EvalError::Syntax`.
    fn eval_expression(&mut self, source: &str) -> Result<Option<Value>, EvalError>;

    /// Executes `source` as a statement sequence
    fn exec_statements(&mut self, source: &str) -> Result<(), EvalError>;

    /// Drains text printed since the last call
    fn take_output(&mut self) -> Vec<String>;
}

impl<E: Evaluator + ?Sized> Evaluator for Box<E> {
    fn eval_expression(&mut self, source: &str) -> Result<Option<Value>, EvalError> {
        (**self).eval_expression(source)
    }

    fn exec_statements(&mut self, source: &str) -> Result<(), EvalError> {
        (**self).exec_statements(source)
    }

    fn take_output(&mut self) -> Vec<String> {
        (**self).take_output()
    }
}
