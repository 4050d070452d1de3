//! Evaluator bridge
//!
//! Runs a submitted line against the interpreter and reduces the result to
//! an [`EvaluationOutcome`]. Evaluation failures never escape as errors.

use log::{debug, trace};
use repl_eval::{EvalError, Evaluator};
use std::fmt;

/// Result of one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluationOutcome {
    /// The line was an expression with a value, shown as text
    Value(String),
    /// The line ran but produced nothing to show
    NoValue,
    /// Evaluation failed
    Error(String),
}

impl EvaluationOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl fmt::Display for EvaluationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(text) => write!(f, "value {:?}", text),
            Self::NoValue => f.write_str("no value"),
            Self::Error(message) => write!(f, "error {:?}", message),
        }
    }
}

/// Two-phase evaluation over a persistent interpreter
pub struct EvaluatorBridge<E> {
    evaluator: E,
}

impl<E: Evaluator> EvaluatorBridge<E> {
    pub fn new(evaluator: E) -> Self {
        Self { evaluator }
    }

    /// Evaluates one line
    ///
    /// The line is first tried as an expression. Only a syntax rejection
    /// sends it to statement execution; a runtime fault in the expression
    /// phase is reported as-is.
    pub fn submit(&mut self, line: &str) -> EvaluationOutcome {
        let outcome = match self.evaluator.eval_expression(line) {
            Ok(Some(value)) => EvaluationOutcome::Value(value.to_string()),
            Ok(None) => EvaluationOutcome::NoValue,
            Err(EvalError::Runtime(err)) => EvaluationOutcome::Error(err.to_string()),
            Err(EvalError::Syntax(err)) => {
                trace!("not an expression ({}), executing as statements", err);
                match self.evaluator.exec_statements(line) {
                    Ok(()) => EvaluationOutcome::NoValue,
                    Err(err) => EvaluationOutcome::Error(err.to_string()),
                }
            }
        };
        debug!("submission {:?} -> {}", line, outcome);
        outcome
    }

    /// Drains text printed by the last submissions
    pub fn take_output(&mut self) -> Vec<String> {
        self.evaluator.take_output()
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    pub fn evaluator_mut(&mut self) -> &mut E {
        &mut self.evaluator
    }
}
