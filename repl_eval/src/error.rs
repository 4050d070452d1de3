//! Evaluation error types
//!
//! Two classes, kept apart on purpose: a `SyntaxError` means the text was
//! rejected before anything ran, a `RuntimeError` means something ran and
//! faulted. Callers rely on the difference to pick an interpretation.

use std::fmt;
use thiserror::Error;

/// The source text is not valid in the requested grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (column {column})")]
pub struct SyntaxError {
    /// What was wrong
    pub message: String,
    /// 1-based character column where the problem was found
    pub column: usize,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, column: usize) -> Self {
        Self {
            message: message.into(),
            column,
        }
    }
}

/// Runtime fault category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Division or modulo by zero
    ZeroDivision,
    /// Undefined name
    Name,
    /// Operation applied to the wrong type
    Type,
    /// Right type, unusable value
    Value,
    /// Missing attribute on a namespace or value
    Attribute,
    /// Integer result does not fit
    Overflow,
    /// Result would exceed the evaluator's size limits
    Memory,
}

impl ErrorKind {
    /// Conventional exception name
    pub fn name(&self) -> &'static str {
        match self {
            Self::ZeroDivision => "ZeroDivisionError",
            Self::Name => "NameError",
            Self::Type => "TypeError",
            Self::Value => "ValueError",
            Self::Attribute => "AttributeError",
            Self::Overflow => "OverflowError",
            Self::Memory => "MemoryError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fault raised while evaluating
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
}

impl RuntimeError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn zero_division(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ZeroDivision, message)
    }

    pub fn undefined_name(name: &str) -> Self {
        Self::new(ErrorKind::Name, format!("name '{}' is not defined", name))
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Type, message)
    }

    pub fn value_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Value, message)
    }

    pub fn attribute_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Attribute, message)
    }

    pub fn overflow() -> Self {
        Self::new(ErrorKind::Overflow, "integer overflow")
    }
}

/// Any evaluation failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl EvalError {
    /// Returns true if the text was rejected before evaluation started
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_error_display_is_message_only() {
        let err = RuntimeError::zero_division("division by zero");
        assert_eq!(err.to_string(), "division by zero");
        assert_eq!(err.kind.name(), "ZeroDivisionError");
    }

    #[test]
    fn test_undefined_name_message() {
        assert_eq!(
            RuntimeError::undefined_name("x").to_string(),
            "name 'x' is not defined"
        );
    }

    #[test]
    fn test_syntax_error_display() {
        let err = SyntaxError::new("invalid syntax", 3);
        assert_eq!(err.to_string(), "invalid syntax (column 3)");
    }

    #[test]
    fn test_eval_error_classification() {
        let syntax: EvalError = SyntaxError::new("invalid syntax", 1).into();
        let runtime: EvalError = RuntimeError::overflow().into();
        assert!(syntax.is_syntax());
        assert!(!runtime.is_syntax());
        assert_eq!(runtime.to_string(), "integer overflow");
    }
}
