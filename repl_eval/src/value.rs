//! Runtime values
//!
//! `Display` gives the `str()` form of every value, which is also the text
//! a REPL shows for an expression result.

use crate::error::RuntimeError;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Longest string a single operation may produce, in characters
pub const MAX_STRING_LEN: usize = 4096;

/// Collected `print` output, one entry per call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Output {
    lines: Vec<String>,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn print(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
    }

    /// Drains everything printed so far
    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Arguments of a call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    pub positional: Vec<Value>,
    pub keywords: Vec<(String, Value)>,
}

impl Args {
    pub fn positional(values: Vec<Value>) -> Self {
        Self {
            positional: values,
            keywords: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.positional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty()
    }

    /// Looks up a keyword argument
    pub fn keyword(&self, name: &str) -> Option<&Value> {
        self.keywords
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Fails if any keyword outside `allowed` was passed
    pub fn check_keywords(&self, func: &str, allowed: &[&str]) -> Result<(), RuntimeError> {
        match self
            .keywords
            .iter()
            .find(|(key, _)| !allowed.contains(&key.as_str()))
        {
            Some((key, _)) if allowed.is_empty() => Err(RuntimeError::type_error(format!(
                "{}() takes no keyword arguments (got '{}')",
                func, key
            ))),
            Some((key, _)) => Err(RuntimeError::type_error(format!(
                "'{}' is an invalid keyword argument for {}()",
                key, func
            ))),
            None => Ok(()),
        }
    }

    /// Fails unless the positional count is within `min..=max`
    pub fn check_arity(&self, func: &str, min: usize, max: usize) -> Result<(), RuntimeError> {
        let got = self.positional.len();
        if got < min || got > max {
            let expected = if min == max {
                format!("exactly {}", min)
            } else if got < min {
                format!("at least {}", min)
            } else {
                format!("at most {}", max)
            };
            return Err(RuntimeError::type_error(format!(
                "{}() takes {} argument(s) ({} given)",
                func, expected, got
            )));
        }
        Ok(())
    }
}

/// Native function signature
pub type NativeFn = dyn Fn(&mut Output, Args) -> Result<Value, RuntimeError>;

/// A host-provided callable
#[derive(Clone)]
pub struct Builtin {
    name: String,
    func: Rc<NativeFn>,
}

impl Builtin {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&mut Output, Args) -> Result<Value, RuntimeError> + 'static,
    {
        Self {
            name: name.into(),
            func: Rc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, output: &mut Output, args: Args) -> Result<Value, RuntimeError> {
        (self.func)(output, args)
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }
}

/// A named bag of attributes, such as `time` or `sys`
#[derive(Debug, Clone, PartialEq)]
pub struct Namespace {
    name: String,
    members: HashMap<String, Value>,
}

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: HashMap::new(),
        }
    }

    pub fn with(mut self, member: impl Into<String>, value: Value) -> Self {
        self.members.insert(member.into(), value);
        self
    }

    /// Adds a native function member
    pub fn with_function<F>(self, member: &str, func: F) -> Self
    where
        F: Fn(&mut Output, Args) -> Result<Value, RuntimeError> + 'static,
    {
        let qualified = format!("{}.{}", self.name, member);
        self.with(member, Value::Builtin(Builtin::new(qualified, func)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, member: &str) -> Option<&Value> {
        self.members.get(member)
    }
}

/// A value in the evaluator
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Builtin(Builtin),
    Namespace(Rc<Namespace>),
}

impl Value {
    /// Type name as reported in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "NoneType",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::Builtin(_) => "builtin_function_or_method",
            Self::Namespace(_) => "module",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Truth value
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::None => false,
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(x) => *x != 0.0,
            Self::Str(s) => !s.is_empty(),
            Self::Builtin(_) | Self::Namespace(_) => true,
        }
    }

    pub fn str(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }

    pub fn namespace(namespace: Namespace) -> Self {
        Self::Namespace(Rc::new(namespace))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => f.write_str(&format_float(*x)),
            Self::Str(s) => f.write_str(s),
            Self::Builtin(b) => write!(f, "<built-in function {}>", b.name()),
            Self::Namespace(ns) => write!(f, "<module '{}'>", ns.name()),
        }
    }
}

/// Shortest round-trip float text, in the REPL's conventional layout
///
/// Integral values keep a trailing `.0`; magnitudes of at least 1e16 or
/// below 1e-4 switch to exponent notation with a signed, two-digit exponent.
pub fn format_float(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = x.abs();
    if x != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{:e}", x);
        return match formatted.split_once('e') {
            Some((mantissa, exp)) => {
                let exp: i32 = exp.parse().unwrap_or(0);
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{}e{}{:02}", mantissa, sign, exp.abs())
            }
            None => formatted,
        };
    }

    if x == x.trunc() {
        format!("{:.1}", x)
    } else {
        format!("{}", x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_scalars() {
        assert_eq!(Value::None.to_string(), "None");
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(Value::Int(-42).to_string(), "-42");
        assert_eq!(Value::str("hi").to_string(), "hi");
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(2.0), "2.0");
        assert_eq!(format_float(0.5), "0.5");
        assert_eq!(format_float(-0.0), "-0.0");
        assert_eq!(format_float(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_float(1e16), "1e+16");
        assert_eq!(format_float(1.5e-5), "1.5e-05");
        assert_eq!(format_float(123456789.0), "123456789.0");
        assert_eq!(format_float(f64::INFINITY), "inf");
        assert_eq!(format_float(f64::NAN), "nan");
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::None.is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::str("").is_truthy());
        assert!(Value::Float(0.1).is_truthy());
        assert!(Value::namespace(Namespace::new("sys")).is_truthy());
    }

    #[test]
    fn test_builtin_identity_equality() {
        let a = Builtin::new("f", |_, _| Ok(Value::None));
        let b = Builtin::new("f", |_, _| Ok(Value::None));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(
            Value::Builtin(a).to_string(),
            "<built-in function f>"
        );
    }

    #[test]
    fn test_namespace_members() {
        let ns = Namespace::new("sys")
            .with("platform", Value::str("cardputer"))
            .with_function("ping", |_, _| Ok(Value::Bool(true)));
        assert_eq!(ns.get("platform"), Some(&Value::str("cardputer")));
        match ns.get("ping") {
            Some(Value::Builtin(b)) => assert_eq!(b.name(), "sys.ping"),
            other => panic!("unexpected member: {:?}", other),
        }
        assert_eq!(Value::namespace(ns).to_string(), "<module 'sys'>");
    }

    #[test]
    fn test_args_checks() {
        let args = Args::positional(vec![Value::Int(1)]);
        assert!(args.check_arity("abs", 1, 1).is_ok());
        assert!(args.check_arity("abs", 2, 2).is_err());
        assert!(args.check_keywords("abs", &[]).is_ok());

        let with_kw = Args {
            positional: Vec::new(),
            keywords: vec![("sep".to_string(), Value::str(","))],
        };
        assert!(with_kw.check_keywords("print", &["sep", "end"]).is_ok());
        let err = with_kw.check_keywords("abs", &[]).unwrap_err();
        assert!(err.message.contains("takes no keyword arguments"));
    }

    #[test]
    fn test_output_take_drains() {
        let mut out = Output::new();
        out.print("a");
        out.print("b");
        assert_eq!(out.take(), vec!["a", "b"]);
        assert!(out.is_empty());
    }
}
