//! Built-in functions and host namespaces

use crate::ast::CmpOp;
use crate::error::{ErrorKind, RuntimeError};
use crate::ops;
use crate::value::{Args, Builtin, Namespace, Output, Value};
use std::cmp::Ordering;
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Every core builtin, by name
pub fn core() -> Vec<Builtin> {
    vec![
        Builtin::new("print", print),
        Builtin::new("abs", abs),
        Builtin::new("min", |out: &mut Output, args| extreme("min", Ordering::Less, out, args)),
        Builtin::new("max", |out: &mut Output, args| {
            extreme("max", Ordering::Greater, out, args)
        }),
        Builtin::new("len", len),
        Builtin::new("str", to_str),
        Builtin::new("int", to_int),
        Builtin::new("float", to_float),
        Builtin::new("bool", to_bool),
        Builtin::new("round", round),
        Builtin::new("type", type_of),
    ]
}

/// `time` namespace; `monotonic()` counts seconds from `epoch`
pub fn time_namespace(epoch: Instant) -> Namespace {
    Namespace::new("time")
        .with_function("monotonic", move |_, args| {
            args.check_keywords("monotonic", &[])?;
            args.check_arity("monotonic", 0, 0)?;
            Ok(Value::Float(epoch.elapsed().as_secs_f64()))
        })
        .with_function("time", |_, args| {
            args.check_keywords("time", &[])?;
            args.check_arity("time", 0, 0)?;
            let since_epoch = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or(Duration::ZERO);
            Ok(Value::Float(since_epoch.as_secs_f64()))
        })
        .with_function("sleep", sleep)
}

/// Blocks the caller; nothing interrupts it
fn sleep(_: &mut Output, args: Args) -> Result<Value, RuntimeError> {
    let seconds = match single("sleep", &args)? {
        Value::Int(i) => i as f64,
        Value::Bool(b) => f64::from(u8::from(b)),
        Value::Float(x) => x,
        other => {
            return Err(RuntimeError::type_error(format!(
                "'{}' object cannot be interpreted as an integer",
                other.type_name()
            )))
        }
    };
    if seconds.is_nan() {
        return Err(RuntimeError::value_error("Invalid value NaN (not a number)"));
    }
    if seconds < 0.0 {
        return Err(RuntimeError::value_error("sleep length must be non-negative"));
    }
    let duration = Duration::try_from_secs_f64(seconds)
        .map_err(|_| RuntimeError::new(ErrorKind::Overflow, "sleep length is too large"))?;
    thread::sleep(duration);
    Ok(Value::None)
}

/// `sys` namespace describing the host
pub fn sys_namespace(platform: &str, version: &str) -> Namespace {
    Namespace::new("sys")
        .with("platform", Value::str(platform))
        .with("version", Value::str(version))
}

fn single(name: &str, args: &Args) -> Result<Value, RuntimeError> {
    args.check_keywords(name, &[])?;
    args.check_arity(name, 1, 1)?;
    Ok(args.positional[0].clone())
}

/// Zero or one argument, `default` when omitted
fn optional(name: &str, args: &Args, default: Value) -> Result<Value, RuntimeError> {
    args.check_keywords(name, &[])?;
    args.check_arity(name, 0, 1)?;
    Ok(args.positional.first().cloned().unwrap_or(default))
}

fn string_keyword(args: &Args, name: &str, default: &str) -> Result<String, RuntimeError> {
    match args.keyword(name) {
        None | Some(Value::None) => Ok(default.to_string()),
        Some(Value::Str(s)) => Ok(s.clone()),
        Some(other) => Err(RuntimeError::type_error(format!(
            "{} must be None or a string, not {}",
            name,
            other.type_name()
        ))),
    }
}

/// Each call produces one output entry; `end` is accepted and ignored
fn print(out: &mut Output, args: Args) -> Result<Value, RuntimeError> {
    args.check_keywords("print", &["sep", "end"])?;
    let sep = string_keyword(&args, "sep", " ")?;
    string_keyword(&args, "end", "\n")?;

    let text = args
        .positional
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(&sep);
    out.print(text);
    Ok(Value::None)
}

fn abs(_: &mut Output, args: Args) -> Result<Value, RuntimeError> {
    match single("abs", &args)? {
        Value::Bool(b) => Ok(Value::Int(i64::from(b))),
        Value::Int(i) => i.checked_abs().map(Value::Int).ok_or_else(RuntimeError::overflow),
        Value::Float(x) => Ok(Value::Float(x.abs())),
        other => Err(RuntimeError::type_error(format!(
            "bad operand type for abs(): '{}'",
            other.type_name()
        ))),
    }
}

/// `min`/`max` over the arguments, or over the characters of one string
fn extreme(
    name: &str,
    wanted: Ordering,
    _: &mut Output,
    args: Args,
) -> Result<Value, RuntimeError> {
    args.check_keywords(name, &[])?;
    let candidates: Vec<Value> = match args.positional.as_slice() {
        [] => {
            return Err(RuntimeError::type_error(format!(
                "{} expected at least 1 argument, got 0",
                name
            )))
        }
        [Value::Str(s)] => s.chars().map(|c| Value::Str(c.to_string())).collect(),
        [other] => {
            return Err(RuntimeError::type_error(format!(
                "'{}' object is not iterable",
                other.type_name()
            )))
        }
        many => many.to_vec(),
    };

    let mut iter = candidates.into_iter();
    let mut best = iter
        .next()
        .ok_or_else(|| RuntimeError::value_error(format!("{}() arg is an empty sequence", name)))?;
    let op = if wanted == Ordering::Less {
        CmpOp::Lt
    } else {
        CmpOp::Gt
    };
    for candidate in iter {
        if ops::compare(op, &candidate, &best)? {
            best = candidate;
        }
    }
    Ok(best)
}

fn len(_: &mut Output, args: Args) -> Result<Value, RuntimeError> {
    match single("len", &args)? {
        Value::Str(s) => Ok(Value::Int(s.chars().count() as i64)),
        other => Err(RuntimeError::type_error(format!(
            "object of type '{}' has no len()",
            other.type_name()
        ))),
    }
}

fn to_str(_: &mut Output, args: Args) -> Result<Value, RuntimeError> {
    let value = optional("str", &args, Value::str(""))?;
    Ok(Value::Str(value.to_string()))
}

fn to_int(_: &mut Output, args: Args) -> Result<Value, RuntimeError> {
    match optional("int", &args, Value::Int(0))? {
        Value::Bool(b) => Ok(Value::Int(i64::from(b))),
        Value::Int(i) => Ok(Value::Int(i)),
        Value::Float(x) => float_to_int(x),
        Value::Str(s) => {
            let cleaned: String = s.trim().chars().filter(|c| *c != '_').collect();
            cleaned.parse::<i64>().map(Value::Int).map_err(|_| {
                RuntimeError::value_error(format!(
                    "invalid literal for int() with base 10: '{}'",
                    s
                ))
            })
        }
        other => Err(RuntimeError::type_error(format!(
            "int() argument must be a string or a number, not '{}'",
            other.type_name()
        ))),
    }
}

fn float_to_int(x: f64) -> Result<Value, RuntimeError> {
    if x.is_nan() {
        return Err(RuntimeError::value_error(
            "cannot convert float NaN to integer",
        ));
    }
    if x.is_infinite() {
        return Err(RuntimeError::new(
            ErrorKind::Overflow,
            "cannot convert float infinity to integer",
        ));
    }
    let truncated = x.trunc();
    if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return Err(RuntimeError::overflow());
    }
    Ok(Value::Int(truncated as i64))
}

fn to_float(_: &mut Output, args: Args) -> Result<Value, RuntimeError> {
    match optional("float", &args, Value::Float(0.0))? {
        Value::Bool(b) => Ok(Value::Float(if b { 1.0 } else { 0.0 })),
        Value::Int(i) => Ok(Value::Float(i as f64)),
        Value::Float(x) => Ok(Value::Float(x)),
        Value::Str(s) => parse_float(s.trim()).map(Value::Float).ok_or_else(|| {
            RuntimeError::value_error(format!("could not convert string to float: '{}'", s))
        }),
        other => Err(RuntimeError::type_error(format!(
            "float() argument must be a string or a number, not '{}'",
            other.type_name()
        ))),
    }
}

fn parse_float(text: &str) -> Option<f64> {
    let lowered = text.to_ascii_lowercase();
    let (sign, body) = match lowered.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, lowered.strip_prefix('+').unwrap_or(&lowered)),
    };
    match body {
        "inf" | "infinity" => Some(sign * f64::INFINITY),
        "nan" => Some(f64::NAN),
        _ if body.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | '+' | '-')) => {
            body.parse::<f64>().ok().map(|x| sign * x)
        }
        _ => None,
    }
}

fn to_bool(_: &mut Output, args: Args) -> Result<Value, RuntimeError> {
    let value = optional("bool", &args, Value::Bool(false))?;
    Ok(Value::Bool(value.is_truthy()))
}

/// Rounds half to even; an integer without `ndigits`, a float with it
fn round(_: &mut Output, args: Args) -> Result<Value, RuntimeError> {
    args.check_keywords("round", &["ndigits"])?;
    args.check_arity("round", 1, 2)?;
    let ndigits = match args.positional.get(1).or_else(|| args.keyword("ndigits")) {
        None | Some(Value::None) => None,
        Some(Value::Int(n)) => Some(*n),
        Some(other) => {
            return Err(RuntimeError::type_error(format!(
                "'{}' object cannot be interpreted as an integer",
                other.type_name()
            )))
        }
    };

    match (&args.positional[0], ndigits) {
        (Value::Int(i), Some(n)) if n < 0 => round_int(*i, n.unsigned_abs()),
        (Value::Bool(b), Some(n)) if n < 0 => round_int(i64::from(*b), n.unsigned_abs()),
        (Value::Int(i), _) => Ok(Value::Int(*i)),
        (Value::Bool(b), _) => Ok(Value::Int(i64::from(*b))),
        (Value::Float(x), None) => float_to_int(x.round_ties_even()),
        (Value::Float(x), Some(n)) => {
            let n = n.clamp(-308, 308) as i32;
            let scale = 10f64.powi(n);
            let scaled = x * scale;
            if !scaled.is_finite() {
                return Ok(Value::Float(*x));
            }
            Ok(Value::Float(scaled.round_ties_even() / scale))
        }
        (other, _) => Err(RuntimeError::type_error(format!(
            "type {} doesn't define __round__ method",
            other.type_name()
        ))),
    }
}

/// Rounds `i` to a multiple of `10^places`, half to even
fn round_int(i: i64, places: u64) -> Result<Value, RuntimeError> {
    // 10^38 is the largest power of ten an i128 holds; beyond it every i64 rounds to 0
    if places > 38 {
        return Ok(Value::Int(0));
    }
    let unit = 10i128.pow(places as u32);
    let value = i128::from(i);
    let (quotient, remainder) = (value.div_euclid(unit), value.rem_euclid(unit));
    let upper = unit - remainder;
    let quotient = if remainder > upper || (remainder == upper && quotient % 2 != 0) {
        quotient + 1
    } else {
        quotient
    };
    i64::try_from(quotient * unit)
        .map(Value::Int)
        .map_err(|_| RuntimeError::overflow())
}

fn type_of(_: &mut Output, args: Args) -> Result<Value, RuntimeError> {
    let value = single("type", &args)?;
    Ok(Value::Str(format!("<class '{}'>", value.type_name())))
}
