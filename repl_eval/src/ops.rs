//! Operator semantics
//!
//! Integers are 64-bit; a result that does not fit is an overflow error.
//! `bool` takes part in arithmetic as 0 or 1. Mixed int/float operands
//! are promoted to float.

use crate::ast::{BinOp, CmpOp, UnaryOp};
use crate::error::{ErrorKind, RuntimeError};
use crate::value::{Value, MAX_STRING_LEN};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Int(i64::from(*b))),
            Value::Int(i) => Some(Self::Int(*i)),
            Value::Float(x) => Some(Self::Float(*x)),
            _ => None,
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(x) => x,
        }
    }
}

fn unsupported(op: &str, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::type_error(format!(
        "unsupported operand type(s) for {}: '{}' and '{}'",
        op,
        left.type_name(),
        right.type_name()
    ))
}

fn checked(result: Option<i64>) -> Result<Value, RuntimeError> {
    result.map(Value::Int).ok_or_else(RuntimeError::overflow)
}

/// Applies a unary operator
pub fn unary(op: UnaryOp, operand: &Value) -> Result<Value, RuntimeError> {
    if op == UnaryOp::Not {
        return Ok(Value::Bool(!operand.is_truthy()));
    }
    let symbol = if op == UnaryOp::Neg { "-" } else { "+" };
    match (op, Num::of(operand)) {
        (UnaryOp::Neg, Some(Num::Int(i))) => checked(i.checked_neg()),
        (UnaryOp::Neg, Some(Num::Float(x))) => Ok(Value::Float(-x)),
        (_, Some(Num::Int(i))) => Ok(Value::Int(i)),
        (_, Some(Num::Float(x))) => Ok(Value::Float(x)),
        (_, None) => Err(RuntimeError::type_error(format!(
            "bad operand type for unary {}: '{}'",
            symbol,
            operand.type_name()
        ))),
    }
}

/// Applies an arithmetic operator
pub fn binary(op: BinOp, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) if op == BinOp::Add => {
            concat_len_check(a.chars().count() + b.chars().count())?;
            Ok(Value::Str(format!("{}{}", a, b)))
        }
        (Value::Str(s), other) | (other, Value::Str(s)) if op == BinOp::Mul => {
            match Num::of(other) {
                Some(Num::Int(n)) => repeat(s, n),
                _ => Err(RuntimeError::type_error(format!(
                    "can't multiply sequence by non-int of type '{}'",
                    other.type_name()
                ))),
            }
        }
        _ => match (Num::of(left), Num::of(right)) {
            (Some(Num::Int(a)), Some(Num::Int(b))) => int_binary(op, a, b),
            (Some(a), Some(b)) => float_binary(op, a.as_f64(), b.as_f64()),
            _ => Err(unsupported(op.symbol(), left, right)),
        },
    }
}

fn concat_len_check(len: usize) -> Result<(), RuntimeError> {
    if len > MAX_STRING_LEN {
        return Err(RuntimeError::new(
            ErrorKind::Memory,
            format!("string longer than {} characters", MAX_STRING_LEN),
        ));
    }
    Ok(())
}

fn repeat(s: &str, times: i64) -> Result<Value, RuntimeError> {
    if times <= 0 || s.is_empty() {
        return Ok(Value::Str(String::new()));
    }
    let len = usize::try_from(times)
        .ok()
        .and_then(|t| t.checked_mul(s.chars().count()))
        .unwrap_or(usize::MAX);
    concat_len_check(len)?;
    Ok(Value::Str(s.repeat(times as usize)))
}

fn int_binary(op: BinOp, a: i64, b: i64) -> Result<Value, RuntimeError> {
    match op {
        BinOp::Add => checked(a.checked_add(b)),
        BinOp::Sub => checked(a.checked_sub(b)),
        BinOp::Mul => checked(a.checked_mul(b)),
        BinOp::Div => {
            if b == 0 {
                return Err(RuntimeError::zero_division("division by zero"));
            }
            Ok(Value::Float(a as f64 / b as f64))
        }
        BinOp::FloorDiv => {
            if b == 0 {
                return Err(RuntimeError::zero_division(
                    "integer division or modulo by zero",
                ));
            }
            let q = a.checked_div(b).ok_or_else(RuntimeError::overflow)?;
            if a % b != 0 && ((a < 0) != (b < 0)) {
                Ok(Value::Int(q - 1))
            } else {
                Ok(Value::Int(q))
            }
        }
        BinOp::Mod => {
            if b == 0 {
                return Err(RuntimeError::zero_division("integer modulo by zero"));
            }
            let r = a.checked_rem(b).unwrap_or(0);
            if r != 0 && ((r < 0) != (b < 0)) {
                Ok(Value::Int(r + b))
            } else {
                Ok(Value::Int(r))
            }
        }
        BinOp::Pow => {
            if b < 0 {
                if a == 0 {
                    return Err(RuntimeError::zero_division(
                        "0.0 cannot be raised to a negative power",
                    ));
                }
                return Ok(Value::Float((a as f64).powf(b as f64)));
            }
            let exp = u32::try_from(b).map_err(|_| RuntimeError::overflow())?;
            checked(a.checked_pow(exp))
        }
    }
}

fn float_binary(op: BinOp, a: f64, b: f64) -> Result<Value, RuntimeError> {
    let result = match op {
        BinOp::Add => a + b,
        BinOp::Sub => a - b,
        BinOp::Mul => a * b,
        BinOp::Div => {
            if b == 0.0 {
                return Err(RuntimeError::zero_division("float division by zero"));
            }
            a / b
        }
        BinOp::FloorDiv => {
            if b == 0.0 {
                return Err(RuntimeError::zero_division("float floor division by zero"));
            }
            (a / b).floor()
        }
        BinOp::Mod => {
            if b == 0.0 {
                return Err(RuntimeError::zero_division("float modulo by zero"));
            }
            let r = a % b;
            if r != 0.0 && ((r < 0.0) != (b < 0.0)) {
                r + b
            } else {
                r
            }
        }
        BinOp::Pow => {
            if a == 0.0 && b < 0.0 {
                return Err(RuntimeError::zero_division(
                    "0.0 cannot be raised to a negative power",
                ));
            }
            let r = a.powf(b);
            if r.is_nan() && !a.is_nan() && !b.is_nan() {
                return Err(RuntimeError::value_error("math domain error"));
            }
            r
        }
    };
    Ok(Value::Float(result))
}

/// Equality; values of unrelated types are simply unequal
pub fn equals(left: &Value, right: &Value) -> bool {
    match (Num::of(left), Num::of(right)) {
        (Some(Num::Int(a)), Some(Num::Int(b))) => a == b,
        (Some(a), Some(b)) => a.as_f64() == b.as_f64(),
        _ => left == right,
    }
}

fn ordering(op: CmpOp, left: &Value, right: &Value) -> Result<Option<Ordering>, RuntimeError> {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => Ok(Some(a.cmp(b))),
        _ => match (Num::of(left), Num::of(right)) {
            (Some(Num::Int(a)), Some(Num::Int(b))) => Ok(Some(a.cmp(&b))),
            (Some(a), Some(b)) => Ok(a.as_f64().partial_cmp(&b.as_f64())),
            _ => Err(RuntimeError::type_error(format!(
                "'{}' not supported between instances of '{}' and '{}'",
                op.symbol(),
                left.type_name(),
                right.type_name()
            ))),
        },
    }
}

/// Applies one comparison
pub fn compare(op: CmpOp, left: &Value, right: &Value) -> Result<bool, RuntimeError> {
    let result = match op {
        CmpOp::Eq => equals(left, right),
        CmpOp::NotEq => !equals(left, right),
        CmpOp::Lt => ordering(op, left, right)? == Some(Ordering::Less),
        CmpOp::Le => matches!(
            ordering(op, left, right)?,
            Some(Ordering::Less | Ordering::Equal)
        ),
        CmpOp::Gt => ordering(op, left, right)? == Some(Ordering::Greater),
        CmpOp::Ge => matches!(
            ordering(op, left, right)?,
            Some(Ordering::Greater | Ordering::Equal)
        ),
    };
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(i: i64) -> Value {
        Value::Int(i)
    }

    #[test]
    fn test_true_division_yields_float() {
        assert_eq!(binary(BinOp::Div, &int(7), &int(2)).unwrap(), Value::Float(3.5));
        assert_eq!(binary(BinOp::Div, &int(4), &int(2)).unwrap(), Value::Float(2.0));
    }

    #[test]
    fn test_floor_division_and_modulo_round_down() {
        assert_eq!(binary(BinOp::FloorDiv, &int(-7), &int(2)).unwrap(), int(-4));
        assert_eq!(binary(BinOp::Mod, &int(-7), &int(2)).unwrap(), int(1));
        assert_eq!(binary(BinOp::Mod, &int(7), &int(-2)).unwrap(), int(-1));
        assert_eq!(
            binary(BinOp::Mod, &Value::Float(-7.5), &int(2)).unwrap(),
            Value::Float(0.5)
        );
    }

    #[test]
    fn test_division_by_zero_messages() {
        let err = binary(BinOp::Div, &int(1), &int(0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ZeroDivision);
        assert_eq!(err.message, "division by zero");

        let err = binary(BinOp::FloorDiv, &int(1), &int(0)).unwrap_err();
        assert_eq!(err.message, "integer division or modulo by zero");
    }

    #[test]
    fn test_overflow_is_an_error() {
        let err = binary(BinOp::Mul, &int(i64::MAX), &int(2)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Overflow);
        assert!(binary(BinOp::Pow, &int(2), &int(64)).is_err());
        assert!(binary(BinOp::FloorDiv, &int(i64::MIN), &int(-1)).is_err());
        assert!(unary(UnaryOp::Neg, &int(i64::MIN)).is_err());
    }

    #[test]
    fn test_power() {
        assert_eq!(binary(BinOp::Pow, &int(2), &int(10)).unwrap(), int(1024));
        assert_eq!(binary(BinOp::Pow, &int(2), &int(-1)).unwrap(), Value::Float(0.5));
        assert_eq!(
            binary(BinOp::Pow, &Value::Float(-8.0), &Value::Float(0.5))
                .unwrap_err()
                .kind,
            ErrorKind::Value
        );
    }

    #[test]
    fn test_mixed_numeric_promotion() {
        assert_eq!(
            binary(BinOp::Add, &int(1), &Value::Float(0.5)).unwrap(),
            Value::Float(1.5)
        );
        assert_eq!(binary(BinOp::Add, &Value::Bool(true), &int(1)).unwrap(), int(2));
    }

    #[test]
    fn test_string_operators() {
        assert_eq!(
            binary(BinOp::Add, &Value::str("ab"), &Value::str("cd")).unwrap(),
            Value::str("abcd")
        );
        assert_eq!(
            binary(BinOp::Mul, &int(3), &Value::str("ab")).unwrap(),
            Value::str("ababab")
        );
        assert_eq!(
            binary(BinOp::Mul, &Value::str("ab"), &int(-1)).unwrap(),
            Value::str("")
        );
        let err = binary(BinOp::Mul, &Value::str("x"), &int(1_000_000)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Memory);
    }

    #[test]
    fn test_type_mismatch_message() {
        let err = binary(BinOp::Add, &int(1), &Value::str("a")).unwrap_err();
        assert_eq!(
            err.message,
            "unsupported operand type(s) for +: 'int' and 'str'"
        );
        let err = unary(UnaryOp::Neg, &Value::str("a")).unwrap_err();
        assert_eq!(err.message, "bad operand type for unary -: 'str'");
    }

    #[test]
    fn test_comparisons() {
        assert!(compare(CmpOp::Eq, &int(1), &Value::Float(1.0)).unwrap());
        assert!(!compare(CmpOp::Eq, &int(1), &Value::str("1")).unwrap());
        assert!(compare(CmpOp::Lt, &Value::str("a"), &Value::str("b")).unwrap());
        assert!(compare(CmpOp::Ge, &int(2), &int(2)).unwrap());
        assert!(!compare(CmpOp::Lt, &Value::Float(f64::NAN), &int(1)).unwrap());
        assert!(compare(CmpOp::Lt, &int(1), &Value::str("a")).is_err());
        assert!(compare(CmpOp::Eq, &Value::None, &Value::None).unwrap());
    }

    #[test]
    fn test_not() {
        assert_eq!(unary(UnaryOp::Not, &int(0)).unwrap(), Value::Bool(true));
        assert_eq!(unary(UnaryOp::Not, &Value::str("x")).unwrap(), Value::Bool(false));
    }
}
