use std::collections::HashMap;
use std::hash::BuildHasher;

use crate::ast::{BinaryOp, CastType, Expr, UnaryOp};
use crate::error::EvalError;
use crate::parser::parse_expression;
use crate::value::{NumKind, Value};

/// Supplies values for identifiers met during evaluation.
///
/// Implementors may evaluate other definitions on demand and are expected to
/// report [`EvalError::Cycle`] themselves when a definition reaches itself.
pub trait Scope {
    fn resolve(&mut self, name: &str) -> Result<Value, EvalError>;
}

impl<S: BuildHasher> Scope for HashMap<String, Value, S> {
    fn resolve(&mut self, name: &str) -> Result<Value, EvalError> {
        self.get(name)
            .cloned()
            .ok_or_else(|| EvalError::UnknownIdentifier(name.to_string()))
    }
}

/// Scope with no identifiers at all.
pub struct EmptyScope;

impl Scope for EmptyScope {
    fn resolve(&mut self, name: &str) -> Result<Value, EvalError> {
        Err(EvalError::UnknownIdentifier(name.to_string()))
    }
}

/// Parses and evaluates a macro body in one step.
pub fn evaluate_str(source: &str, scope: &mut dyn Scope) -> Result<Value, EvalError> {
    let expr = parse_expression(source)?;
    evaluate(&expr, scope)
}

pub fn evaluate(expr: &Expr, scope: &mut dyn Scope) -> Result<Value, EvalError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Ident(name) => scope.resolve(name),
        Expr::Unary(op, operand) => unary(*op, evaluate(operand, scope)?),
        Expr::Cast(ty, operand) => cast(*ty, evaluate(operand, scope)?),
        Expr::Binary(op @ (BinaryOp::And | BinaryOp::Or), lhs, rhs) => {
            let lhs = condition(op.symbol(), evaluate(lhs, scope)?)?;
            match (op, lhs) {
                (BinaryOp::And, false) => Ok(Value::Bool(false)),
                (BinaryOp::Or, true) => Ok(Value::Bool(true)),
                _ => Ok(Value::Bool(condition(op.symbol(), evaluate(rhs, scope)?)?)),
            }
        }
        Expr::Binary(op, lhs, rhs) => {
            let lhs = evaluate(lhs, scope)?;
            let rhs = evaluate(rhs, scope)?;
            binary(*op, lhs, rhs)
        }
        Expr::Conditional(cond, then, otherwise) => {
            if condition("?:", evaluate(cond, scope)?)? {
                evaluate(then, scope)
            } else {
                evaluate(otherwise, scope)
            }
        }
    }
}

fn condition(op: &str, value: Value) -> Result<bool, EvalError> {
    value
        .truthy()
        .ok_or_else(|| EvalError::invalid(op, value.describe()))
}

fn unary(op: UnaryOp, value: Value) -> Result<Value, EvalError> {
    let result = match (op, &value) {
        (UnaryOp::Plus, v) if v.num_kind().is_some() => Some(value.clone()),
        (UnaryOp::Neg, Value::Int(v)) => Some(Value::Int(v.wrapping_neg())),
        (UnaryOp::Neg, Value::UInt(v)) => Some(Value::Long(-i64::from(*v))),
        (UnaryOp::Neg, Value::Long(v)) => Some(Value::Long(v.wrapping_neg())),
        (UnaryOp::Neg, Value::Float(v)) => Some(Value::Float(-v)),
        (UnaryOp::Neg, Value::Double(v)) => Some(Value::Double(-v)),
        (UnaryOp::BitNot, Value::Int(v)) => Some(Value::Int(!v)),
        (UnaryOp::BitNot, Value::UInt(v)) => Some(Value::UInt(!v)),
        (UnaryOp::BitNot, Value::Long(v)) => Some(Value::Long(!v)),
        (UnaryOp::BitNot, Value::ULong(v)) => Some(Value::ULong(!v)),
        (UnaryOp::Not, v) => v.truthy().map(|b| Value::Bool(!b)),
        _ => None,
    };
    result.ok_or_else(|| EvalError::invalid(op.symbol(), value.describe()))
}

fn cast(ty: CastType, value: Value) -> Result<Value, EvalError> {
    let kind = ty.result_kind();
    if !kind.is_integral() {
        return value
            .as_float()
            .map(|v| kind.from_float(v))
            .ok_or_else(|| EvalError::invalid(format!("({ty})"), value.describe()));
    }
    let raw = match &value {
        Value::Float(v) => Some(*v as i128),
        Value::Double(v) => Some(*v as i128),
        Value::Bool(b) => Some(i128::from(*b)),
        other => other.as_integer(),
    };
    raw.map(|v| kind.wrap(ty.narrow(v)))
        .ok_or_else(|| EvalError::invalid(format!("({ty})"), value.describe()))
}

fn text_of(value: &Value) -> String {
    match value {
        Value::Str(s) => s.clone(),
        other => other.to_string(),
    }
}

fn binary(op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value, EvalError> {
    match (op, &lhs, &rhs) {
        (BinaryOp::Add, Value::Str(_), _) | (BinaryOp::Add, _, Value::Str(_)) => {
            Ok(Value::Str(text_of(&lhs) + &text_of(&rhs)))
        }
        (BinaryOp::Eq | BinaryOp::Ne, Value::Str(a), Value::Str(b)) => {
            Ok(Value::Bool((a == b) == (op == BinaryOp::Eq)))
        }
        (BinaryOp::Eq | BinaryOp::Ne, Value::Bool(a), Value::Bool(b)) => {
            Ok(Value::Bool((a == b) == (op == BinaryOp::Eq)))
        }
        (BinaryOp::BitAnd, Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(*a & *b)),
        (BinaryOp::BitOr, Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(*a | *b)),
        (BinaryOp::BitXor, Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(*a ^ *b)),
        (BinaryOp::Shl | BinaryOp::Shr, _, _) => shift(op, &lhs, &rhs),
        _ => numeric(op, &lhs, &rhs),
    }
}

fn shift(op: BinaryOp, lhs: &Value, rhs: &Value) -> Result<Value, EvalError> {
    let count = rhs
        .as_integer()
        .ok_or_else(|| EvalError::invalid(op.symbol(), rhs.describe()))?;
    let left = op == BinaryOp::Shl;
    let result = match *lhs {
        Value::Int(v) => {
            let c = (count & 31) as u32;
            Value::Int(if left { v.wrapping_shl(c) } else { v >> c })
        }
        Value::UInt(v) => {
            let c = (count & 31) as u32;
            Value::UInt(if left { v.wrapping_shl(c) } else { v >> c })
        }
        Value::Long(v) => {
            let c = (count & 63) as u32;
            Value::Long(if left { v.wrapping_shl(c) } else { v >> c })
        }
        Value::ULong(v) => {
            let c = (count & 63) as u32;
            Value::ULong(if left { v.wrapping_shl(c) } else { v >> c })
        }
        _ => return Err(EvalError::invalid(op.symbol(), lhs.describe())),
    };
    Ok(result)
}

fn numeric(op: BinaryOp, lhs: &Value, rhs: &Value) -> Result<Value, EvalError> {
    let lk = lhs
        .num_kind()
        .ok_or_else(|| EvalError::invalid(op.symbol(), lhs.describe()))?;
    let rk = rhs
        .num_kind()
        .ok_or_else(|| EvalError::invalid(op.symbol(), rhs.describe()))?;
    let kind = lk.promote(rk);

    if kind.is_integral() {
        let (Some(a), Some(b)) = (lhs.as_integer(), rhs.as_integer()) else {
            return Err(EvalError::invalid(op.symbol(), lhs.describe()));
        };
        return integral(op, kind, a, b);
    }

    let (Some(a), Some(b)) = (lhs.as_float(), rhs.as_float()) else {
        return Err(EvalError::invalid(op.symbol(), lhs.describe()));
    };
    let value = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div | BinaryOp::Rem if b == 0.0 => return Err(EvalError::DivisionByZero),
        BinaryOp::Div => a / b,
        BinaryOp::Rem => a % b,
        BinaryOp::Lt => return Ok(Value::Bool(a < b)),
        BinaryOp::Le => return Ok(Value::Bool(a <= b)),
        BinaryOp::Gt => return Ok(Value::Bool(a > b)),
        BinaryOp::Ge => return Ok(Value::Bool(a >= b)),
        BinaryOp::Eq => return Ok(Value::Bool(a == b)),
        BinaryOp::Ne => return Ok(Value::Bool(a != b)),
        _ => {
            let operand = if lk.is_integral() { rhs } else { lhs };
            return Err(EvalError::invalid(op.symbol(), operand.describe()));
        }
    };
    Ok(kind.from_float(value))
}

fn integral(op: BinaryOp, kind: NumKind, a: i128, b: i128) -> Result<Value, EvalError> {
    let value = match op {
        BinaryOp::Add => a.wrapping_add(b),
        BinaryOp::Sub => a.wrapping_sub(b),
        BinaryOp::Mul => a.wrapping_mul(b),
        BinaryOp::Div | BinaryOp::Rem if b == 0 => return Err(EvalError::DivisionByZero),
        BinaryOp::Div => a / b,
        BinaryOp::Rem => a % b,
        BinaryOp::BitAnd => a & b,
        BinaryOp::BitOr => a | b,
        BinaryOp::BitXor => a ^ b,
        BinaryOp::Lt => return Ok(Value::Bool(a < b)),
        BinaryOp::Le => return Ok(Value::Bool(a <= b)),
        BinaryOp::Gt => return Ok(Value::Bool(a > b)),
        BinaryOp::Ge => return Ok(Value::Bool(a >= b)),
        BinaryOp::Eq => return Ok(Value::Bool(a == b)),
        BinaryOp::Ne => return Ok(Value::Bool(a != b)),
        BinaryOp::Shl | BinaryOp::Shr | BinaryOp::And | BinaryOp::Or => {
            return Err(EvalError::invalid(op.symbol(), kind_name(kind)));
        }
    };
    Ok(kind.wrap(value))
}

fn kind_name(kind: NumKind) -> &'static str {
    match kind {
        NumKind::Int => "int",
        NumKind::UInt => "uint",
        NumKind::Long => "long",
        NumKind::ULong => "ulong",
        NumKind::Float => "float",
        NumKind::Double => "double",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(source: &str) -> Result<Value, EvalError> {
        evaluate_str(source, &mut EmptyScope)
    }

    #[test]
    fn test_integer_arithmetic_keeps_int() {
        assert_eq!(eval("1 + 2 * 3").unwrap(), Value::Int(7));
        assert_eq!(eval("(1 + 2) * 3").unwrap(), Value::Int(9));
        assert_eq!(eval("-7 / 2").unwrap(), Value::Int(-3));
        assert_eq!(eval("-7 % 2").unwrap(), Value::Int(-1));
        assert_eq!(eval("0x7FFFFFFF + 1").unwrap(), Value::Int(i32::MIN));
    }

    #[test]
    fn test_mixed_signedness_widens() {
        assert_eq!(eval("1u + 1").unwrap(), Value::Long(2));
        assert_eq!(eval("1u + 1u").unwrap(), Value::UInt(2));
        assert_eq!(eval("1L * 2").unwrap(), Value::Long(2));
        assert_eq!(eval("-1u").unwrap(), Value::Long(-1));
    }

    #[test]
    fn test_shifts_and_masks() {
        assert_eq!(eval("1 << 4").unwrap(), Value::Int(16));
        assert_eq!(eval("1u << 31").unwrap(), Value::UInt(0x8000_0000));
        assert_eq!(eval("1UL << 40").unwrap(), Value::ULong(1 << 40));
        assert_eq!(eval("-16 >> 2").unwrap(), Value::Int(-4));
        assert_eq!(eval("0xF0 | 0x0F").unwrap(), Value::Int(0xFF));
        assert_eq!(eval("0xFF & ~0x0F").unwrap(), Value::Int(0xF0));
        assert_eq!(eval("5 ^ 1").unwrap(), Value::Int(4));
        assert_eq!(eval("~0u").unwrap(), Value::UInt(u32::MAX));
    }

    #[test]
    fn test_floating_point() {
        assert_eq!(eval("1.5 * 2").unwrap(), Value::Double(3.0));
        assert_eq!(eval("1.5f * 2").unwrap(), Value::Float(3.0));
        assert_eq!(eval("1.5f + 1.0").unwrap(), Value::Double(2.5));
        assert!(matches!(eval("1.5 << 1"), Err(EvalError::InvalidOperand { .. })));
    }

    #[test]
    fn test_logic_and_comparison() {
        assert_eq!(eval("1 < 2 && 3 >= 3").unwrap(), Value::Bool(true));
        assert_eq!(eval("!0").unwrap(), Value::Bool(true));
        assert_eq!(eval("true || UNDEFINED").unwrap(), Value::Bool(true));
        assert_eq!(eval("0 ? UNDEFINED : 4").unwrap(), Value::Int(4));
        assert_eq!(eval("\"a\" == \"a\"").unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_casts() {
        assert_eq!(eval("(unsigned int)-1").unwrap(), Value::UInt(u32::MAX));
        assert_eq!(eval("(unsigned char)300").unwrap(), Value::Int(44));
        assert_eq!(eval("(int)2.9").unwrap(), Value::Int(2));
        assert_eq!(eval("(float)1").unwrap(), Value::Float(1.0));
        assert_eq!(eval("(long long)1").unwrap(), Value::Long(1));
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            eval("\"lib\" \"name\"").unwrap(),
            Value::Str("libname".to_string())
        );
        assert_eq!(
            eval("\"v\" + 2").unwrap(),
            Value::Str("v2".to_string())
        );
    }

    #[test]
    fn test_errors() {
        assert_eq!(eval("1 / 0").unwrap_err(), EvalError::DivisionByZero);
        assert_eq!(eval("1.0 % 0").unwrap_err(), EvalError::DivisionByZero);
        assert_eq!(
            eval("FOO + 1").unwrap_err(),
            EvalError::UnknownIdentifier("FOO".to_string())
        );
        assert!(matches!(eval("-\"x\""), Err(EvalError::InvalidOperand { .. })));
        assert!(matches!(eval("1 +"), Err(EvalError::Syntax { .. })));
    }

    #[test]
    fn test_map_scope() {
        let mut scope: HashMap<String, Value> = HashMap::new();
        scope.insert("BASE".to_string(), Value::Int(0x100));
        assert_eq!(
            evaluate_str("BASE + 2", &mut scope).unwrap(),
            Value::Int(0x102)
        );
    }
}
