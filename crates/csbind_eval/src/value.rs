//! Values produced by macro evaluation, typed the way C# types constants.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i32),
    UInt(u32),
    Long(i64),
    ULong(u64),
    Float(f32),
    Double(f64),
    Bool(bool),
    Str(String),
}

/// Numeric type of a [`Value`], ordered for binary numeric promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NumKind {
    Int,
    UInt,
    Long,
    ULong,
    Float,
    Double,
}

impl NumKind {
    /// Binary numeric promotion. `uint` mixed with signed `int` widens to
    /// `long`; otherwise the wider kind wins.
    pub fn promote(self, other: Self) -> Self {
        match (self, other) {
            (Self::UInt, Self::Int) | (Self::Int, Self::UInt) => Self::Long,
            (a, b) => a.max(b),
        }
    }

    pub fn is_integral(self) -> bool {
        !matches!(self, Self::Float | Self::Double)
    }

    /// Wraps an integer result into this kind, two's complement style.
    pub(crate) fn wrap(self, value: i128) -> Value {
        match self {
            Self::Int => Value::Int(value as i32),
            Self::UInt => Value::UInt(value as u32),
            Self::Long => Value::Long(value as i64),
            Self::ULong => Value::ULong(value as u64),
            Self::Float => Value::Float(value as f32),
            Self::Double => Value::Double(value as f64),
        }
    }

    pub(crate) fn from_float(self, value: f64) -> Value {
        match self {
            Self::Float => Value::Float(value as f32),
            _ => Value::Double(value),
        }
    }
}

impl Value {
    /// C# keyword of the value's type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::Long(_) => "long",
            Self::ULong(_) => "ulong",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::Bool(_) => "bool",
            Self::Str(_) => "string",
        }
    }

    pub fn num_kind(&self) -> Option<NumKind> {
        match self {
            Self::Int(_) => Some(NumKind::Int),
            Self::UInt(_) => Some(NumKind::UInt),
            Self::Long(_) => Some(NumKind::Long),
            Self::ULong(_) => Some(NumKind::ULong),
            Self::Float(_) => Some(NumKind::Float),
            Self::Double(_) => Some(NumKind::Double),
            Self::Bool(_) | Self::Str(_) => None,
        }
    }

    pub fn as_integer(&self) -> Option<i128> {
        match self {
            Self::Int(v) => Some(i128::from(*v)),
            Self::UInt(v) => Some(i128::from(*v)),
            Self::Long(v) => Some(i128::from(*v)),
            Self::ULong(v) => Some(i128::from(*v)),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(f64::from(*v)),
            Self::Double(v) => Some(*v),
            other => other.as_integer().map(|v| v as f64),
        }
    }

    /// C truthiness: `true`, or any non-zero number.
    pub fn truthy(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Str(_) => None,
            other => other.as_float().map(|v| v != 0.0),
        }
    }

    pub(crate) fn describe(&self) -> String {
        format!("{} `{self}`", self.type_name())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}"),
            Self::ULong(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Double(v) => write!(f, "{v:?}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v:?}"),
        }
    }
}

/// Interprets the text of a C numeric literal.
///
/// Integers take the first type that fits from C#'s candidate list for the
/// suffix; a leading `0` means octal. Floats are `double` unless suffixed
/// with `f`.
pub fn parse_number(text: &str) -> Result<Value, String> {
    let lower = text.to_ascii_lowercase();
    let radix_prefix = lower.starts_with("0x") || lower.starts_with("0b");

    let is_float = !radix_prefix
        && (lower.contains('.') || lower.contains('e') || lower.ends_with('f'));
    if is_float {
        let (mantissa, single) = match lower.strip_suffix('f') {
            Some(rest) => (rest, true),
            None => (lower.strip_suffix('l').unwrap_or(&lower), false),
        };
        let value: f64 = mantissa
            .parse()
            .map_err(|_| format!("invalid floating literal `{text}`"))?;
        return Ok(if single {
            Value::Float(value as f32)
        } else {
            Value::Double(value)
        });
    }

    let digits_end = lower.trim_end_matches(['u', 'l']).len();
    let (body, suffix) = lower.split_at(digits_end);
    let unsigned = suffix.contains('u');
    let long = suffix.contains('l');
    if suffix.matches('u').count() > 1 || suffix.matches('l').count() > 2 {
        return Err(format!("invalid integer suffix in `{text}`"));
    }

    let (digits, radix) = if let Some(hex) = body.strip_prefix("0x") {
        (hex, 16)
    } else if let Some(bin) = body.strip_prefix("0b") {
        (bin, 2)
    } else if body.len() > 1 && body.starts_with('0') {
        (&body[1..], 8)
    } else {
        (body, 10)
    };
    let digits = digits.replace('_', "");
    if digits.is_empty() {
        return Err(format!("invalid integer literal `{text}`"));
    }
    let value = u128::from_str_radix(&digits, radix)
        .map_err(|_| format!("invalid integer literal `{text}`"))?;

    let fits_int = value <= i32::MAX as u128;
    let fits_uint = value <= u128::from(u32::MAX);
    let fits_long = value <= i64::MAX as u128;
    let fits_ulong = value <= u128::from(u64::MAX);

    let typed = match (unsigned, long) {
        (true, true) if fits_ulong => Value::ULong(value as u64),
        (true, false) if fits_uint => Value::UInt(value as u32),
        (true, false) if fits_ulong => Value::ULong(value as u64),
        (false, true) if fits_long => Value::Long(value as i64),
        (false, true) if fits_ulong => Value::ULong(value as u64),
        (false, false) if fits_int => Value::Int(value as i32),
        (false, false) if fits_uint => Value::UInt(value as u32),
        (false, false) if fits_long => Value::Long(value as i64),
        (false, false) if fits_ulong => Value::ULong(value as u64),
        _ => return Err(format!("integer literal `{text}` is out of range")),
    };
    Ok(typed)
}
