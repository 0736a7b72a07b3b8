use std::fmt;

use crate::value::{NumKind, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Neg,
    BitNot,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Mul,
    Div,
    Rem,
    Add,
    Sub,
    Shl,
    Shr,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    BitAnd,
    BitXor,
    BitOr,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::BitAnd => "&",
            Self::BitXor => "^",
            Self::BitOr => "|",
            Self::And => "&&",
            Self::Or => "||",
        }
    }
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Neg => "-",
            Self::BitNot => "~",
            Self::Not => "!",
        }
    }
}

/// C scalar types usable in a cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastType {
    Char,
    SChar,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    Float,
    Double,
}

impl CastType {
    /// Resolves a type spelled as keywords, e.g. `unsigned long long`.
    pub fn from_words(words: &[String]) -> Option<Self> {
        let mut unsigned = false;
        let mut signed = false;
        let mut longs = 0;
        let mut base = None;
        for word in words {
            match word.as_str() {
                "unsigned" => unsigned = true,
                "signed" => signed = true,
                "long" => longs += 1,
                "const" => {}
                "int" if base == Some("short") => {}
                "char" | "short" | "int" | "float" | "double" if base.is_none() => {
                    base = Some(word.as_str());
                }
                _ => return None,
            }
        }
        if unsigned && signed {
            return None;
        }
        let ty = match (base.unwrap_or("int"), longs) {
            ("char", 0) if unsigned => Self::UChar,
            ("char", 0) if signed => Self::SChar,
            ("char", 0) => Self::Char,
            ("short", 0) if unsigned => Self::UShort,
            ("short", 0) => Self::Short,
            ("int", 0) if unsigned => Self::UInt,
            ("int", 0) => Self::Int,
            ("int", _) if unsigned => Self::ULong,
            ("int", _) => Self::Long,
            ("float", 0) => Self::Float,
            ("double", 0 | 1) => Self::Double,
            _ => return None,
        };
        Some(ty)
    }

    /// Value kind the cast produces. Narrow integer types widen to `int`.
    pub fn result_kind(self) -> NumKind {
        match self {
            Self::Char | Self::SChar | Self::UChar | Self::Short | Self::UShort | Self::Int => {
                NumKind::Int
            }
            Self::UInt => NumKind::UInt,
            Self::Long => NumKind::Long,
            Self::ULong => NumKind::ULong,
            Self::Float => NumKind::Float,
            Self::Double => NumKind::Double,
        }
    }

    /// Truncates an integer to the width of the cast type.
    pub(crate) fn narrow(self, value: i128) -> i128 {
        match self {
            Self::Char | Self::SChar => i128::from(value as i8),
            Self::UChar => i128::from(value as u8),
            Self::Short => i128::from(value as i16),
            Self::UShort => i128::from(value as u16),
            _ => value,
        }
    }
}

impl fmt::Display for CastType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Char => "char",
            Self::SChar => "signed char",
            Self::UChar => "unsigned char",
            Self::Short => "short",
            Self::UShort => "unsigned short",
            Self::Int => "int",
            Self::UInt => "unsigned int",
            Self::Long => "long",
            Self::ULong => "unsigned long",
            Self::Float => "float",
            Self::Double => "double",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Ident(String),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Cast(CastType, Box<Expr>),
    Conditional(Box<Expr>, Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Self::Unary(op, Box::new(operand))
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Self::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn cast(ty: CastType, operand: Expr) -> Self {
        Self::Cast(ty, Box::new(operand))
    }

    pub fn conditional(cond: Expr, then: Expr, otherwise: Expr) -> Self {
        Self::Conditional(Box::new(cond), Box::new(then), Box::new(otherwise))
    }

    /// Identifiers referenced anywhere in the expression.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_identifiers(&mut out);
        out
    }

    fn collect_identifiers<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Literal(_) => {}
            Self::Ident(name) => out.push(name),
            Self::Unary(_, operand) | Self::Cast(_, operand) => operand.collect_identifiers(out),
            Self::Binary(_, lhs, rhs) => {
                lhs.collect_identifiers(out);
                rhs.collect_identifiers(out);
            }
            Self::Conditional(cond, then, otherwise) => {
                cond.collect_identifiers(out);
                then.collect_identifiers(out);
                otherwise.collect_identifiers(out);
            }
        }
    }
}
