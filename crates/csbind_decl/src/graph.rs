//! Declaration graph produced by the header parser.
//!
//! Everything here is plain data: the generator never mutates the graph, it
//! indexes it into a per-run context instead.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Builtin C type kinds as reported by the header parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Void,
    Bool,
    Char,
    SChar,
    UChar,
    WideChar,
    Char16,
    Char32,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    LongLong,
    ULongLong,
    Int128,
    UInt128,
    Half,
    Float,
    Double,
    LongDouble,
    IntPtr,
    UIntPtr,
    String,
}

impl PrimitiveKind {
    pub const ALL: [Self; 25] = [
        Self::Void,
        Self::Bool,
        Self::Char,
        Self::SChar,
        Self::UChar,
        Self::WideChar,
        Self::Char16,
        Self::Char32,
        Self::Short,
        Self::UShort,
        Self::Int,
        Self::UInt,
        Self::Long,
        Self::ULong,
        Self::LongLong,
        Self::ULongLong,
        Self::Int128,
        Self::UInt128,
        Self::Half,
        Self::Float,
        Self::Double,
        Self::LongDouble,
        Self::IntPtr,
        Self::UIntPtr,
        Self::String,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::Bool => "bool",
            Self::Char => "char",
            Self::SChar => "s_char",
            Self::UChar => "u_char",
            Self::WideChar => "wide_char",
            Self::Char16 => "char16",
            Self::Char32 => "char32",
            Self::Short => "short",
            Self::UShort => "u_short",
            Self::Int => "int",
            Self::UInt => "u_int",
            Self::Long => "long",
            Self::ULong => "u_long",
            Self::LongLong => "long_long",
            Self::ULongLong => "u_long_long",
            Self::Int128 => "int128",
            Self::UInt128 => "u_int128",
            Self::Half => "half",
            Self::Float => "float",
            Self::Double => "double",
            Self::LongDouble => "long_double",
            Self::IntPtr => "int_ptr",
            Self::UIntPtr => "u_int_ptr",
            Self::String => "string",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrimitiveKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown primitive kind `{s}`"))
    }
}

/// Reference from a type to a struct or enum declaration.
///
/// Unnamed enums are referenced by their anonymous index: the n-th unnamed
/// enum across all translation units, in graph order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclRef {
    Named(String),
    Anonymous(usize),
}

impl DeclRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }
}

impl fmt::Display for DeclRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Anonymous(index) => write!(f, "<anonymous enum #{index}>"),
        }
    }
}

/// A declared C type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Type {
    Builtin {
        primitive: PrimitiveKind,
    },
    Pointer {
        pointee: Box<Type>,
    },
    Tag {
        decl: DeclRef,
    },
    Typedef {
        name: String,
    },
    Function {
        #[serde(default)]
        params: Vec<Type>,
        ret: Box<Type>,
    },
    Array {
        element: Box<Type>,
        #[serde(default)]
        length: Option<u64>,
    },
}

impl Type {
    pub fn builtin(primitive: PrimitiveKind) -> Self {
        Self::Builtin { primitive }
    }

    pub fn pointer(pointee: Self) -> Self {
        Self::Pointer {
            pointee: Box::new(pointee),
        }
    }

    pub fn tag(name: impl Into<String>) -> Self {
        Self::Tag {
            decl: DeclRef::named(name),
        }
    }

    pub fn anonymous(index: usize) -> Self {
        Self::Tag {
            decl: DeclRef::Anonymous(index),
        }
    }

    pub fn typedef(name: impl Into<String>) -> Self {
        Self::Typedef { name: name.into() }
    }

    pub fn function(params: Vec<Self>, ret: Self) -> Self {
        Self::Function {
            params,
            ret: Box::new(ret),
        }
    }

    pub fn array(element: Self, length: Option<u64>) -> Self {
        Self::Array {
            element: Box::new(element),
            length,
        }
    }
}

/// Integer literal of an enum member, kept verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntLiteral {
    Signed(i64),
    Unsigned(u64),
}

impl fmt::Display for IntLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signed(value) => write!(f, "{value}"),
            Self::Unsigned(value) => write!(f, "{value}"),
        }
    }
}

impl From<i64> for IntLiteral {
    fn from(value: i64) -> Self {
        Self::Signed(value)
    }
}

impl From<i32> for IntLiteral {
    fn from(value: i32) -> Self {
        Self::Signed(i64::from(value))
    }
}

impl From<u64> for IntLiteral {
    fn from(value: u64) -> Self {
        Self::Unsigned(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Struct {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub union: bool,
    /// Forward declaration without a body.
    #[serde(default)]
    pub incomplete: bool,
}

impl Struct {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
            union: false,
            incomplete: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumItem {
    pub name: String,
    pub value: IntLiteral,
}

impl EnumItem {
    pub fn new(name: impl Into<String>, value: impl Into<IntLiteral>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

fn default_underlying() -> PrimitiveKind {
    PrimitiveKind::Int
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enumeration {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_underlying")]
    pub underlying: PrimitiveKind,
    #[serde(default)]
    pub items: Vec<EnumItem>,
}

impl Enumeration {
    pub fn named(name: impl Into<String>, items: Vec<EnumItem>) -> Self {
        Self {
            name: Some(name.into()),
            underlying: PrimitiveKind::Int,
            items,
        }
    }

    pub fn anonymous(items: Vec<EnumItem>) -> Self {
        Self {
            name: None,
            underlying: PrimitiveKind::Int,
            items,
        }
    }

    /// Unnamed enums come through as `None` or an empty string depending on
    /// the parser, both mean the same thing.
    pub fn declared_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Typedef {
    pub name: String,
    pub underlying: Type,
}

impl Typedef {
    pub fn new(name: impl Into<String>, underlying: Type) -> Self {
        Self {
            name: name.into(),
            underlying,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Parameter>,
    pub ret: Type,
}

impl Function {
    pub fn new(name: impl Into<String>, params: Vec<Parameter>, ret: Type) -> Self {
        Self {
            name: name.into(),
            params,
            ret,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Macro {
    pub name: String,
    pub expression: String,
}

impl Macro {
    pub fn new(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expression: expression.into(),
        }
    }
}

/// Declarations found in one parsed file, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationUnit {
    pub file_name: String,
    #[serde(default)]
    pub structs: Vec<Struct>,
    #[serde(default)]
    pub enums: Vec<Enumeration>,
    #[serde(default)]
    pub typedefs: Vec<Typedef>,
    #[serde(default)]
    pub functions: Vec<Function>,
    #[serde(default)]
    pub macros: Vec<Macro>,
}

impl TranslationUnit {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            ..Self::default()
        }
    }

    pub fn with_struct(mut self, decl: Struct) -> Self {
        self.structs.push(decl);
        self
    }

    pub fn with_enum(mut self, decl: Enumeration) -> Self {
        self.enums.push(decl);
        self
    }

    pub fn with_typedef(mut self, decl: Typedef) -> Self {
        self.typedefs.push(decl);
        self
    }

    pub fn with_function(mut self, decl: Function) -> Self {
        self.functions.push(decl);
        self
    }

    pub fn with_macro(mut self, decl: Macro) -> Self {
        self.macros.push(decl);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationGraph {
    #[serde(default)]
    pub translation_units: Vec<TranslationUnit>,
}

impl DeclarationGraph {
    pub fn new(translation_units: Vec<TranslationUnit>) -> Self {
        Self { translation_units }
    }

    /// Unnamed enums in graph order; the position is the anonymous index
    /// used by [`DeclRef::Anonymous`].
    pub fn anonymous_enums(&self) -> impl Iterator<Item = &Enumeration> {
        self.translation_units
            .iter()
            .flat_map(|unit| unit.enums.iter())
            .filter(|decl| decl.declared_name().is_none())
    }

    pub fn macros(&self) -> impl Iterator<Item = &Macro> {
        self.translation_units
            .iter()
            .flat_map(|unit| unit.macros.iter())
    }
}
