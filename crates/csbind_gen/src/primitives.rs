//! Builtin C kinds to C# type names.

use std::collections::BTreeMap;

use ahash::AHashMap;
use csbind_decl::PrimitiveKind;

const DEFAULTS: &[(PrimitiveKind, &str)] = &[
    (PrimitiveKind::Int, "int"),
    (PrimitiveKind::Long, "int"),
    (PrimitiveKind::Float, "float"),
    (PrimitiveKind::Double, "double"),
    (PrimitiveKind::Bool, "bool"),
    (PrimitiveKind::String, "string"),
    (PrimitiveKind::ULong, "uint"),
    (PrimitiveKind::UInt, "uint"),
    (PrimitiveKind::Void, "void"),
    (PrimitiveKind::UChar, "byte"),
    (PrimitiveKind::UShort, "ushort"),
    (PrimitiveKind::Short, "short"),
    (PrimitiveKind::SChar, "sbyte"),
    (PrimitiveKind::Char, "byte"),
    (PrimitiveKind::ULongLong, "ulong"),
    (PrimitiveKind::LongLong, "long"),
];

#[derive(Debug, Clone)]
pub struct PrimitiveMap {
    entries: AHashMap<PrimitiveKind, String>,
}

impl Default for PrimitiveMap {
    fn default() -> Self {
        Self {
            entries: DEFAULTS
                .iter()
                .map(|(kind, name)| (*kind, (*name).to_string()))
                .collect(),
        }
    }
}

impl PrimitiveMap {
    /// A configured table replaces the defaults entirely.
    pub fn from_overrides(overrides: Option<BTreeMap<PrimitiveKind, String>>) -> Self {
        match overrides {
            Some(table) => Self {
                entries: table.into_iter().collect(),
            },
            None => Self::default(),
        }
    }

    pub fn lookup(&self, kind: PrimitiveKind) -> Option<&str> {
        self.entries.get(&kind).map(String::as_str)
    }
}
