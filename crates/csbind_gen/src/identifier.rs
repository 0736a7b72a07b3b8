//! Identifiers as they appear in generated C#.

use core::fmt::{Display, Formatter, Result};

const RESERVED: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed",
    "short", "sizeof", "stackalloc", "static", "string", "struct", "switch", "this",
    "throw", "true", "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort",
    "using", "virtual", "void", "volatile", "while",
];

/// A C name made safe to use as a C# identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Escapes reserved words with a leading `_`.
    pub fn escape(name: &str) -> Self {
        if is_reserved(name) {
            Self(format!("_{name}"))
        } else {
            Self(name.to_owned())
        }
    }

    /// Parameter name, falling back to `arg{index}` for unnamed parameters.
    pub fn parameter(name: &str, index: usize) -> Self {
        if name.is_empty() {
            Self(format!("arg{index}"))
        } else {
            Self::escape(name)
        }
    }

    /// Field name, falling back to `field{index}` for unnamed members.
    pub fn field(name: &str, index: usize) -> Self {
        if name.is_empty() {
            Self(format!("field{index}"))
        } else {
            Self::escape(name)
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[inline]
pub fn is_reserved(name: &str) -> bool {
    RESERVED.contains(&name)
}

impl Display for Identifier {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identifier {
    #[inline]
    fn from(val: &str) -> Self {
        Self::escape(val)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_words_are_prefixed() {
        for word in ["internal", "base", "params", "event", "string"] {
            assert_eq!(Identifier::escape(word).to_string(), format!("_{word}"));
        }
        assert_eq!(Identifier::escape("prio").as_str(), "prio");
    }

    #[test]
    fn test_unnamed_parameter_gets_positional_name() {
        assert_eq!(Identifier::parameter("", 2).as_str(), "arg2");
        assert_eq!(Identifier::parameter("in", 0).as_str(), "_in");
    }
}
