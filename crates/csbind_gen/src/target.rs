use std::fmt;

/// A resolved C# type reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetType {
    Primitive(String),
    Named(String),
    Pointer(Box<TargetType>),
    FunctionPointer {
        params: Vec<TargetType>,
        ret: Box<TargetType>,
    },
    Array {
        element: Box<TargetType>,
        length: Option<u64>,
    },
}

/// Element types C# accepts in a `fixed` buffer.
const FIXED_ELEMENTS: &[&str] = &[
    "bool", "byte", "char", "short", "int", "long", "sbyte", "ushort", "uint", "ulong",
    "float", "double",
];

impl TargetType {
    pub fn pointer(pointee: Self) -> Self {
        Self::Pointer(Box::new(pointee))
    }

    pub fn array(element: Self, length: Option<u64>) -> Self {
        Self::Array {
            element: Box::new(element),
            length,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Self::Primitive(name) if name == "void")
    }

    /// Whether an array of this element type can be a `fixed` buffer.
    pub fn is_fixed_element(&self) -> bool {
        matches!(self, Self::Primitive(name) if FIXED_ELEMENTS.contains(&name.as_str()))
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(name) | Self::Named(name) => f.write_str(name),
            Self::Pointer(pointee) => write!(f, "{pointee}*"),
            Self::FunctionPointer { params, ret } => {
                write!(f, "delegate* unmanaged<")?;
                for param in params {
                    write!(f, "{param}, ")?;
                }
                write!(f, "{ret}>")
            }
            Self::Array { element, .. } => write!(f, "{element}[]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prim(name: &str) -> TargetType {
        TargetType::Primitive(name.to_string())
    }

    #[test]
    fn test_display() {
        assert_eq!(TargetType::pointer(prim("byte")).to_string(), "byte*");
        assert_eq!(
            TargetType::pointer(TargetType::pointer(TargetType::Named("Node".into()))).to_string(),
            "Node**"
        );
        assert_eq!(
            TargetType::FunctionPointer {
                params: vec![prim("int"), TargetType::pointer(prim("void"))],
                ret: Box::new(prim("void")),
            }
            .to_string(),
            "delegate* unmanaged<int, void*, void>"
        );
        assert_eq!(TargetType::array(prim("int"), Some(4)).to_string(), "int[]");
    }

    #[test]
    fn test_fixed_elements() {
        assert!(prim("byte").is_fixed_element());
        assert!(!prim("string").is_fixed_element());
        assert!(!TargetType::Named("Color".into()).is_fixed_element());
    }
}
