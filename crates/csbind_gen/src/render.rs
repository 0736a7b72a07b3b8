//! C# source text for every artifact kind.
//!
//! Rendering is a pure function of its inputs: four-space indentation, LF
//! line endings and a trailing newline, so two runs over the same graph
//! produce byte-identical files.

use std::fmt::Write as _;

use csbind_config::Platform;
use csbind_decl::EnumItem;
use csbind_eval::Value;

use crate::identifier::Identifier;
use crate::macros::Constant;
use crate::target::TargetType;

const INDENT: &str = "    ";

/// A struct field or a function parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: Identifier,
    pub ty: TargetType,
}

/// A resolved function signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub params: Vec<Member>,
    pub ret: TargetType,
}

impl Signature {
    fn parameters(&self) -> String {
        self.params
            .iter()
            .map(|param| format!("{} {}", param.ty, param.name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn arguments(&self) -> String {
        self.params
            .iter()
            .map(|param| param.name.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn declaration(&self) -> String {
        format!("{} {}({})", self.ret, self.name, self.parameters())
    }
}

#[derive(Debug, Default)]
pub struct CodeWriter {
    out: String,
    depth: usize,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    /// Writes `header` and an opening brace, then indents.
    pub fn open(&mut self, header: impl AsRef<str>) {
        self.line(header);
        self.line("{");
        self.depth += 1;
    }

    pub fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/// Type name a constant is exposed as.
pub fn constant_type(value: &Value) -> &'static str {
    match value {
        Value::Long(_) => "CLong",
        Value::ULong(_) => "CULong",
        other => other.type_name(),
    }
}

/// C# expression producing a constant's value.
pub fn constant_literal(value: &Value) -> String {
    match value {
        Value::Int(v) => v.to_string(),
        Value::UInt(v) => format!("{v}U"),
        Value::Long(v) if i32::try_from(*v).is_ok() => format!("new CLong({v})"),
        Value::Long(v) => format!("new CLong((nint)({v}L))"),
        Value::ULong(v) if u32::try_from(*v).is_ok() => format!("new CULong({v}U)"),
        Value::ULong(v) => format!("new CULong((nuint)({v}UL))"),
        Value::Float(v) if v.is_nan() => "float.NaN".to_string(),
        Value::Float(v) if v.is_infinite() => infinity("float", v.is_sign_negative()),
        Value::Float(v) => format!("{v:?}F"),
        Value::Double(v) if v.is_nan() => "double.NaN".to_string(),
        Value::Double(v) if v.is_infinite() => infinity("double", v.is_sign_negative()),
        Value::Double(v) => format!("{v:?}"),
        Value::Bool(v) => v.to_string(),
        Value::Str(v) => string_literal(v),
    }
}

fn infinity(ty: &str, negative: bool) -> String {
    if negative {
        format!("{ty}.NegativeInfinity")
    } else {
        format!("{ty}.PositiveInfinity")
    }
}

/// Quoted, escaped C# string literal.
pub fn string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

pub struct Renderer<'a> {
    namespace: &'a str,
}

impl<'a> Renderer<'a> {
    pub fn new(namespace: &'a str) -> Self {
        Self { namespace }
    }

    fn document(&self, interop: bool, body: impl FnOnce(&mut CodeWriter)) -> String {
        let mut w = CodeWriter::new();
        if interop {
            w.line("using System.Runtime.InteropServices;");
            w.blank();
        }
        w.open(format!("namespace {}", self.namespace));
        body(&mut w);
        w.close();
        w.finish()
    }

    pub fn structure(&self, name: &str, union: bool, fields: &[Member]) -> String {
        self.document(true, |w| {
            let layout = if union { "Explicit" } else { "Sequential" };
            w.line(format!("[StructLayout(LayoutKind.{layout})]"));
            w.open(format!("public unsafe struct {name}"));
            for field in fields {
                // a managed array would make the struct non-blittable
                let buffer = match &field.ty {
                    TargetType::Array {
                        element,
                        length: Some(length),
                    } if !element.is_fixed_element() => {
                        Some(inline_buffer(w, &field.name, element, *length))
                    }
                    _ => None,
                };
                if union {
                    w.line("[FieldOffset(0)]");
                }
                match (&field.ty, buffer) {
                    (_, Some(buffer)) => w.line(format!("public {buffer} {};", field.name)),
                    (
                        TargetType::Array {
                            element,
                            length: Some(length),
                        },
                        None,
                    ) => {
                        w.line(format!("public fixed {element} {}[{length}];", field.name));
                    }
                    (ty, None) => w.line(format!("public {ty} {};", field.name)),
                }
            }
            w.close();
        })
    }

    pub fn enumeration(&self, name: &str, underlying: &TargetType, items: &[EnumItem]) -> String {
        self.document(true, |w| {
            w.open(format!("public enum {name} : {underlying}"));
            for (index, item) in items.iter().enumerate() {
                let separator = if index + 1 < items.len() { "," } else { "" };
                w.line(format!(
                    "{} = {}{separator}",
                    Identifier::escape(&item.name),
                    item.value
                ));
            }
            w.close();
        })
    }

    /// `{Lib}{Platform}Native`: raw entry points of one binary.
    pub fn native(&self, class: &str, binary: &str, signatures: &[Signature]) -> String {
        self.document(true, |w| {
            w.open(format!("internal static unsafe class {class}"));
            for (index, signature) in signatures.iter().enumerate() {
                if index > 0 {
                    w.blank();
                }
                w.line(format!(
                    "[DllImport({}, CallingConvention = CallingConvention.Cdecl)]",
                    string_literal(binary)
                ));
                w.line(format!("public static extern {};", signature.declaration()));
            }
            w.close();
        })
    }

    /// `{Lib}{Platform}`: forwards the contract to one native class.
    pub fn wrapper(
        &self,
        class: &str,
        interface: &str,
        native: &str,
        signatures: &[Signature],
        constants: &[Constant],
    ) -> String {
        self.document(true, |w| {
            w.open(format!("internal unsafe class {class} : {interface}"));
            let mut first = true;
            for signature in signatures {
                separate(w, &mut first);
                w.open(format!("public {}", signature.declaration()));
                w.line(forward(native, signature));
                w.close();
            }
            for constant in constants {
                separate(w, &mut first);
                w.line(format!(
                    "public {} {} => {};",
                    constant_type(&constant.value),
                    Identifier::escape(&constant.name),
                    constant_literal(&constant.value)
                ));
            }
            w.close();
        })
    }

    /// `I{Lib}`: the contract every platform wrapper implements.
    pub fn interface(&self, name: &str, signatures: &[Signature], constants: &[Constant]) -> String {
        self.document(true, |w| {
            w.open(format!("internal unsafe interface {name}"));
            for signature in signatures {
                w.line(format!("{};", signature.declaration()));
            }
            for constant in constants {
                w.line(format!(
                    "{} {} {{ get; }}",
                    constant_type(&constant.value),
                    Identifier::escape(&constant.name)
                ));
            }
            w.close();
        })
    }

    /// `{Lib}`: picks a wrapper at construction and forwards everything to
    /// it.
    pub fn facade(
        &self,
        library: &str,
        interface: &str,
        platforms: &[Platform],
        default_platform: Option<Platform>,
        signatures: &[Signature],
        constants: &[Constant],
    ) -> String {
        self.document(true, |w| {
            w.open(format!("public unsafe class {library}"));
            w.line(format!("private readonly {interface} lib;"));

            if let Some(platform) = default_platform {
                w.blank();
                w.open(format!("public {library}() : this(Platform.{platform})"));
                w.close();
            }

            w.blank();
            w.open(format!("public {library}(Platform platform)"));
            for (index, platform) in platforms.iter().enumerate() {
                let keyword = if index == 0 { "if" } else { "else if" };
                w.open(format!("{keyword} (platform == Platform.{platform})"));
                w.line(format!("lib = new {library}{platform}();"));
                w.close();
            }
            w.open("else");
            w.line("throw new System.NotSupportedException(\"not supported\");");
            w.close();
            w.close();

            for signature in signatures {
                w.blank();
                w.open(format!("public {}", signature.declaration()));
                w.line(forward("lib", signature));
                w.close();
            }
            for constant in constants {
                let name = Identifier::escape(&constant.name);
                w.blank();
                w.line(format!(
                    "public {} {name} => lib.{name};",
                    constant_type(&constant.value)
                ));
            }
            w.close();
        })
    }

    /// The shared `Platform` enumeration.
    pub fn platform_enum(&self) -> String {
        self.document(false, |w| {
            w.open("public enum Platform");
            let platforms = Platform::ALL;
            for (index, platform) in platforms.iter().enumerate() {
                let separator = if index + 1 < platforms.len() { "," } else { "" };
                w.line(format!("{platform}{separator}"));
            }
            w.close();
        })
    }
}

/// Nested struct holding `length` consecutive `element`s; returns its name.
fn inline_buffer(
    w: &mut CodeWriter,
    field: &Identifier,
    element: &TargetType,
    length: u64,
) -> String {
    let name = format!("{field}_Buffer");
    w.line("[StructLayout(LayoutKind.Sequential)]");
    w.open(format!("public unsafe struct {name}"));
    for slot in 0..length {
        w.line(format!("public {element} e{slot};"));
    }
    w.close();
    name
}

fn separate(w: &mut CodeWriter, first: &mut bool) {
    if !*first {
        w.blank();
    }
    *first = false;
}

fn forward(target: &str, signature: &Signature) -> String {
    let call = format!("{target}.{}({});", signature.name, signature.arguments());
    if signature.ret.is_void() {
        call
    } else {
        format!("return {call}")
    }
}
