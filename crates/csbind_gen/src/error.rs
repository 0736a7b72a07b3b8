use std::io;
use std::path::PathBuf;

use csbind_decl::PrimitiveKind;
use thiserror::Error;

pub type Result<T, E = GenerateError> = std::result::Result<T, E>;

/// Fatal generation errors. Any of these aborts the run; artifacts already
/// written stay on disk.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("header parsing failed: {kind}")]
    ParseFailed { kind: String },
    #[error("output directory {} is not empty and clearing is disabled", .0.display())]
    OutputNotEmpty(PathBuf),
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("`{0}` is declared more than once")]
    DuplicateDeclaration(String),
    #[error("enumeration `{enumeration}` receives member `{member}` with conflicting values")]
    EnumMemberCollision { enumeration: String, member: String },
    #[error("override for `{name}` targets unknown declaration `{target}`")]
    UnknownOverrideTarget { name: String, target: String },
    #[error("no target type configured for primitive `{0}`")]
    MissingPrimitiveMapping(PrimitiveKind),
    #[error("typedef `{0}` is not declared")]
    UnknownTypedef(String),
    #[error("typedef `{0}` refers back to itself")]
    TypedefCycle(String),
    #[error("anonymous enumeration #{0} is referenced but has no name")]
    UnnamedEnumeration(usize),
    #[error("`{0}` is not a known struct or enumeration")]
    UnsupportedTypeName(String),
    #[error("not-found overrides form a cycle: {}", .0.join(" -> "))]
    OverrideCycle(Vec<String>),
    #[error("no translation unit matches header `{header}` of library `{library}`")]
    MissingTranslationUnit { library: String, header: String },
    #[error("artifact `{0}` is written twice")]
    ArtifactCollision(String),
}

impl GenerateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
