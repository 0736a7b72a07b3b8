//! Runtime platforms a library can ship binaries for.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Platform selector, rendered as the shared `Platform` enum of the
/// generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Windows,
    Linux,
}

impl Platform {
    /// Every platform, in the member order of the generated enum.
    pub const ALL: [Self; 3] = [Self::Android, Self::Windows, Self::Linux];

    /// Identifier used in generated type names and enum members.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Android => "Android",
            Self::Windows => "Windows",
            Self::Linux => "Linux",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
