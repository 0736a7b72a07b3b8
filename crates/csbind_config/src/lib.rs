//! Run configuration for the binding generator.
//!
//! A configuration is loaded once per run and treated as read-only from then
//! on: the override tables here are consulted by the generator, never mutated.

pub mod platform;

pub use crate::platform::Platform;

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use csbind_decl::PrimitiveKind;
use serde::{Deserialize, Serialize};

/// How a reference to a typedef is turned into a target type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypedefStrategy {
    /// Resolve the underlying type; the typedef produces no artifact.
    #[default]
    Unwrap,
    /// Treat the typedef as its own enumeration named after the typedef.
    NamedEnum,
}

/// Native binary of a library on one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformBinary {
    pub platform: Platform,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryDescriptor {
    /// Name of the generated facade, also the prefix of every per-library
    /// artifact.
    pub name: String,
    /// Header whose functions belong to this library.
    pub header: String,
    /// Platforms in declared order; the dispatch constructor tests them in
    /// this order.
    #[serde(default)]
    pub platforms: Vec<PlatformBinary>,
    #[serde(default)]
    pub default_platform: Option<Platform>,
}

impl LibraryDescriptor {
    pub fn new(name: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            header: header.into(),
            platforms: Vec::new(),
            default_platform: None,
        }
    }

    pub fn with_platform(mut self, platform: Platform, path: impl Into<String>) -> Self {
        self.platforms.push(PlatformBinary {
            platform,
            path: path.into(),
        });
        self
    }

    pub fn with_default_platform(mut self, platform: Platform) -> Self {
        self.default_platform = Some(platform);
        self
    }
}

/// Selects macros to expose as constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroSearch {
    pub prefix: String,
    #[serde(default)]
    pub exclude_prefix: Option<String>,
}

impl MacroSearch {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            exclude_prefix: None,
        }
    }

    pub fn excluding(mut self, exclude_prefix: impl Into<String>) -> Self {
        self.exclude_prefix = Some(exclude_prefix.into());
        self
    }

    pub fn matches(&self, name: &str) -> bool {
        name.starts_with(&self.prefix)
            && !self
                .exclude_prefix
                .as_deref()
                .is_some_and(|exclude| name.starts_with(exclude))
    }
}

const fn default_force_clear() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub include_dirs: Vec<PathBuf>,
    #[serde(default)]
    pub libraries: Vec<LibraryDescriptor>,
    pub output_dir: PathBuf,
    pub namespace: String,
    /// Delete stale `.cs` files instead of refusing a non-empty output
    /// directory.
    #[serde(default = "default_force_clear")]
    pub force_clear_output: bool,
    /// Declarations generated even when no signature reaches them.
    #[serde(default)]
    pub force_types: Vec<String>,
    /// Replacement declaration for tag names missing from the graph.
    #[serde(default)]
    pub not_found_overrides: BTreeMap<String, String>,
    #[serde(default)]
    pub macro_searches: Vec<MacroSearch>,
    /// Replaces the default primitive map entirely when present. Keys are
    /// primitive kind names (`int`, `u_long`, ...).
    #[serde(default)]
    pub primitive_types: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub typedef_strategies: BTreeMap<String, TypedefStrategy>,
    /// Field or parameter name mapped to the declaration its type becomes.
    #[serde(default)]
    pub name_overrides: BTreeMap<String, String>,
    #[serde(default)]
    pub anonymous_enum_prefixes: Vec<String>,
}

impl GeneratorConfig {
    pub fn new(output_dir: impl Into<PathBuf>, namespace: impl Into<String>) -> Self {
        Self {
            include_dirs: Vec::new(),
            libraries: Vec::new(),
            output_dir: output_dir.into(),
            namespace: namespace.into(),
            force_clear_output: true,
            force_types: Vec::new(),
            not_found_overrides: BTreeMap::new(),
            macro_searches: Vec::new(),
            primitive_types: None,
            typedef_strategies: BTreeMap::new(),
            name_overrides: BTreeMap::new(),
            anonymous_enum_prefixes: Vec::new(),
        }
    }

    pub fn with_library(mut self, library: LibraryDescriptor) -> Self {
        self.libraries.push(library);
        self
    }

    pub fn with_name_override(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.name_overrides.insert(name.into(), target.into());
        self
    }

    pub fn with_not_found_override(
        mut self,
        name: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.not_found_overrides.insert(name.into(), target.into());
        self
    }

    pub fn with_typedef_strategy(
        mut self,
        typedef: impl Into<String>,
        strategy: TypedefStrategy,
    ) -> Self {
        self.typedef_strategies.insert(typedef.into(), strategy);
        self
    }

    pub fn with_anonymous_enum_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.anonymous_enum_prefixes.push(prefix.into());
        self
    }

    pub fn with_macro_search(mut self, search: MacroSearch) -> Self {
        self.macro_searches.push(search);
        self
    }

    pub fn with_forced_type(mut self, name: impl Into<String>) -> Self {
        self.force_types.push(name.into());
        self
    }

    /// Loads a configuration file; `.json` files are read as JSON, anything
    /// else as TOML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&contents)
        } else {
            Self::from_toml_str(&contents)
        }
        .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "toml-config")]
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(not(feature = "toml-config"))]
    pub fn from_toml_str(_contents: &str) -> Result<Self> {
        bail!("TOML support not enabled. Enable the 'toml-config' feature.")
    }

    pub fn validate(&self) -> Result<()> {
        if self.namespace.trim().is_empty() {
            bail!("namespace must not be empty");
        }

        let mut names = BTreeSet::new();
        for library in &self.libraries {
            if library.name.trim().is_empty() {
                bail!("library name must not be empty");
            }
            if !names.insert(library.name.as_str()) {
                bail!("library `{}` is declared twice", library.name);
            }
            if library.header.trim().is_empty() {
                bail!("library `{}` has no header", library.name);
            }
            if library.platforms.is_empty() {
                bail!("library `{}` has no platforms", library.name);
            }

            let mut platforms = BTreeSet::new();
            for binary in &library.platforms {
                if !platforms.insert(binary.platform) {
                    bail!(
                        "library `{}` lists platform {} twice",
                        library.name,
                        binary.platform
                    );
                }
            }
            if let Some(default) = library.default_platform
                && !platforms.contains(&default)
            {
                bail!(
                    "library `{}` defaults to {default}, which has no binary",
                    library.name
                );
            }
        }

        if let Some(search) = self.macro_searches.iter().find(|s| s.prefix.is_empty()) {
            bail!(
                "macro search prefix must not be empty (exclude prefix {:?})",
                search.exclude_prefix
            );
        }

        self.primitive_overrides()?;
        Ok(())
    }

    /// The configured primitive map with its keys parsed, if one was given.
    pub fn primitive_overrides(&self) -> Result<Option<BTreeMap<PrimitiveKind, String>>> {
        let Some(table) = &self.primitive_types else {
            return Ok(None);
        };
        let mut parsed = BTreeMap::new();
        for (key, target) in table {
            let kind = key
                .parse::<PrimitiveKind>()
                .map_err(anyhow::Error::msg)
                .context("invalid primitive_types key")?;
            parsed.insert(kind, target.clone());
        }
        Ok(Some(parsed))
    }

    /// Headers handed to the parser, one per library.
    pub fn headers(&self) -> Vec<String> {
        self.libraries
            .iter()
            .map(|library| library.header.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linux_lib(name: &str) -> LibraryDescriptor {
        LibraryDescriptor::new(name, format!("{}.h", name.to_lowercase()))
            .with_platform(Platform::Linux, "lib.so")
    }

    #[test]
    fn test_macro_search_exclusion() {
        let search = MacroSearch::new("FT_").excluding("FT_ERR");
        assert!(search.matches("FT_LOAD_DEFAULT"));
        assert!(!search.matches("FT_ERR_OK"));
        assert!(!search.matches("GL_TRUE"));
        assert!(MacroSearch::new("LOG_").matches("LOG_ID_MAIN"));
    }

    #[test]
    fn test_validate_rejects_duplicate_platform() {
        let config = GeneratorConfig::new("out", "Lib").with_library(
            linux_lib("Lib").with_platform(Platform::Linux, "other.so"),
        );
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("twice"));
    }

    #[test]
    fn test_validate_rejects_unconfigured_default_platform() {
        let config = GeneratorConfig::new("out", "Lib")
            .with_library(linux_lib("Lib").with_default_platform(Platform::Windows));
        assert!(config.validate().is_err());

        let config = GeneratorConfig::new("out", "Lib")
            .with_library(linux_lib("Lib").with_default_platform(Platform::Linux));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicate_library_and_empty_namespace() {
        let config = GeneratorConfig::new("out", "Lib")
            .with_library(linux_lib("Lib"))
            .with_library(linux_lib("Lib"));
        assert!(config.validate().is_err());
        assert!(GeneratorConfig::new("out", " ").validate().is_err());
    }

    #[test]
    fn test_primitive_overrides_parse_keys() {
        let mut config = GeneratorConfig::new("out", "Lib");
        config.primitive_types = Some(BTreeMap::from([
            ("long".to_string(), "nint".to_string()),
            ("u_long".to_string(), "nuint".to_string()),
        ]));
        let map = config.primitive_overrides().unwrap().unwrap();
        assert_eq!(map[&PrimitiveKind::Long], "nint");
        assert_eq!(map[&PrimitiveKind::ULong], "nuint");

        config.primitive_types = Some(BTreeMap::from([("quad".to_string(), "x".to_string())]));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "output_dir": "out",
            "namespace": "Lib",
            "libraries": [{
                "name": "Lib",
                "header": "log.h",
                "platforms": [
                    { "platform": "windows", "path": "lib.dll" },
                    { "platform": "linux", "path": "lib.so" }
                ]
            }],
            "typedef_strategies": { "FT_Error": "named_enum" },
            "macro_searches": [{ "prefix": "LOG_", "exclude_prefix": "LOG_TAG" }]
        }"#;
        let config = GeneratorConfig::from_json_str(json).unwrap();
        assert!(config.force_clear_output);
        assert_eq!(config.libraries[0].platforms[0].platform, Platform::Windows);
        assert_eq!(config.libraries[0].platforms[0].path, "lib.dll");
        assert_eq!(
            config.typedef_strategies["FT_Error"],
            TypedefStrategy::NamedEnum
        );
        assert_eq!(config.headers(), ["log.h"]);
    }

    #[test]
    #[cfg(feature = "toml-config")]
    fn test_config_from_toml_keeps_platform_order() {
        let toml = r#"
            output_dir = "out"
            namespace = "Lib"
            force_clear_output = false
            anonymous_enum_prefixes = ["SOME", "SOME2"]

            [name_overrides]
            prio = "android_LogPriority"

            [[libraries]]
            name = "Lib"
            header = "some_runtimes.h"
            default_platform = "linux"

            [[libraries.platforms]]
            platform = "windows"
            path = "runtimes/win-x64/some.dll"

            [[libraries.platforms]]
            platform = "linux"
            path = "runtimes/linux-x64/some.so"
        "#;
        let config = GeneratorConfig::from_toml_str(toml).unwrap();
        let order: Vec<Platform> = config.libraries[0]
            .platforms
            .iter()
            .map(|binary| binary.platform)
            .collect();
        assert_eq!(order, [Platform::Windows, Platform::Linux]);
        assert!(!config.force_clear_output);
        assert_eq!(config.name_overrides["prio"], "android_LogPriority");
    }

    #[test]
    fn test_from_file_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("csbind.json");
        fs::write(&path, r#"{ "output_dir": "out", "namespace": "" }"#).unwrap();
        let err = GeneratorConfig::from_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("namespace"));
    }
}
