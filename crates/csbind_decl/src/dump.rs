//! Loader for declaration graphs dumped to JSON by an external clang pass.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::graph::{DeclarationGraph, TranslationUnit};
use crate::source::{HeaderParser, ParseOutcome, ParseRequest, ParserDiagnostic};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum DumpStatus {
    #[default]
    Success,
    Error,
    FileNotFound,
}

impl DumpStatus {
    fn kind(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Error => "Error",
            Self::FileNotFound => "FileNotFound",
        }
    }
}

#[derive(Debug, Deserialize)]
struct GraphDump {
    #[serde(default)]
    status: DumpStatus,
    #[serde(default)]
    diagnostics: Vec<ParserDiagnostic>,
    #[serde(default)]
    translation_units: Vec<TranslationUnit>,
}

/// [`HeaderParser`] backed by a JSON dump of the declaration graph.
#[derive(Debug, Clone)]
pub struct GraphDumpParser {
    path: PathBuf,
}

impl GraphDumpParser {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HeaderParser for GraphDumpParser {
    fn parse(&mut self, request: &ParseRequest) -> Result<ParseOutcome> {
        debug!(
            dump = %self.path.display(),
            headers = request.headers.len(),
            include_dirs = request.include_dirs.len(),
            "loading declaration graph dump"
        );
        let data = fs::read_to_string(&self.path).with_context(|| {
            format!(
                "failed to read declaration graph from {}",
                self.path.display()
            )
        })?;
        parse_dump(&data, request)
            .with_context(|| format!("failed to parse declaration graph at {}", self.path.display()))
    }
}

/// Parses dump text. A requested header with no translation unit in the dump
/// is reported the way a real parser reports a missing file.
pub fn parse_dump(data: &str, request: &ParseRequest) -> Result<ParseOutcome> {
    let dump: GraphDump = serde_json::from_str(data)?;

    if dump.status != DumpStatus::Success {
        return Ok(ParseOutcome::failure(dump.status.kind()).with_diagnostics(dump.diagnostics));
    }

    let missing = request.headers.iter().find(|header| {
        !dump
            .translation_units
            .iter()
            .any(|unit| file_matches(&unit.file_name, header))
    });
    if let Some(header) = missing {
        debug!(header = %header, "requested header absent from dump");
        return Ok(
            ParseOutcome::failure(DumpStatus::FileNotFound.kind()).with_diagnostics(dump.diagnostics)
        );
    }

    Ok(
        ParseOutcome::success(DeclarationGraph::new(dump.translation_units))
            .with_diagnostics(dump.diagnostics),
    )
}

/// Whether a translation unit file and a header identifier name the same
/// file; either may be the longer path.
pub fn file_matches(unit_file: &str, header: &str) -> bool {
    let unit = Path::new(unit_file);
    let header = Path::new(header);
    unit.ends_with(header) || header.ends_with(unit)
}
