//! The seam between the generator and whatever parses C headers.
//!
//! The generator only needs a declaration graph and the diagnostics emitted
//! while building it, so any front end (a clang dump, a test fixture) can sit
//! behind [`HeaderParser`].

use std::fmt;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::graph::DeclarationGraph;

/// What the generator asks the parser to scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseRequest {
    pub include_dirs: Vec<PathBuf>,
    pub headers: Vec<String>,
}

impl ParseRequest {
    pub fn new(include_dirs: Vec<PathBuf>, headers: Vec<String>) -> Self {
        Self {
            include_dirs,
            headers,
        }
    }
}

/// Non-fatal message reported while scanning headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserDiagnostic {
    pub file_name: String,
    pub line: u32,
    pub column: u32,
    pub message: String,
}

impl fmt::Display for ParserDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.file_name, self.line, self.column, self.message
        )
    }
}

/// Non-success result kind reported by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub kind: String,
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.kind)
    }
}

/// Parser result: the graph (or the failure kind) plus diagnostics, which
/// are reported either way.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub result: Result<DeclarationGraph, ParseFailure>,
    pub diagnostics: Vec<ParserDiagnostic>,
}

impl ParseOutcome {
    pub fn success(graph: DeclarationGraph) -> Self {
        Self {
            result: Ok(graph),
            diagnostics: Vec::new(),
        }
    }

    pub fn failure(kind: impl Into<String>) -> Self {
        Self {
            result: Err(ParseFailure { kind: kind.into() }),
            diagnostics: Vec::new(),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Vec<ParserDiagnostic>) -> Self {
        self.diagnostics = diagnostics;
        self
    }
}

pub trait HeaderParser {
    /// `Err` is reserved for the parser being unable to run at all; a parse
    /// that ran and failed is a [`ParseOutcome`] carrying a [`ParseFailure`].
    fn parse(&mut self, request: &ParseRequest) -> Result<ParseOutcome>;
}

/// Hands out an already built graph. Useful for tests and for callers that
/// parse headers themselves.
#[derive(Debug, Clone)]
pub struct StaticParser {
    outcome: ParseOutcome,
}

impl StaticParser {
    pub fn new(graph: DeclarationGraph) -> Self {
        Self {
            outcome: ParseOutcome::success(graph),
        }
    }

    pub fn from_outcome(outcome: ParseOutcome) -> Self {
        Self { outcome }
    }
}

impl HeaderParser for StaticParser {
    fn parse(&mut self, _request: &ParseRequest) -> Result<ParseOutcome> {
        Ok(self.outcome.clone())
    }
}
