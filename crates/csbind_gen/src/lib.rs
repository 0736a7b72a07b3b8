//! C# P/Invoke binding generation from a C declaration graph.
//!
//! A run indexes the graph, names anonymous and aliased enumerations,
//! evaluates the selected macros and then, library by library, resolves
//! every function signature. Resolving a signature registers the structs
//! and enumerations it reaches, each of which is emitted exactly once.

pub mod context;
pub mod emit;
pub mod error;
pub mod identifier;
pub mod macros;
pub mod primitives;
pub mod registrar;
pub mod render;
pub mod resolve;
pub mod session;
pub mod sink;
pub mod target;
pub mod unify;

pub use context::GenerationContext;
pub use error::{GenerateError, Result};
pub use identifier::Identifier;
pub use macros::{Constant, extract_constants};
pub use primitives::PrimitiveMap;
pub use registrar::Registration;
pub use render::{Member, Renderer, Signature};
pub use session::{GenerationReport, Session};
pub use sink::{ArtifactSink, DirectorySink, MemorySink, prepare_output_dir};
pub use target::TargetType;

use ahash::AHashSet;
use csbind_config::GeneratorConfig;
use csbind_decl::{DeclarationGraph, HeaderParser, ParseRequest};
use tracing::{info, warn};

/// Parses the configured headers and writes every artifact to `sink`.
pub fn generate(
    config: &GeneratorConfig,
    parser: &mut dyn HeaderParser,
    sink: &mut dyn ArtifactSink,
) -> Result<GenerationReport> {
    let graph = parse_headers(config, parser)?;
    generate_from_graph(config, &graph, sink)
}

/// Validates `config` and runs the parser over its headers.
fn parse_headers(
    config: &GeneratorConfig,
    parser: &mut dyn HeaderParser,
) -> Result<DeclarationGraph> {
    config
        .validate()
        .map_err(|err| GenerateError::InvalidConfig(format!("{err:#}")))?;

    let request = ParseRequest::new(config.include_dirs.clone(), config.headers());
    let outcome = parser
        .parse(&request)
        .map_err(|err| GenerateError::ParseFailed {
            kind: format!("{err:#}"),
        })?;
    for diagnostic in &outcome.diagnostics {
        warn!(%diagnostic, "parser diagnostic");
    }
    outcome
        .result
        .map_err(|failure| GenerateError::ParseFailed { kind: failure.kind })
}

/// Generates from an already parsed graph.
pub fn generate_from_graph(
    config: &GeneratorConfig,
    graph: &DeclarationGraph,
    sink: &mut dyn ArtifactSink,
) -> Result<GenerationReport> {
    let primitives = config
        .primitive_overrides()
        .map(PrimitiveMap::from_overrides)
        .map_err(|err| GenerateError::InvalidConfig(format!("{err:#}")))?;

    let mut context = GenerationContext::index(graph)?;
    context.unify_anonymous_enums(&config.anonymous_enum_prefixes)?;
    context.alias_typedef_enums(&config.typedef_strategies)?;
    let constants = extract_constants(graph, &config.macro_searches);

    let mut session = Session::new(config, context, primitives, constants, sink);
    session.emit_platform_enum()?;
    let mut claimed = AHashSet::new();
    for library in &config.libraries {
        session.emit_library(graph, library, &mut claimed)?;
    }
    session.emit_forced_types()?;

    let report = session.finish();
    for orphan in &report.orphans {
        warn!(declaration = %orphan, "declaration is never referenced");
    }
    info!(
        artifacts = report.artifacts.len(),
        orphans = report.orphans.len(),
        "generation finished"
    );
    Ok(report)
}

/// Writes `<name>.cs` files into `config.output_dir`. The directory is only
/// prepared once the headers parsed, so a failed parse leaves it untouched.
pub fn generate_to_directory(
    config: &GeneratorConfig,
    parser: &mut dyn HeaderParser,
) -> Result<GenerationReport> {
    let graph = parse_headers(config, parser)?;
    prepare_output_dir(&config.output_dir, config.force_clear_output)?;
    let mut sink = DirectorySink::new(&config.output_dir);
    generate_from_graph(config, &graph, &mut sink)
}
