use ahash::AHashSet;
use csbind_config::GeneratorConfig;
use tracing::debug;

use crate::context::GenerationContext;
use crate::error::{GenerateError, Result};
use crate::macros::Constant;
use crate::primitives::PrimitiveMap;
use crate::render::Renderer;
use crate::sink::ArtifactSink;

/// What a run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Artifact names in the order they were written.
    pub artifacts: Vec<String>,
    /// Declarations no signature or forced type reached.
    pub orphans: Vec<String>,
}

/// One generation run: the indexed graph, the read-only configuration and
/// the sink artifacts go to.
pub struct Session<'a> {
    pub(crate) config: &'a GeneratorConfig,
    pub(crate) context: GenerationContext,
    pub(crate) primitives: PrimitiveMap,
    pub(crate) constants: Vec<Constant>,
    pub(crate) renderer: Renderer<'a>,
    /// Typedefs being resolved since the last tag was entered.
    pub(crate) typedef_depth: usize,
    sink: &'a mut dyn ArtifactSink,
    written: AHashSet<String>,
    artifacts: Vec<String>,
}

impl<'a> Session<'a> {
    pub fn new(
        config: &'a GeneratorConfig,
        context: GenerationContext,
        primitives: PrimitiveMap,
        constants: Vec<Constant>,
        sink: &'a mut dyn ArtifactSink,
    ) -> Self {
        Self {
            config,
            context,
            primitives,
            constants,
            renderer: Renderer::new(&config.namespace),
            typedef_depth: 0,
            sink,
            written: AHashSet::new(),
            artifacts: Vec::new(),
        }
    }

    pub(crate) fn write_artifact(&mut self, name: &str, contents: String) -> Result<()> {
        if !self.written.insert(name.to_owned()) {
            return Err(GenerateError::ArtifactCollision(name.to_owned()));
        }
        self.sink
            .write(name, &contents)
            .map_err(|err| GenerateError::io(self.sink.location(name), err))?;
        debug!(artifact = name, bytes = contents.len(), "wrote artifact");
        self.artifacts.push(name.to_owned());
        Ok(())
    }

    pub fn finish(self) -> GenerationReport {
        GenerationReport {
            artifacts: self.artifacts,
            orphans: self.context.orphans(),
        }
    }
}
