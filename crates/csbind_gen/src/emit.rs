//! Per-library artifacts: native bindings, platform wrappers, the contract
//! and the dispatching facade.

use ahash::AHashSet;
use csbind_config::{LibraryDescriptor, Platform};
use csbind_decl::{DeclarationGraph, Function, file_matches};
use tracing::{debug, info};

use crate::error::{GenerateError, Result};
use crate::identifier::Identifier;
use crate::render::{Member, Signature};
use crate::session::Session;

impl Session<'_> {
    pub(crate) fn signature(&mut self, function: &Function) -> Result<Signature> {
        let mut params = Vec::with_capacity(function.params.len());
        for (index, param) in function.params.iter().enumerate() {
            let ty = self.resolve_member(&param.name, &param.ty)?;
            params.push(Member {
                name: Identifier::parameter(&param.name, index),
                ty,
            });
        }
        let ret = self.resolve(&function.ret)?;
        Ok(Signature {
            name: function.name.clone(),
            params,
            ret,
        })
    }

    /// Functions of the translation units matching the library's header that
    /// no earlier library claimed.
    fn partition<'g>(
        graph: &'g DeclarationGraph,
        library: &LibraryDescriptor,
        claimed: &mut AHashSet<String>,
    ) -> Result<Vec<&'g Function>> {
        let mut matched = false;
        let mut functions = Vec::new();
        for unit in &graph.translation_units {
            if !file_matches(&unit.file_name, &library.header) {
                continue;
            }
            matched = true;
            for function in &unit.functions {
                if claimed.insert(function.name.clone()) {
                    functions.push(function);
                } else {
                    debug!(
                        library = %library.name,
                        function = %function.name,
                        "function already bound"
                    );
                }
            }
        }
        if !matched {
            return Err(GenerateError::MissingTranslationUnit {
                library: library.name.clone(),
                header: library.header.clone(),
            });
        }
        Ok(functions)
    }

    pub(crate) fn emit_library(
        &mut self,
        graph: &DeclarationGraph,
        library: &LibraryDescriptor,
        claimed: &mut AHashSet<String>,
    ) -> Result<()> {
        let functions = Self::partition(graph, library, claimed)?;
        let signatures = functions
            .into_iter()
            .map(|function| self.signature(function))
            .collect::<Result<Vec<_>>>()?;

        let lib = &library.name;
        let interface = format!("I{lib}");
        for binary in &library.platforms {
            let class = format!("{lib}{}", binary.platform);
            let native = format!("{class}Native");

            let text = self.renderer.native(&native, &binary.path, &signatures);
            self.write_artifact(&native, text)?;

            let text =
                self.renderer
                    .wrapper(&class, &interface, &native, &signatures, &self.constants);
            self.write_artifact(&class, text)?;
        }

        let text = self
            .renderer
            .interface(&interface, &signatures, &self.constants);
        self.write_artifact(&interface, text)?;

        let platforms: Vec<Platform> = library.platforms.iter().map(|b| b.platform).collect();
        let text = self.renderer.facade(
            lib,
            &interface,
            &platforms,
            library.default_platform,
            &signatures,
            &self.constants,
        );
        self.write_artifact(lib, text)?;

        info!(
            library = %lib,
            functions = signatures.len(),
            platforms = platforms.len(),
            "generated library bindings"
        );
        Ok(())
    }

    pub(crate) fn emit_platform_enum(&mut self) -> Result<()> {
        let text = self.renderer.platform_enum();
        self.write_artifact("Platform", text)
    }

    pub(crate) fn emit_forced_types(&mut self) -> Result<()> {
        let config = self.config;
        for name in &config.force_types {
            let registration = self.register(name)?;
            debug!(name = %name, outcome = ?registration, "forced type");
        }
        Ok(())
    }
}
