//! Exactly-once emission of structs and enumerations.

use csbind_decl::{Enumeration, Struct, Type};
use tracing::debug;

use crate::error::{GenerateError, Result};
use crate::identifier::Identifier;
use crate::render::Member;
use crate::session::Session;

/// Outcome of asking for a declaration by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// Emitted by this call.
    Emitted(String),
    /// Emitted by an earlier call.
    AlreadyEmitted(String),
    /// The name is unknown; a not-found override points at this one.
    Redirected(String),
}

impl Registration {
    /// The name generated code should use.
    pub fn name(&self) -> &str {
        match self {
            Self::Emitted(name) | Self::AlreadyEmitted(name) | Self::Redirected(name) => name,
        }
    }
}

impl Session<'_> {
    pub fn register(&mut self, name: &str) -> Result<Registration> {
        if self.context.is_registered(name) {
            return Ok(Registration::AlreadyEmitted(name.to_owned()));
        }

        if let Some(decl) = self.context.structure(name).cloned() {
            // marked first so self-referential fields stop here
            self.context.mark_registered(name);
            self.emit_struct(&decl)?;
            return Ok(Registration::Emitted(name.to_owned()));
        }

        if let Some(decl) = self.context.enumeration(name).cloned() {
            self.context.mark_registered(name);
            self.emit_enum(name, &decl)?;
            return Ok(Registration::Emitted(name.to_owned()));
        }

        self.redirect(name)
    }

    fn redirect(&mut self, name: &str) -> Result<Registration> {
        let config = self.config;
        let overrides = &config.not_found_overrides;
        let mut chain = vec![name.to_owned()];
        let mut current = name;
        while let Some(target) = overrides.get(current) {
            let cycle = chain.contains(target);
            chain.push(target.clone());
            if cycle {
                return Err(GenerateError::OverrideCycle(chain));
            }
            if self.context.is_known(target) {
                self.register(target)?;
                debug!(name, target = %target, "redirected unknown type name");
                return Ok(Registration::Redirected(target.clone()));
            }
            current = target.as_str();
        }
        if current == name {
            return Err(GenerateError::UnsupportedTypeName(name.to_owned()));
        }
        Err(GenerateError::UnknownOverrideTarget {
            name: name.to_owned(),
            target: current.to_owned(),
        })
    }

    fn emit_struct(&mut self, decl: &Struct) -> Result<()> {
        if decl.incomplete {
            debug!(name = %decl.name, "emitting struct without a definition");
        }
        let mut fields = Vec::with_capacity(decl.fields.len());
        for (index, field) in decl.fields.iter().enumerate() {
            let ty = self.resolve_member(&field.name, &field.ty)?;
            fields.push(Member {
                name: Identifier::field(&field.name, index),
                ty,
            });
        }
        let text = self.renderer.structure(&decl.name, decl.union, &fields);
        self.write_artifact(&decl.name, text)
    }

    fn emit_enum(&mut self, name: &str, decl: &Enumeration) -> Result<()> {
        let underlying = self.resolve(&Type::builtin(decl.underlying))?;
        let text = self.renderer.enumeration(name, &underlying, &decl.items);
        self.write_artifact(name, text)
    }
}
