//! Declared C types to C# type references.

use csbind_config::TypedefStrategy;
use csbind_decl::{DeclRef, Type};
use tracing::{debug, info};

use crate::error::{GenerateError, Result};
use crate::session::Session;
use crate::target::TargetType;

/// Bound on typedefs nested without an intervening tag. `is_function` treats a
/// longer chain as not being a function; resolution rejects it as a cycle.
const MAX_TYPEDEF_DEPTH: usize = 64;

impl Session<'_> {
    /// Resolves a declared type, registering every struct or enumeration it
    /// names along the way.
    pub fn resolve(&mut self, ty: &Type) -> Result<TargetType> {
        match ty {
            Type::Builtin { primitive } => self
                .primitives
                .lookup(*primitive)
                .map(|name| TargetType::Primitive(name.to_owned()))
                .ok_or(GenerateError::MissingPrimitiveMapping(*primitive)),
            // a C function pointer is already a pointer in C#
            Type::Pointer { pointee } if self.is_function(pointee) => self.resolve(pointee),
            Type::Pointer { pointee } => Ok(TargetType::pointer(self.resolve(pointee)?)),
            Type::Tag { decl } => self.resolve_tag(decl),
            Type::Typedef { name } => self.resolve_typedef(name),
            Type::Function { params, ret } => {
                let params = params
                    .iter()
                    .map(|param| self.resolve(param))
                    .collect::<Result<Vec<_>>>()?;
                let ret = self.resolve(ret)?;
                Ok(TargetType::FunctionPointer {
                    params,
                    ret: Box::new(ret),
                })
            }
            Type::Array { element, length } => {
                Ok(TargetType::array(self.resolve(element)?, *length))
            }
        }
    }

    /// Resolves the type of a named field or parameter. A name listed in the
    /// name-override table takes the overriding declaration instead of the
    /// declared type.
    pub fn resolve_member(&mut self, name: &str, ty: &Type) -> Result<TargetType> {
        let config = self.config;
        let Some(target) = config.name_overrides.get(name) else {
            return self.resolve(ty);
        };
        if !self.context.is_known(target) {
            return Err(GenerateError::UnknownOverrideTarget {
                name: name.to_owned(),
                target: target.clone(),
            });
        }
        debug!(member = name, target = %target, "applying name override");
        self.resolve_tag(&DeclRef::Named(target.clone()))
    }

    fn resolve_tag(&mut self, decl: &DeclRef) -> Result<TargetType> {
        let name = match decl {
            DeclRef::Named(name) => name.clone(),
            DeclRef::Anonymous(index) => self
                .context
                .anonymous_name(*index)
                .map(str::to_owned)
                .ok_or(GenerateError::UnnamedEnumeration(*index))?,
        };
        // registration stops recursion through tags, so typedef depth restarts
        let outer = std::mem::take(&mut self.typedef_depth);
        let registration = self.register(&name);
        self.typedef_depth = outer;
        Ok(TargetType::Named(registration?.name().to_owned()))
    }

    fn resolve_typedef(&mut self, name: &str) -> Result<TargetType> {
        let strategy = self.config.typedef_strategies.get(name).copied();
        if strategy == Some(TypedefStrategy::NamedEnum) {
            return self.resolve_tag(&DeclRef::Named(name.to_owned()));
        }
        let underlying = self
            .context
            .typedef(name)
            .map(|decl| decl.underlying.clone())
            .ok_or_else(|| GenerateError::UnknownTypedef(name.to_owned()))?;
        if self.typedef_depth >= MAX_TYPEDEF_DEPTH {
            return Err(GenerateError::TypedefCycle(name.to_owned()));
        }
        if strategy.is_none() {
            info!(typedef = name, "unwrapping typedef");
        }
        self.typedef_depth += 1;
        let resolved = self.resolve(&underlying);
        self.typedef_depth -= 1;
        resolved
    }

    /// Whether `ty` is a function type, looking through typedefs.
    fn is_function(&self, ty: &Type) -> bool {
        let mut current = ty;
        for _ in 0..MAX_TYPEDEF_DEPTH {
            match current {
                Type::Function { .. } => return true,
                Type::Typedef { name } => match self.context.typedef(name) {
                    Some(decl) => current = &decl.underlying,
                    None => return false,
                },
                _ => return false,
            }
        }
        false
    }
}
