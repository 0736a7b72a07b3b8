//! Per-run view of the declaration graph.
//!
//! The context indexes every struct, enumeration and typedef by name, keeps
//! the anonymous-enum name table and records which declarations have been
//! registered. It lives exactly as long as one generation run.

use ahash::{AHashMap, AHashSet};
use csbind_decl::{DeclRef, DeclarationGraph, Enumeration, Struct, Typedef};
use tracing::debug;

use crate::error::{GenerateError, Result};

#[derive(Debug, Default)]
pub struct GenerationContext {
    structs: AHashMap<String, Struct>,
    enums: AHashMap<String, Enumeration>,
    typedefs: AHashMap<String, Typedef>,
    anonymous: Vec<Enumeration>,
    anonymous_names: Vec<Option<String>>,
    /// Struct and enum names in the order they were first declared.
    order: Vec<String>,
    registered: AHashSet<String>,
}

impl GenerationContext {
    pub fn index(graph: &DeclarationGraph) -> Result<Self> {
        let mut context = Self::default();
        for unit in &graph.translation_units {
            for decl in &unit.structs {
                context.add_struct(decl)?;
            }
            for decl in &unit.enums {
                match decl.declared_name() {
                    Some(_) => context.add_enum(decl.clone())?,
                    None => {
                        context.anonymous.push(decl.clone());
                        context.anonymous_names.push(None);
                    }
                }
            }
            for decl in &unit.typedefs {
                context.add_typedef(decl)?;
            }
        }
        debug!(
            structs = context.structs.len(),
            enums = context.enums.len(),
            anonymous = context.anonymous.len(),
            typedefs = context.typedefs.len(),
            "indexed declaration graph"
        );
        Ok(context)
    }

    fn add_struct(&mut self, decl: &Struct) -> Result<()> {
        if self.enums.contains_key(&decl.name) {
            return Err(GenerateError::DuplicateDeclaration(decl.name.clone()));
        }
        match self.structs.get(&decl.name) {
            None => {
                self.order.push(decl.name.clone());
                self.structs.insert(decl.name.clone(), decl.clone());
            }
            // a forward declaration never replaces anything
            Some(_) if decl.incomplete => {}
            Some(existing) if existing.incomplete => {
                self.structs.insert(decl.name.clone(), decl.clone());
            }
            Some(existing) if existing == decl => {}
            Some(_) => return Err(GenerateError::DuplicateDeclaration(decl.name.clone())),
        }
        Ok(())
    }

    fn add_enum(&mut self, decl: Enumeration) -> Result<()> {
        let Some(name) = decl.declared_name().map(str::to_owned) else {
            return Ok(());
        };
        if self.structs.contains_key(&name) {
            return Err(GenerateError::DuplicateDeclaration(name));
        }
        match self.enums.get(&name) {
            None => {
                self.order.push(name.clone());
                self.enums.insert(name, decl);
                Ok(())
            }
            Some(existing) if *existing == decl => Ok(()),
            Some(_) => Err(GenerateError::DuplicateDeclaration(name)),
        }
    }

    fn add_typedef(&mut self, decl: &Typedef) -> Result<()> {
        match self.typedefs.get(&decl.name) {
            None => {
                self.typedefs.insert(decl.name.clone(), decl.clone());
                Ok(())
            }
            Some(existing) if existing == decl => Ok(()),
            Some(_) => Err(GenerateError::DuplicateDeclaration(decl.name.clone())),
        }
    }

    /// Adds an enumeration the generator made up (a unified anonymous enum
    /// or a typedef alias). Its name must not clash with a declared one.
    pub(crate) fn insert_enum(&mut self, decl: Enumeration) -> Result<()> {
        let Some(name) = decl.declared_name().map(str::to_owned) else {
            return Ok(());
        };
        if self.is_known(&name) {
            return Err(GenerateError::DuplicateDeclaration(name));
        }
        self.order.push(name.clone());
        self.enums.insert(name, decl);
        Ok(())
    }

    pub fn structure(&self, name: &str) -> Option<&Struct> {
        self.structs.get(name)
    }

    pub fn enumeration(&self, name: &str) -> Option<&Enumeration> {
        self.enums.get(name)
    }

    pub(crate) fn enumeration_mut(&mut self, name: &str) -> Option<&mut Enumeration> {
        self.enums.get_mut(name)
    }

    pub fn typedef(&self, name: &str) -> Option<&Typedef> {
        self.typedefs.get(name)
    }

    /// Whether `name` is a struct or enumeration the registrar can emit.
    pub fn is_known(&self, name: &str) -> bool {
        self.structs.contains_key(name) || self.enums.contains_key(name)
    }

    pub fn anonymous_enums(&self) -> &[Enumeration] {
        &self.anonymous
    }

    pub fn anonymous_name(&self, index: usize) -> Option<&str> {
        self.anonymous_names.get(index).and_then(Option::as_deref)
    }

    pub(crate) fn name_anonymous(&mut self, index: usize, name: &str) {
        if let Some(slot) = self.anonymous_names.get_mut(index) {
            *slot = Some(name.to_owned());
        }
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.registered.contains(name)
    }

    /// Returns `false` when the name was already registered.
    pub(crate) fn mark_registered(&mut self, name: &str) -> bool {
        self.registered.insert(name.to_owned())
    }

    /// Declarations nothing registered, in declaration order, followed by
    /// the anonymous enums that never got a name.
    pub fn orphans(&self) -> Vec<String> {
        let mut orphans: Vec<String> = self
            .order
            .iter()
            .filter(|name| !self.registered.contains(*name))
            .cloned()
            .collect();
        orphans.extend(
            self.anonymous_names
                .iter()
                .enumerate()
                .filter(|(_, name)| name.is_none())
                .map(|(index, _)| DeclRef::Anonymous(index).to_string()),
        );
        orphans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csbind_decl::{EnumItem, Field, PrimitiveKind, TranslationUnit, Type};

    fn int_field(name: &str) -> Field {
        Field::new(name, Type::builtin(PrimitiveKind::Int))
    }

    #[test]
    fn test_complete_definition_supersedes_forward_declaration() {
        let mut forward = Struct::new("Node", Vec::new());
        forward.incomplete = true;
        let graph = DeclarationGraph::new(vec![
            TranslationUnit::new("a.h").with_struct(forward.clone()),
            TranslationUnit::new("b.h")
                .with_struct(Struct::new("Node", vec![int_field("value")]))
                .with_struct(forward),
        ]);

        let context = GenerationContext::index(&graph).unwrap();
        let node = context.structure("Node").unwrap();
        assert!(!node.incomplete);
        assert_eq!(node.fields.len(), 1);
    }

    #[test]
    fn test_struct_and_enum_share_a_namespace() {
        let graph = DeclarationGraph::new(vec![
            TranslationUnit::new("a.h")
                .with_struct(Struct::new("Color", vec![int_field("r")]))
                .with_enum(Enumeration::named("Color", vec![EnumItem::new("Red", 0)])),
        ]);
        assert!(matches!(
            GenerationContext::index(&graph),
            Err(GenerateError::DuplicateDeclaration(name)) if name == "Color"
        ));
    }

    #[test]
    fn test_conflicting_struct_definitions_are_rejected() {
        let graph = DeclarationGraph::new(vec![
            TranslationUnit::new("a.h").with_struct(Struct::new("S", vec![int_field("a")])),
            TranslationUnit::new("b.h").with_struct(Struct::new("S", vec![int_field("b")])),
        ]);
        assert!(matches!(
            GenerationContext::index(&graph),
            Err(GenerateError::DuplicateDeclaration(_))
        ));
    }

    #[test]
    fn test_orphans_in_declaration_order() {
        let graph = DeclarationGraph::new(vec![
            TranslationUnit::new("a.h")
                .with_struct(Struct::new("B", Vec::new()))
                .with_struct(Struct::new("A", Vec::new()))
                .with_enum(Enumeration::anonymous(vec![EnumItem::new("X", 1)])),
        ]);
        let mut context = GenerationContext::index(&graph).unwrap();
        assert!(context.mark_registered("A"));
        assert!(!context.mark_registered("A"));
        assert_eq!(context.orphans(), ["B", "<anonymous enum #0>"]);
    }
}
