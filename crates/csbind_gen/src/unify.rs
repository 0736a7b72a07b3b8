//! Pre-passes that give unnamed or aliased enumerations a name.

use std::collections::BTreeMap;

use ahash::AHashSet;
use csbind_config::TypedefStrategy;
use csbind_decl::{DeclRef, EnumItem, Enumeration, Type};
use tracing::debug;

use crate::context::GenerationContext;
use crate::error::{GenerateError, Result};

/// Longest prefix of `name` among `prefixes`; the first listed wins a tie.
pub fn longest_prefix<'a>(name: &str, prefixes: &'a [String]) -> Option<&'a str> {
    let mut best: Option<&'a str> = None;
    for prefix in prefixes {
        if name.starts_with(prefix.as_str()) && best.is_none_or(|b| prefix.len() > b.len()) {
            best = Some(prefix);
        }
    }
    best
}

fn merge_items(enumeration: &str, target: &mut Enumeration, items: &[EnumItem]) -> Result<()> {
    for item in items {
        match target.items.iter().find(|existing| existing.name == item.name) {
            Some(existing) if existing.value == item.value => {}
            Some(_) => {
                return Err(GenerateError::EnumMemberCollision {
                    enumeration: enumeration.to_owned(),
                    member: item.name.clone(),
                });
            }
            None => target.items.push(item.clone()),
        }
    }
    Ok(())
}

impl GenerationContext {
    /// Names every anonymous enum after the longest configured prefix of its
    /// first member. Enums landing on the same name are merged in graph
    /// order.
    pub fn unify_anonymous_enums(&mut self, prefixes: &[String]) -> Result<()> {
        let mut synthesized = AHashSet::new();
        for index in 0..self.anonymous_enums().len() {
            let decl = self.anonymous_enums()[index].clone();
            let Some(first) = decl.items.first() else {
                continue;
            };
            let Some(name) = longest_prefix(&first.name, prefixes) else {
                debug!(member = %first.name, "no prefix matches anonymous enum");
                continue;
            };

            if synthesized.contains(name) {
                let Some(target) = self.enumeration_mut(name) else {
                    continue;
                };
                merge_items(name, target, &decl.items)?;
            } else {
                let mut unified = Enumeration {
                    name: Some(name.to_owned()),
                    underlying: decl.underlying,
                    items: Vec::new(),
                };
                merge_items(name, &mut unified, &decl.items)?;
                self.insert_enum(unified)?;
                synthesized.insert(name.to_owned());
            }
            debug!(index, name, "named anonymous enum");
            self.name_anonymous(index, name);
        }
        Ok(())
    }

    /// Materialises an enumeration named after each typedef configured as
    /// [`TypedefStrategy::NamedEnum`] whose underlying type is an enum.
    pub fn alias_typedef_enums(
        &mut self,
        strategies: &BTreeMap<String, TypedefStrategy>,
    ) -> Result<()> {
        for (name, strategy) in strategies {
            if *strategy != TypedefStrategy::NamedEnum || self.enumeration(name).is_some() {
                continue;
            }
            let Some((source, anonymous)) = self.aliased_enumeration(name) else {
                debug!(typedef = %name, "typedef does not alias an enumeration");
                continue;
            };
            self.insert_enum(Enumeration {
                name: Some(name.clone()),
                underlying: source.underlying,
                items: source.items,
            })?;
            if let Some(index) = anonymous
                && self.anonymous_name(index).is_none()
            {
                self.name_anonymous(index, name);
            }
        }
        Ok(())
    }

    /// Enumeration a typedef ends up at, following typedef chains.
    fn aliased_enumeration(&self, typedef: &str) -> Option<(Enumeration, Option<usize>)> {
        let mut seen = AHashSet::new();
        let mut current = &self.typedef(typedef)?.underlying;
        loop {
            match current {
                Type::Tag {
                    decl: DeclRef::Named(name),
                } => return self.enumeration(name).cloned().map(|decl| (decl, None)),
                Type::Tag {
                    decl: DeclRef::Anonymous(index),
                } => {
                    return self
                        .anonymous_enums()
                        .get(*index)
                        .cloned()
                        .map(|decl| (decl, Some(*index)));
                }
                Type::Typedef { name } => {
                    if !seen.insert(name.as_str()) {
                        return None;
                    }
                    current = &self.typedef(name)?.underlying;
                }
                _ => return None,
            }
        }
    }
}
