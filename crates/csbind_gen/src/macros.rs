//! Mines `#define`s into typed constants.

use ahash::{AHashMap, AHashSet};
use csbind_config::MacroSearch;
use csbind_decl::DeclarationGraph;
use csbind_eval::{EvalError, Scope, Value, evaluate_str};
use tracing::{debug, warn};

/// A macro evaluated to a typed value.
#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    pub name: String,
    pub value: Value,
}

/// Resolves identifiers to other macros of the graph, evaluating them on
/// first use.
struct MacroScope<'g> {
    definitions: AHashMap<&'g str, &'g str>,
    evaluated: AHashMap<String, Value>,
    in_progress: AHashSet<String>,
}

impl<'g> MacroScope<'g> {
    fn new(graph: &'g DeclarationGraph) -> Self {
        let mut definitions = AHashMap::new();
        for definition in graph.macros() {
            if definitions.contains_key(definition.name.as_str()) {
                debug!(name = %definition.name, "ignoring repeated macro definition");
                continue;
            }
            definitions.insert(definition.name.as_str(), definition.expression.as_str());
        }
        Self {
            definitions,
            evaluated: AHashMap::new(),
            in_progress: AHashSet::new(),
        }
    }

    fn evaluate(&mut self, name: &str) -> Result<Value, EvalError> {
        if let Some(value) = self.evaluated.get(name) {
            return Ok(value.clone());
        }
        let Some(source) = self.definitions.get(name).copied() else {
            return Err(EvalError::UnknownIdentifier(name.to_owned()));
        };
        if !self.in_progress.insert(name.to_owned()) {
            return Err(EvalError::Cycle(name.to_owned()));
        }
        let result = evaluate_str(source, self);
        self.in_progress.remove(name);

        let value = result?;
        self.evaluated.insert(name.to_owned(), value.clone());
        Ok(value)
    }
}

impl Scope for MacroScope<'_> {
    fn resolve(&mut self, name: &str) -> Result<Value, EvalError> {
        self.evaluate(name)
    }
}

/// Runs every search in order over the graph's macros. A macro is extracted
/// at most once; one that fails to evaluate is skipped.
pub fn extract_constants(graph: &DeclarationGraph, searches: &[MacroSearch]) -> Vec<Constant> {
    let mut scope = MacroScope::new(graph);
    let mut seen = AHashSet::new();
    let mut constants = Vec::new();

    for search in searches {
        for definition in graph.macros() {
            if !search.matches(&definition.name) || !seen.insert(definition.name.as_str()) {
                continue;
            }
            match scope.evaluate(&definition.name) {
                Ok(value) => constants.push(Constant {
                    name: definition.name.clone(),
                    value,
                }),
                Err(err) => {
                    warn!(name = %definition.name, error = %err, "skipping macro");
                }
            }
        }
    }

    debug!(count = constants.len(), "extracted macro constants");
    constants
}
