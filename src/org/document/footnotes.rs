//! Footnote registry
//!
//! Footnotes are exported in the order their names are first seen, whether that
//! first sighting is a reference or a definition. A later definition replaces an
//! earlier one without moving it.

use crate::org::ast::FootnoteDefinition;
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub struct Footnotes {
    pub title: String,
    order: Vec<String>,
    definitions: HashMap<String, FootnoteDefinition>,
}

impl Default for Footnotes {
    fn default() -> Self {
        Footnotes {
            title: "Footnotes".to_string(),
            order: Vec::new(),
            definitions: HashMap::new(),
        }
    }
}

impl Footnotes {
    pub fn new() -> Self {
        Self::default()
    }

    fn see(&mut self, name: &str) {
        if !self.order.iter().any(|n| n == name) {
            self.order.push(name.to_string());
        }
    }

    pub fn add_reference(&mut self, name: &str) {
        self.see(name);
    }

    pub fn add_definition(&mut self, definition: FootnoteDefinition) {
        self.see(&definition.name);
        if let Some(previous) = self.definitions.get(&definition.name) {
            if !previous.inline {
                warn!(name = %definition.name, "footnote redefined, keeping the later definition");
            }
        }
        self.definitions.insert(definition.name.clone(), definition);
    }

    pub fn get(&self, name: &str) -> Option<&FootnoteDefinition> {
        self.definitions.get(name)
    }

    /// Names in first-seen order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Block-level definitions in first-seen order. Inline definitions are
    /// rendered where they are used, and names without a definition are skipped.
    pub fn ordered(&self) -> Vec<&FootnoteDefinition> {
        self.order
            .iter()
            .filter_map(|name| match self.definitions.get(name) {
                Some(definition) => Some(definition),
                None => {
                    warn!(%name, "footnote referenced but never defined");
                    None
                }
            })
            .filter(|definition| !definition.inline)
            .collect()
    }
}
