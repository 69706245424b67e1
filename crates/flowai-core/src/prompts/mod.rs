//! Reusable prompt templates
//!
//! A template's content seeds a chat as its system message. Storage is left
//! to `PromptStore` implementations; `MemoryPromptStore` keeps them in memory.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// A reusable system prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub id: String,
    pub title: String,
    pub content: String,
}

impl PromptTemplate {
    pub fn new(id: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Prompt-template lookup
pub trait PromptStore: Send + Sync {
    fn get(&self, id: &str) -> Option<PromptTemplate>;

    /// All templates, sorted by title
    fn list(&self) -> Vec<PromptTemplate>;
}

#[derive(Debug, Default)]
pub struct MemoryPromptStore {
    templates: RwLock<BTreeMap<String, PromptTemplate>>,
}

impl MemoryPromptStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_templates(templates: impl IntoIterator<Item = PromptTemplate>) -> Self {
        let store = Self::new();
        for template in templates {
            store.insert(template);
        }
        store
    }

    /// Add or replace a template
    pub fn insert(&self, template: PromptTemplate) {
        self.templates.write().insert(template.id.clone(), template);
    }

    pub fn remove(&self, id: &str) -> Option<PromptTemplate> {
        self.templates.write().remove(id)
    }
}

impl PromptStore for MemoryPromptStore {
    fn get(&self, id: &str) -> Option<PromptTemplate> {
        self.templates.read().get(id).cloned()
    }

    fn list(&self) -> Vec<PromptTemplate> {
        let mut templates: Vec<_> = self.templates.read().values().cloned().collect();
        templates.sort_by(|a, b| a.title.cmp(&b.title));
        templates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let store = MemoryPromptStore::with_templates([
            PromptTemplate::new("purchasing", "Purchasing assistant", "You help buyers."),
            PromptTemplate::new("inventory", "Inventory", "You track stock."),
        ]);

        assert_eq!(store.get("purchasing").unwrap().content, "You help buyers.");
        assert!(store.get("missing").is_none());

        let titles: Vec<_> = store.list().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["Inventory", "Purchasing assistant"]);

        store.insert(PromptTemplate::new("inventory", "Inventory", "Updated"));
        assert_eq!(store.get("inventory").unwrap().content, "Updated");
        assert!(store.remove("inventory").is_some());
        assert_eq!(store.list().len(), 1);
    }
}
