//! In-memory secret store

use std::collections::HashMap;

use parking_lot::RwLock;

use super::traits::SecretStore;

/// Fixed credentials, for tests and embedders that resolve keys themselves
///
/// ```
/// use flowai_core::secrets::{MemorySecretStore, SecretStore};
///
/// let store = MemorySecretStore::new();
/// store.insert("openai", "sk-test");
/// assert_eq!(store.get("openai").as_deref(), Some("sk-test"));
/// ```
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    secrets: RwLock<HashMap<String, String>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secrets(initial: HashMap<String, String>) -> Self {
        Self {
            secrets: RwLock::new(initial),
        }
    }

    /// Set or replace a credential
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.secrets.write().insert(key.into(), value.into());
    }

    /// Forget a credential, returning the old value
    pub fn remove(&self, key: &str) -> Option<String> {
        self.secrets.write().remove(key)
    }
}

impl SecretStore for MemorySecretStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.secrets.read().get(key).filter(|v| !v.is_empty()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_remove() {
        let store = MemorySecretStore::new();
        assert!(!store.has("openai"));

        store.insert("openai", "sk-test");
        assert_eq!(store.get("openai"), Some("sk-test".to_string()));

        assert_eq!(store.remove("openai").as_deref(), Some("sk-test"));
        assert!(store.remove("openai").is_none());
    }

    #[test]
    fn test_empty_value_is_missing() {
        let store = MemorySecretStore::with_secrets(HashMap::from([("openai".to_string(), String::new())]));
        assert!(store.get("openai").is_none());
    }
}
