//! Credential lookup

/// Read access to endpoint credentials
///
/// Keys are either endpoint flavors (`"openai"`), which a store may map to
/// its own names, or the store's raw names (`"OPENAI_API_KEY"`).
///
/// ```
/// use flowai_core::secrets::{EnvSecretStore, SecretStore};
///
/// let store = EnvSecretStore::new();
/// // OPENAI_API_KEY, then LLM_API_KEY
/// let _key = store.get("openai");
/// ```
pub trait SecretStore: Send + Sync {
    fn name(&self) -> &str;

    /// Non-empty value for `key`, if any
    fn get(&self, key: &str) -> Option<String>;

    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}
