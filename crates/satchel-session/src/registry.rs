//! Name-based provider selection.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::config::{MEMORY_PROVIDER, StoreConfig};
use crate::error::{Error, Result};
use crate::provider::SessionProvider;
use crate::store::MemoryStore;

/// Builds a provider from store configuration.
pub type ProviderConstructor =
    Arc<dyn Fn(&StoreConfig) -> Arc<dyn SessionProvider> + Send + Sync>;

/// Registry of session backends keyed by name.
///
/// ```rust,ignore
/// let registry = ProviderRegistry::with_defaults();
/// let provider = registry.build("memory", &StoreConfig::default())?;
/// ```
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    constructors: HashMap<String, ProviderConstructor>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in `"memory"` backend.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(MEMORY_PROVIDER, |config: &StoreConfig| {
            Arc::new(MemoryStore::with_config(config.clone())) as Arc<dyn SessionProvider>
        });
        registry
    }

    /// Register a backend constructor, replacing any previous one under `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn(&StoreConfig) -> Arc<dyn SessionProvider> + Send + Sync + 'static,
    {
        let name = name.into();
        debug!(provider = %name, "Registering session provider");
        self.constructors.insert(name, Arc::new(constructor));
    }

    /// Build the backend registered under `name`.
    pub fn build(&self, name: &str, config: &StoreConfig) -> Result<Arc<dyn SessionProvider>> {
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| Error::UnknownProvider(name.to_string()))?;
        Ok(constructor(config))
    }

    /// Build the backend named by `config.provider`.
    pub fn build_configured(&self, config: &StoreConfig) -> Result<Arc<dyn SessionProvider>> {
        self.build(&config.provider, config)
    }

    /// Check if a backend is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered backend names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    /// Backend that refuses every session, standing in for an unreachable
    /// remote store.
    struct OfflineProvider;

    impl SessionProvider for OfflineProvider {
        fn init(&self, _id: &str) -> Result<Arc<dyn crate::SessionHandle>> {
            Err(Error::Provider("offline".to_string()))
        }

        fn read(&self, _id: &str) -> Result<Arc<dyn crate::SessionHandle>> {
            Err(Error::Provider("offline".to_string()))
        }

        fn destroy(&self, _id: &str) {}

        fn gc(&self, _max_lifetime: Duration) -> usize {
            0
        }

        fn name(&self) -> &str {
            "offline"
        }
    }

    #[test]
    fn test_defaults_include_memory() {
        let registry = ProviderRegistry::with_defaults();
        assert!(registry.contains("memory"));
        assert_eq!(registry.names(), vec!["memory"]);

        let provider = registry.build("memory", &StoreConfig::default()).unwrap();
        assert_eq!(provider.name(), "memory");
    }

    #[test]
    fn test_unknown_provider() {
        let registry = ProviderRegistry::new();
        let result = registry.build("memory", &StoreConfig::default());
        assert!(matches!(result, Err(Error::UnknownProvider(name)) if name == "memory"));
    }

    #[test]
    fn test_register_custom_provider() {
        let mut registry = ProviderRegistry::with_defaults();
        registry.register("offline", |_: &StoreConfig| {
            Arc::new(OfflineProvider) as Arc<dyn SessionProvider>
        });

        assert_eq!(registry.names(), vec!["memory", "offline"]);

        let config = StoreConfig::new().with_provider("offline");
        let provider = registry.build_configured(&config).unwrap();
        assert!(matches!(provider.init("s1"), Err(Error::Provider(_))));
    }

    #[test]
    fn test_built_providers_are_independent() {
        let registry = ProviderRegistry::with_defaults();
        let config = StoreConfig::default();

        let first = registry.build("memory", &config).unwrap();
        let second = registry.build("memory", &config).unwrap();

        first.init("s1").unwrap();
        assert_eq!(first.gc(Duration::ZERO), 1);
        assert_eq!(second.gc(Duration::ZERO), 0);
    }
}
