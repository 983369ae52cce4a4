//! Adapter registry.
//!
//! An explicit builder step rather than a process-wide singleton hidden in
//! module init: this registry is constructed once in `main`, adapters
//! register into it, and it is then handed to the scheduler. Registrations
//! are immutable once built; duplicate names are a fatal configuration error.

use std::collections::HashMap;
use std::sync::Arc;

use crate::adapters::Adapter;
use crate::error::ConfigError;

pub struct AdapterRegistryBuilder {
    adapters: HashMap<String, Arc<dyn Adapter>>,
}

impl AdapterRegistryBuilder {
    pub fn new() -> Self {
        Self { adapters: HashMap::new() }
    }

    pub fn register(&mut self, name: impl Into<String>, adapter: Arc<dyn Adapter>) -> Result<(), ConfigError> {
        let name = name.into();
        if self.adapters.contains_key(&name) {
            return Err(ConfigError::DuplicateAdapter(name));
        }
        self.adapters.insert(name, adapter);
        Ok(())
    }

    /// Finalize into an immutable registry, validating `enabled_parsers`
    /// names against what was actually registered.
    pub fn build(self, enabled_parsers: &[String]) -> Result<AdapterRegistry, ConfigError> {
        for name in enabled_parsers {
            if !self.adapters.contains_key(name) {
                return Err(ConfigError::UnknownParser(name.clone()));
            }
        }

        let active: Vec<Arc<dyn Adapter>> = if enabled_parsers.is_empty() {
            self.adapters.values().cloned().collect()
        } else {
            enabled_parsers.iter().map(|name| self.adapters[name].clone()).collect()
        };

        Ok(AdapterRegistry { adapters: self.adapters, active })
    }
}

impl Default for AdapterRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct AdapterRegistry {
    adapters: HashMap<String, Arc<dyn Adapter>>,
    active: Vec<Arc<dyn Adapter>>,
}

impl AdapterRegistry {
    pub fn get(&self, name: &str) -> Option<Arc<dyn Adapter>> {
        self.adapters.get(name).cloned()
    }

    pub fn active(&self) -> &[Arc<dyn Adapter>] {
        &self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdapterError;
    use async_trait::async_trait;
    use tokio_util::sync::CancellationToken;

    struct StubAdapter(&'static str);

    #[async_trait]
    impl Adapter for StubAdapter {
        fn name(&self) -> &str {
            self.0
        }

        async fn start(&self, _cancellation: CancellationToken) -> Result<(), AdapterError> {
            Ok(())
        }

        async fn parse_once(&self) -> Result<(), AdapterError> {
            Ok(())
        }
    }

    #[test]
    fn duplicate_registration_is_fatal() {
        let mut builder = AdapterRegistryBuilder::new();
        builder.register("fonbet", Arc::new(StubAdapter("fonbet"))).unwrap();
        let result = builder.register("fonbet", Arc::new(StubAdapter("fonbet")));
        assert!(matches!(result, Err(ConfigError::DuplicateAdapter(_))));
    }

    #[test]
    fn unknown_enabled_parser_is_fatal() {
        let mut builder = AdapterRegistryBuilder::new();
        builder.register("fonbet", Arc::new(StubAdapter("fonbet"))).unwrap();
        let result = builder.build(&["nonexistent".to_string()]);
        assert!(matches!(result, Err(ConfigError::UnknownParser(_))));
    }

    #[test]
    fn empty_enabled_parsers_means_all_registered() {
        let mut builder = AdapterRegistryBuilder::new();
        builder.register("fonbet", Arc::new(StubAdapter("fonbet"))).unwrap();
        builder.register("pinnacle", Arc::new(StubAdapter("pinnacle"))).unwrap();
        let registry = builder.build(&[]).unwrap();
        assert_eq!(registry.active().len(), 2);
    }
}
