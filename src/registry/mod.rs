//! Protocol-name resolution for backend implementations.
//!
//! The original design loaded backend modules dynamically by name; here the
//! same select-by-name behavior is a registry of factories. The local and
//! memory backends are pre-installed builtins, so core filesystem sync works
//! with zero external modules; remote-protocol backends are registered by
//! the embedding application before sessions bind them.

use std::collections::HashMap;

use tracing::debug;

use crate::backend::{local::LocalBackend, memory::MemBackend, VioBackend};
use crate::{Error, Result};

pub type BackendFactory = Box<dyn Fn() -> Box<dyn VioBackend>>;

pub struct Registry {
    factories: HashMap<String, BackendFactory>,
}

impl Registry {
    /// An empty registry with no resolvable protocols.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// A registry with the builtin backends pre-installed.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register("local", || Box::new(LocalBackend::new()));
        registry.register("memory", || Box::new(MemBackend::new()));
        registry
    }

    /// Register a backend factory under a protocol name. Re-registering a
    /// name replaces the previous factory.
    pub fn register<F>(&mut self, protocol: &str, factory: F)
    where
        F: Fn() -> Box<dyn VioBackend> + 'static,
    {
        debug!(target: "syncvio::registry", protocol, "backend_registered");
        self.factories.insert(protocol.to_string(), Box::new(factory));
    }

    /// Resolve a protocol name to its factory. Leaves no state behind on
    /// failure; an unknown name is reported, never defaulted.
    pub fn resolve(&self, protocol: &str) -> Result<&BackendFactory> {
        self.factories
            .get(protocol)
            .ok_or_else(|| Error::UnknownProtocol(protocol.to_string()).into())
    }

    pub fn protocols(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
