use std::sync::Arc;

use morrigan_core::{CoreError, CoreResult};

use super::Provider;

/// Ordered mapping from provider name to its capability object.
///
/// Iteration follows insertion order, which is declaration order when built by
/// [`FactoryLoader`](super::FactoryLoader).
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    entries: Vec<(String, Arc<dyn Provider>)>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider. Names are unique.
    pub fn insert(&mut self, name: impl Into<String>, provider: Arc<dyn Provider>) -> CoreResult<()> {
        let name = name.into();
        if self.contains(&name) {
            return Err(CoreError::DuplicateProvider(name));
        }
        self.entries.push((name, provider));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Provider>> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, provider)| provider)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Provider>)> {
        self.entries
            .iter()
            .map(|(name, provider)| (name.as_str(), provider))
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.names())
            .finish()
    }
}
