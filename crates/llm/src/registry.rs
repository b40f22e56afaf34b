//! String-keyed lookup of provider adapters.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::provider::{ContentProvider, ModelPricing};

/// Public description of a registered provider.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderDescriptor {
    pub key: String,
    pub model: String,
    pub pricing: ModelPricing,
}

/// Registered adapters keyed by lowercase request key.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn ContentProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter under its own key, replacing any previous one.
    pub fn register(&mut self, provider: Arc<dyn ContentProvider>) {
        let key = provider.key().trim().to_lowercase();
        if self.providers.insert(key.clone(), provider).is_some() {
            tracing::warn!(provider = %key, "Replaced previously registered provider");
        }
    }

    /// Look up an adapter. Keys are case-insensitive.
    pub fn get(&self, key: &str) -> Option<Arc<dyn ContentProvider>> {
        self.providers.get(&key.trim().to_lowercase()).cloned()
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.providers.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Descriptors of all registered providers, sorted by key.
    pub fn descriptors(&self) -> Vec<ProviderDescriptor> {
        let mut out: Vec<ProviderDescriptor> = self
            .providers
            .iter()
            .map(|(key, p)| ProviderDescriptor {
                key: key.clone(),
                model: p.model().to_string(),
                pricing: p.pricing(),
            })
            .collect();
        out.sort_by(|a, b| a.key.cmp(&b.key));
        out
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}
