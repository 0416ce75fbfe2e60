//! Per-sub-provider configuration results published to resources

use crate::error::{ProviderError, Result};
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// Opaque value a sub-provider produces from its configure step
pub type ProviderDataEntry = Arc<dyn Any + Send + Sync>;

/// Map of sub-provider name to the value its configure step produced
///
/// Built once by the composer and shared read-only behind an `Arc`.
/// Sub-providers whose block was absent have no entry.
#[derive(Default, Clone)]
pub struct ProviderData {
    entries: HashMap<String, ProviderDataEntry>,
}

impl ProviderData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: ProviderDataEntry) {
        self.entries.insert(name.into(), entry);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Typed lookup
    ///
    /// Returns `NotConfigured` when there is no entry for `name` and
    /// `WrongType` when the entry is not a `T`.
    pub fn get<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| ProviderError::NotConfigured(name.to_string()))?;
        Arc::clone(entry)
            .downcast::<T>()
            .map_err(|_| ProviderError::WrongType(name.to_string()))
    }
}

impl std::fmt::Debug for ProviderData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("ProviderData").field("entries", &names).finish()
    }
}
