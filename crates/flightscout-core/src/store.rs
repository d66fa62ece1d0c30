// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::source::DocumentSource;
use crate::EngineError;
use serde::de::DeserializeOwned;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Read-only repository over one static document.
///
/// The document is fetched on first access and shared for the rest of the
/// session. Concurrent first accesses perform a single load and all receive
/// the same `Arc`.
pub struct EntityStore<T> {
    source: Arc<dyn DocumentSource>,
    resource: String,
    cache: RwLock<Option<Arc<Vec<T>>>>,
    load_guard: Mutex<()>,
}

impl<T> EntityStore<T>
where
    T: DeserializeOwned + Clone + Send + Sync,
{
    pub fn new(source: Arc<dyn DocumentSource>, resource: &str) -> Self {
        Self {
            source,
            resource: resource.to_string(),
            cache: RwLock::new(None),
            load_guard: Mutex::new(()),
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn get_all(&self) -> Result<Arc<Vec<T>>, EngineError> {
        if let Some(items) = self.cached() {
            return Ok(items);
        }

        let _guard = self.load_guard.lock().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have finished loading while we waited.
        if let Some(items) = self.cached() {
            return Ok(items);
        }

        let items = Arc::new(self.load()?);
        *self.cache.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&items));
        Ok(items)
    }

    /// First entity whose selected field equals `value`.
    pub fn get_by<K, F>(&self, selector: F, value: &K) -> Result<Option<T>, EngineError>
    where
        K: PartialEq + ?Sized,
        F: Fn(&T) -> &K,
    {
        let all = self.get_all()?;
        Ok(all.iter().find(|item| selector(item) == value).cloned())
    }

    /// Entities whose scalar field is one of `values`.
    pub fn filter_by<K, F>(&self, selector: F, values: &[K]) -> Result<Vec<T>, EngineError>
    where
        K: PartialEq,
        F: Fn(&T) -> &K,
    {
        let all = self.get_all()?;
        Ok(all
            .iter()
            .filter(|item| values.contains(selector(item)))
            .cloned()
            .collect())
    }

    /// Entities whose array field shares at least one element with `values`.
    pub fn filter_by_any<K, F>(&self, selector: F, values: &[K]) -> Result<Vec<T>, EngineError>
    where
        K: PartialEq,
        F: Fn(&T) -> &[K],
    {
        let all = self.get_all()?;
        Ok(all
            .iter()
            .filter(|item| selector(item).iter().any(|v| values.contains(v)))
            .cloned()
            .collect())
    }

    /// Drops the cached document; the next access reloads it.
    pub fn invalidate(&self) {
        let _guard = self.load_guard.lock().unwrap_or_else(PoisonError::into_inner);
        *self.cache.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn cached(&self) -> Option<Arc<Vec<T>>> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(Arc::clone)
    }

    fn load(&self) -> Result<Vec<T>, EngineError> {
        let text = self
            .source
            .read(&self.resource)
            .map_err(|e| EngineError::data_unavailable(&self.resource, e))?;
        let items: Vec<T> = serde_json::from_str(&text).map_err(|e| {
            log::error!("[Store] JSON parse error for {}: {}", self.resource, e);
            EngineError::data_unavailable(&self.resource, e)
        })?;
        log::debug!("[Store] Loaded {} records from {}", items.len(), self.resource);
        Ok(items)
    }
}
