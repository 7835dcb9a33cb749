//! Preference persistence seam
//!
//! [`PreferenceStore`] is the narrow load/save interface the reader
//! configuration persists through. It is implemented by the sled-backed
//! [`KvStore`] and by [`MemoryPreferenceStore`], an in-process map that
//! tests and throwaway sessions can substitute.

use parking_lot::RwLock;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::kv::{KvError, KvStore, Result};

/// A key-value preference store with JSON values
pub trait PreferenceStore: Send + Sync {
    /// Load the raw value stored under `key`
    fn load(&self, key: &str) -> Result<Option<Value>>;

    /// Store `value` under `key`, replacing any previous value
    fn save(&self, key: &str, value: Value) -> Result<()>;

    /// Remove `key`, returning whether it was present
    fn remove(&self, key: &str) -> Result<bool>;

    /// Stored keys starting with `prefix`, sorted
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>>;

    /// Make pending writes durable
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

/// Typed helpers over any [`PreferenceStore`]
pub trait PreferenceStoreExt: PreferenceStore {
    /// Load and deserialize the value stored under `key`
    fn load_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.load(key)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Serialize and store `value` under `key`
    fn save_as<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        self.save(key, serde_json::to_value(value)?)
    }
}

impl<S: PreferenceStore + ?Sized> PreferenceStoreExt for S {}

impl PreferenceStore for KvStore {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        self.get(key)
    }

    fn save(&self, key: &str, value: Value) -> Result<()> {
        self.set(key, &value)
    }

    fn remove(&self, key: &str) -> Result<bool> {
        KvStore::remove(self, key)
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        KvStore::keys_with_prefix(self, prefix)
    }

    fn flush(&self) -> Result<()> {
        KvStore::flush(self)
    }
}

/// In-memory preference store
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: RwLock<HashMap<String, Value>>,
}

impl MemoryPreferenceStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }

    /// Snapshot of every stored key, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.values.read().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.read().get(key).cloned())
    }

    fn save(&self, key: &str, value: Value) -> Result<()> {
        if key.is_empty() {
            return Err(KvError::InvalidKey("key must not be empty".to_string()));
        }
        self.values.write().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.values.write().remove(key).is_some())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let mut keys: Vec<String> =
            self.values.read().keys().filter(|key| key.starts_with(prefix)).cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
