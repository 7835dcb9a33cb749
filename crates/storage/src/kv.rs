//! sled-backed preference database
//!
//! Preferences live in one named tree of a sled database, encoded as JSON
//! so a value written as one serde type can be read back as any compatible
//! one. Keys are plain UTF-8 strings such as `reader:page_color`.

use serde::{de::DeserializeOwned, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

/// Default tree holding reader preferences
pub const DEFAULT_TREE: &str = "preferences";

/// Errors from the preference database
#[derive(Debug, Error)]
pub enum KvError {
    /// The underlying sled database failed
    #[error("Preference database error: {0}")]
    Database(#[from] sled::Error),

    /// A value could not be encoded or decoded as JSON
    #[error("Preference value is not valid JSON for the requested type: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The key was rejected before reaching the database
    #[error("Invalid preference key: {0}")]
    InvalidKey(String),
}

/// Result alias for storage operations
pub type Result<T> = std::result::Result<T, KvError>;

/// Where and how the preference database is opened
#[derive(Debug, Clone)]
pub struct KvConfig {
    /// Directory of the sled database
    pub path: PathBuf,
    /// Tree the preferences are kept in
    pub tree: String,
    /// Page cache size in bytes
    pub cache_capacity: u64,
    /// Compress values on disk
    pub use_compression: bool,
    /// Background flush period; `None` leaves durability to explicit flushes
    pub flush_every_ms: Option<u64>,
}

impl Default for KvConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("iread_kv.db"),
            tree: DEFAULT_TREE.to_string(),
            cache_capacity: 8 * 1024 * 1024,
            use_compression: true,
            flush_every_ms: Some(500),
        }
    }
}

impl KvConfig {
    /// Database at `path` with default tuning
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), ..Self::default() }
    }

    /// Keep preferences in a different tree
    pub fn tree(mut self, name: impl Into<String>) -> Self {
        self.tree = name.into();
        self
    }

    /// Page cache size in bytes
    pub fn cache_capacity(mut self, bytes: u64) -> Self {
        self.cache_capacity = bytes;
        self
    }

    /// Toggle on-disk compression
    pub fn use_compression(mut self, enabled: bool) -> Self {
        self.use_compression = enabled;
        self
    }

    /// Background flush period, or `None` to flush only on request
    pub fn flush_every_ms(mut self, ms: Option<u64>) -> Self {
        self.flush_every_ms = ms;
        self
    }

    fn sled_config(&self) -> sled::Config {
        sled::Config::new()
            .path(&self.path)
            .cache_capacity(self.cache_capacity)
            .use_compression(self.use_compression)
            .flush_every_ms(self.flush_every_ms)
    }
}

/// Handle to the preference tree; clones share the same database
#[derive(Clone)]
pub struct KvStore {
    db: sled::Db,
    tree: sled::Tree,
}

impl KvStore {
    /// Open or create the database described by `config`
    pub fn new(config: KvConfig) -> Result<Self> {
        let db = config.sled_config().open()?;
        let store = Self::with_db(db, &config.tree)?;
        debug!(
            path = %config.path.display(),
            tree = %config.tree,
            entries = store.len(),
            "Opened preference database"
        );
        Ok(store)
    }

    /// Temporary database that disappears when the last handle is dropped
    pub fn in_memory() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::with_db(db, DEFAULT_TREE)
    }

    fn with_db(db: sled::Db, tree: &str) -> Result<Self> {
        let tree = db.open_tree(tree)?;
        Ok(Self { db, tree })
    }

    fn validate(key: &str) -> Result<&[u8]> {
        if key.is_empty() {
            return Err(KvError::InvalidKey("key must not be empty".to_string()));
        }
        Ok(key.as_bytes())
    }

    /// Decode the value under `key`
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let raw = self.tree.get(Self::validate(key)?)?;
        raw.map(|bytes| serde_json::from_slice(&bytes).map_err(KvError::from)).transpose()
    }

    /// Encode and write `value` under `key`
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let key = Self::validate(key)?;
        self.tree.insert(key, serde_json::to_vec(value)?)?;
        Ok(())
    }

    /// Delete `key`, returning whether it was present
    pub fn remove(&self, key: &str) -> Result<bool> {
        let previous = self.tree.remove(Self::validate(key)?)?;
        Ok(previous.is_some())
    }

    /// Keys starting with `prefix`, in byte order
    pub fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in self.tree.scan_prefix(prefix.as_bytes()) {
            let (key, _) = entry?;
            match std::str::from_utf8(&key) {
                Ok(key) => keys.push(key.to_string()),
                Err(_) => warn!(prefix, "Skipping non UTF-8 preference key"),
            }
        }
        Ok(keys)
    }

    /// Write buffered changes to disk
    pub fn flush(&self) -> Result<()> {
        let bytes = self.db.flush()?;
        debug!(bytes, "Flushed preference database");
        Ok(())
    }

    /// Number of stored preferences
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// True when no preference is stored
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}

impl std::fmt::Debug for KvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvStore").field("entries", &self.len()).finish()
    }
}
