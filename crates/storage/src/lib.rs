//! Storage layer for iRead
//!
//! This crate provides the key-value store that reader preferences live in,
//! and the [`PreferenceStore`] seam the configuration core persists through.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod kv;
pub mod preferences;

pub use kv::{KvConfig, KvError, KvStore};
pub use preferences::{MemoryPreferenceStore, PreferenceStore, PreferenceStoreExt};
