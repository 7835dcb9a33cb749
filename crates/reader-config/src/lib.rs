//! Reader display configuration for iRead
//!
//! This crate owns the reading theme and typography state: page-color
//! presets and their derived palette, typefaces, text size, page transition,
//! following the system appearance and screen brightness. Settings are
//! persisted through a [`storage::PreferenceStore`] and changes are
//! broadcast as [`ConfigEvent`]s.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use reader_config::{PageColor, ReaderConfigOptions, ReaderDisplayConfig};
//! use storage::MemoryPreferenceStore;
//!
//! let store = Arc::new(MemoryPreferenceStore::new());
//! let mut config = ReaderDisplayConfig::new(store, ReaderConfigOptions::default());
//! config.initialize();
//!
//! config.set_page_color(PageColor::Sepia);
//! assert_eq!(config.palette().text.to_hex(), "4C3824");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod palette;
pub mod preload;
pub mod typography;

pub use config::{
    keys, PersistedReaderSettings, ReaderConfigOptions, ReaderDisplayConfig, ReaderSettings,
    SystemAppearance,
};
pub use error::{ConfigError, Result};
pub use events::ConfigEvent;
pub use logging::init_tracing;
pub use palette::{Color, PageColor, ReaderPalette};
pub use preload::{PreloadHandle, TypefaceLoader};
pub use typography::{display_name, PageSize, ReaderFont, ReaderLayout, TransitionStyle};
