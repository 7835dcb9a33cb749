//! Error types for the reader configuration

use storage::KvError;
use thiserror::Error;

use crate::typography::ReaderFont;

/// Reader configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An identifier or value outside the supported set
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Writing a setting to the preference store failed
    #[error("Failed to persist {key}: {source}")]
    PersistenceWriteFailed {
        /// Preference key that was being written
        key: String,
        /// Underlying store error
        #[source]
        source: KvError,
    },

    /// A typeface preload did not complete
    #[error("Failed to preload typeface {font}: {reason}")]
    PreloadFailed {
        /// Typeface that was being loaded
        font: ReaderFont,
        /// Loader-supplied reason
        reason: String,
    },
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
