//! Settings errors

use settingkit_codec::DecodeError;
use std::path::PathBuf;

use crate::layer::ResolutionError;

/// Errors raised by the settings store
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error("Failed to decode environment variable for '{name}': {source}")]
    Environment {
        name: String,
        #[source]
        source: DecodeError,
    },

    #[error("Failed to load options file {}: {message}", .path.display())]
    Options { path: PathBuf, message: String },

    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
