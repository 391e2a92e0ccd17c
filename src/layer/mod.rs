//! Layer resolution
//!
//! A layer is a named source of setting bindings: a default layer or a
//! user overlay, identified by a dotted path such as `config.settings`.
//! The store asks a [`LayerResolver`] for the bindings of a layer each
//! time it loads one, so a resolver must re-read its source on every call.

mod memory;
mod name;
mod toml_dir;

pub use memory::MemoryResolver;
pub use name::{normalize_id, resolve_name, AsLayerName, Layers};
pub use toml_dir::{toml_to_setting, TomlDirResolver};

use settingkit_codec::SettingMap;
use std::io;
use std::path::PathBuf;

/// Errors raised while resolving a layer identifier
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    #[error("Layer '{id}' not found: {location}")]
    NotFound { id: String, location: String },

    #[error("Invalid layer identifier '{0}'")]
    InvalidIdentifier(String),

    #[error("Relative layer '{0}' requires a base package")]
    RelativeWithoutPackage(String),

    #[error("Relative layer '{0}' climbs beyond the top-level package")]
    BeyondTopLevel(String),

    #[error("Failed to read layer file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse layer '{id}': {message}")]
    Parse { id: String, message: String },
}

/// Bindings resolved for one layer, with provenance when file-backed
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Identifier the layer was resolved from
    pub id: String,

    /// Name to value bindings defined by the layer
    pub bindings: SettingMap,

    /// Backing file, if any
    pub path: Option<PathBuf>,

    /// SHA-256 digest of the backing file bytes
    pub digest: Option<String>,
}

impl Layer {
    pub fn new(id: impl Into<String>, bindings: SettingMap) -> Self {
        Self {
            id: id.into(),
            bindings,
            path: None,
            digest: None,
        }
    }

    /// Attach file provenance
    pub fn with_file(mut self, path: PathBuf, digest: String) -> Self {
        self.path = Some(path);
        self.digest = Some(digest);
        self
    }
}

/// Resolves a layer identifier to its bindings.
///
/// Implementations re-resolve on every call; caching is the caller's
/// concern.
pub trait LayerResolver {
    fn resolve_layer(&mut self, id: &str) -> Result<Layer, ResolutionError>;
}

impl<F> LayerResolver for F
where
    F: FnMut(&str) -> Result<Layer, ResolutionError>,
{
    fn resolve_layer(&mut self, id: &str) -> Result<Layer, ResolutionError> {
        self(id)
    }
}
