//! Layer provenance
//!
//! Every load appends a [`LayerSource`] to the store, so the origin of
//! any setting can be traced back to the layer that last wrote it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::layer::Layer;

/// Kind of load that produced a source
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LayerOrigin {
    Default,
    User,
    Environment,
}

/// A contributing layer with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSource {
    pub origin: LayerOrigin,

    /// Layer identifier, or the variable prefix for environment loads
    pub id: String,

    /// Backing file (None for in-memory layers and the environment)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of the backing file bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,

    /// When the layer was applied
    pub loaded_at: DateTime<Utc>,

    /// Names written by this layer
    pub names: Vec<String>,
}

impl LayerSource {
    pub fn from_layer(origin: LayerOrigin, layer: &Layer, names: Vec<String>) -> Self {
        Self {
            origin,
            id: layer.id.clone(),
            path: layer.path.as_ref().map(|p| p.to_string_lossy().to_string()),
            digest: layer.digest.clone(),
            loaded_at: Utc::now(),
            names,
        }
    }

    pub fn environment(prefix: &str, names: Vec<String>) -> Self {
        Self {
            origin: LayerOrigin::Environment,
            id: prefix.to_string(),
            path: None,
            digest: None,
            loaded_at: Utc::now(),
            names,
        }
    }

    pub fn wrote(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}
