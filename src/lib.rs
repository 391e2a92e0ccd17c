//! settingkit - layered settings
//!
//! Merges a default layer, user overlays and environment overrides into a
//! single settings store. Lists and tuples from later layers are unioned
//! without duplicates, mappings are updated key by key, and everything
//! else is replaced; cover flags switch containers to replacement.

pub mod config;
pub mod env;
pub mod error;
pub mod layer;
pub mod store;

pub use config::{merge, MergeOptions};
pub use env::DEFAULT_ENV_PREFIX;
pub use error::SettingsError;
pub use layer::{Layer, LayerResolver, Layers, MemoryResolver, ResolutionError, TomlDirResolver};
pub use settingkit_codec::{decode_kv, decode_scalar, DecodeError, SettingMap, SettingValue};
pub use store::{initialize, initialize_with_vars, InitOptions, LayerOrigin, LayerSource, Settings};
