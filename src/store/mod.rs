//! Settings store
//!
//! Holds the accumulated settings and sequences layer loads through the
//! merge rules:
//! 1. [`Settings::global_settings`] loads the default layer
//! 2. [`Settings::load_settings`] merges user layers on top
//! 3. [`Settings::load_enviroment`] writes environment overrides raw
//!
//! Reading a name that was never set yields [`SettingValue::Null`].

mod init;
mod source;

pub use init::{initialize, initialize_with_vars, InitOptions};
pub use source::{LayerOrigin, LayerSource};

use std::fmt;

use settingkit_codec::{SettingMap, SettingValue};

use crate::config::{merge_bindings, MergeOptions};
use crate::env::{decode_env_value, matching_vars, process_vars};
use crate::error::SettingsError;
use crate::layer::{normalize_id, AsLayerName, LayerResolver, Layers};

/// Accumulated settings backed by a layer resolver.
pub struct Settings {
    values: SettingMap,
    resolver: Box<dyn LayerResolver>,
    global_settings: Option<String>,
    user_settings: Vec<String>,
    options: MergeOptions,
    sources: Vec<LayerSource>,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("values", &self.values)
            .field("global_settings", &self.global_settings)
            .field("user_settings", &self.user_settings)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Settings {
    /// Empty store
    pub fn new(resolver: impl LayerResolver + 'static) -> Self {
        Self {
            values: SettingMap::new(),
            resolver: Box::new(resolver),
            global_settings: None,
            user_settings: Vec::new(),
            options: MergeOptions::default(),
            sources: Vec::new(),
        }
    }

    /// Store with the default layer already loaded
    pub fn with_defaults(
        resolver: impl LayerResolver + 'static,
        defaults: impl AsLayerName,
    ) -> Result<Self, SettingsError> {
        let mut settings = Self::new(resolver);
        settings.global_settings(defaults)?;
        Ok(settings)
    }

    /// Load the default layer.
    ///
    /// An empty identifier is ignored.
    pub fn global_settings(&mut self, defaults: impl AsLayerName) -> Result<(), SettingsError> {
        let id = normalize_id(defaults.layer_name()).to_string();
        if id.is_empty() {
            return Ok(());
        }

        self.apply_layer(&id, LayerOrigin::Default)?;
        self.global_settings = Some(id);
        Ok(())
    }

    /// Load user layers in order, merging each onto the current values.
    ///
    /// The cover flags apply to every name merged by this call and stay in
    /// effect for later [`reload`](Self::reload) calls.
    pub fn load_settings(
        &mut self,
        layers: impl Into<Layers>,
        list_or_tuple_cover: bool,
        dict_cover: bool,
    ) -> Result<(), SettingsError> {
        let layers = layers.into();
        self.options = MergeOptions::new(list_or_tuple_cover, dict_cover);
        self.user_settings = layers.ids().into_iter().map(str::to_string).collect();

        if layers.is_empty() {
            tracing::debug!("no user layers given");
            return Ok(());
        }

        for id in layers.ids() {
            self.apply_layer(id, LayerOrigin::User)?;
        }

        Ok(())
    }

    /// Apply environment overrides from the process environment.
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    /// Returns the names written.
    pub fn load_enviroment(&mut self, prefix: &str) -> Result<Vec<String>, SettingsError> {
        self.load_enviroment_from(prefix, process_vars(prefix))
    }

    /// Apply environment overrides from explicit `(variable, value)` pairs.
    ///
    /// Values are written without merging. Nothing is written if any
    /// matching value fails to decode.
    pub fn load_enviroment_from<I, K, V>(
        &mut self,
        prefix: &str,
        vars: I,
    ) -> Result<Vec<String>, SettingsError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut decoded = Vec::new();
        for (name, raw) in matching_vars(prefix, vars) {
            let value = decode_env_value(&raw).map_err(|e| SettingsError::Environment {
                name: name.clone(),
                source: e,
            })?;

            if value.as_map().is_some_and(|m| m.is_empty()) {
                tracing::warn!(name = %name, "environment value decoded to an empty mapping");
            }
            tracing::debug!(name = %name, kind = value.kind(), "environment override");
            decoded.push((name, value));
        }

        let names: Vec<String> = decoded.iter().map(|(name, _)| name.clone()).collect();
        self.values.extend(decoded);

        tracing::info!(prefix, count = names.len(), "loaded environment overrides");
        self.sources.push(LayerSource::environment(prefix, names.clone()));
        Ok(names)
    }

    /// Resolve a layer again and merge it with the current cover flags.
    pub fn reload(&mut self, layer: impl AsLayerName) -> Result<(), SettingsError> {
        let id = normalize_id(layer.layer_name()).to_string();
        let origin = if self.global_settings.as_deref() == Some(id.as_str()) {
            LayerOrigin::Default
        } else {
            LayerOrigin::User
        };
        self.apply_layer(&id, origin)
    }

    fn apply_layer(&mut self, id: &str, origin: LayerOrigin) -> Result<(), SettingsError> {
        let mut layer = self.resolver.resolve_layer(id)?;
        let bindings = std::mem::take(&mut layer.bindings);
        let names = merge_bindings(&mut self.values, bindings, &self.options);

        tracing::info!(layer = %layer.id, ?origin, count = names.len(), "loaded settings layer");
        self.sources.push(LayerSource::from_layer(origin, &layer, names));
        Ok(())
    }

    /// Value for `name`, recording a miss as an explicit null entry.
    pub fn get_or_default(&mut self, name: &str) -> &SettingValue {
        self.values.entry(name.to_string()).or_default()
    }

    /// Value for `name` without recording a miss
    pub fn peek(&self, name: &str) -> Option<&SettingValue> {
        self.values.get(name)
    }

    /// Set a value, returning the previous one
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<SettingValue>) -> Option<SettingValue> {
        self.values.insert(name.into(), value.into())
    }

    /// Remove a value, returning it if it was present
    pub fn delete(&mut self, name: &str) -> Option<SettingValue> {
        self.values.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Names currently held, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn snapshot(&self) -> &SettingMap {
        &self.values
    }

    pub fn into_map(self) -> SettingMap {
        self.values
    }

    /// Cover flags recorded by the last [`load_settings`](Self::load_settings)
    pub fn options(&self) -> MergeOptions {
        self.options
    }

    /// Identifier of the loaded default layer
    pub fn global_settings_id(&self) -> Option<&str> {
        self.global_settings.as_deref()
    }

    /// Identifiers given to the last [`load_settings`](Self::load_settings)
    pub fn user_settings_ids(&self) -> &[String] {
        &self.user_settings
    }

    /// Applied layers in load order
    pub fn sources(&self) -> &[LayerSource] {
        &self.sources
    }

    /// The most recent layer that wrote `name`
    pub fn origin_of(&self, name: &str) -> Option<&LayerSource> {
        self.sources.iter().rev().find(|source| source.wrote(name))
    }

    /// Serialize the settings to pretty JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(&self.values)?)
    }
}
