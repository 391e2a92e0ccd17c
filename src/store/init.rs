//! One-call store setup
//!
//! Load order: default layer, user layers, environment overrides.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::Settings;
use crate::env::{process_vars, DEFAULT_ENV_PREFIX};
use crate::error::SettingsError;
use crate::layer::{LayerResolver, Layers};

/// Inputs to [`initialize`]
///
/// Can be read from a TOML file; missing keys take the [`Default`] values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InitOptions {
    /// Default layer identifier
    pub defaults: Option<String>,

    /// User layer identifiers, in load order
    pub user: Vec<String>,

    /// Environment variable prefix (None skips the environment)
    pub env_prefix: Option<String>,

    pub list_or_tuple_cover: bool,

    pub dict_cover: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            defaults: None,
            user: Vec::new(),
            env_prefix: Some(DEFAULT_ENV_PREFIX.to_string()),
            list_or_tuple_cover: false,
            dict_cover: false,
        }
    }
}

impl InitOptions {
    /// Load options from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path).map_err(|e| SettingsError::Options {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&contents).map_err(|e| SettingsError::Options {
            path: path.to_path_buf(),
            message: format!("TOML parse error: {}", e),
        })
    }

    pub fn with_defaults(mut self, id: impl Into<String>) -> Self {
        self.defaults = Some(id.into());
        self
    }

    pub fn with_user(mut self, id: impl Into<String>) -> Self {
        self.user.push(id.into());
        self
    }

    pub fn with_env_prefix(mut self, prefix: Option<String>) -> Self {
        self.env_prefix = prefix;
        self
    }

    pub fn with_cover(mut self, list_or_tuple_cover: bool, dict_cover: bool) -> Self {
        self.list_or_tuple_cover = list_or_tuple_cover;
        self.dict_cover = dict_cover;
        self
    }
}

/// Build a store from the process environment.
pub fn initialize(
    resolver: impl LayerResolver + 'static,
    options: InitOptions,
) -> Result<Settings, SettingsError> {
    let prefix = options.env_prefix.clone().unwrap_or_default();
    initialize_with_vars(resolver, options, process_vars(&prefix))
}

/// Build a store, taking environment overrides from `vars`.
pub fn initialize_with_vars<I, K, V>(
    resolver: impl LayerResolver + 'static,
    options: InitOptions,
    vars: I,
) -> Result<Settings, SettingsError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut settings = Settings::new(resolver);

    if let Some(defaults) = &options.defaults {
        settings.global_settings(defaults)?;
    }

    settings.load_settings(
        Layers::Many(options.user),
        options.list_or_tuple_cover,
        options.dict_cover,
    )?;

    if let Some(prefix) = &options.env_prefix {
        settings.load_enviroment_from(prefix, vars)?;
    }

    tracing::info!(names = settings.snapshot().len(), "settings initialized");
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::MemoryResolver;
    use settingkit_codec::{SettingMap, SettingValue};

    fn resolver() -> MemoryResolver {
        let mut defaults = SettingMap::new();
        defaults.insert("TIMEOUT".to_string(), SettingValue::Int(10));
        defaults.insert("DEBUG".to_string(), SettingValue::Bool(false));

        let mut user = SettingMap::new();
        user.insert("TIMEOUT".to_string(), SettingValue::Int(20));

        MemoryResolver::new()
            .with_layer("conf.settings", defaults)
            .with_layer("conf.user", user)
    }

    #[test]
    fn test_default_options() {
        let options = InitOptions::default();
        assert_eq!(options.env_prefix.as_deref(), Some("STK_ITEM_"));
        assert!(options.defaults.is_none());
        assert!(!options.list_or_tuple_cover && !options.dict_cover);
    }

    #[test]
    fn test_options_from_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("settingkit.toml");
        fs::write(
            &path,
            "defaults = \"conf.settings\"\nuser = [\"conf.user\"]\ndict_cover = true\n",
        )
        .unwrap();

        let options = InitOptions::from_file(&path).unwrap();

        assert_eq!(options.defaults.as_deref(), Some("conf.settings"));
        assert_eq!(options.user, vec!["conf.user"]);
        assert!(options.dict_cover);
        assert!(!options.list_or_tuple_cover);
        assert_eq!(options.env_prefix.as_deref(), Some("STK_ITEM_"));
    }

    #[test]
    fn test_options_from_bad_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("settingkit.toml");
        fs::write(&path, "user = 3\n").unwrap();

        assert!(matches!(
            InitOptions::from_file(&path),
            Err(SettingsError::Options { .. })
        ));
        assert!(InitOptions::from_file(&tmp.path().join("absent.toml")).is_err());
    }

    #[test]
    fn test_initialize_order() {
        let options = InitOptions::default()
            .with_defaults("conf.settings")
            .with_user("conf.user");
        let vars = vec![("STK_ITEM_DEBUG", "(B)1"), ("STK_ITEM_TIMEOUT", "(I)30")];

        let settings = initialize_with_vars(resolver(), options, vars).unwrap();

        assert_eq!(settings.peek("TIMEOUT"), Some(&SettingValue::Int(30)));
        assert_eq!(settings.peek("DEBUG"), Some(&SettingValue::Bool(true)));
        assert_eq!(settings.sources().len(), 3);
    }

    #[test]
    fn test_initialize_without_environment() {
        let options = InitOptions::default()
            .with_defaults("conf.settings")
            .with_user("conf.user")
            .with_env_prefix(None);
        let vars = vec![("STK_ITEM_TIMEOUT", "(I)30")];

        let settings = initialize_with_vars(resolver(), options, vars).unwrap();

        assert_eq!(settings.peek("TIMEOUT"), Some(&SettingValue::Int(20)));
        assert_eq!(settings.sources().len(), 2);
    }

    #[test]
    fn test_initialize_missing_defaults_fails() {
        let options = InitOptions::default().with_defaults("conf.missing");
        let result = initialize_with_vars(resolver(), options, Vec::<(String, String)>::new());
        assert!(result.is_err());
    }
}
