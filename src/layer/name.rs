//! Layer identifiers
//!
//! Identifiers are dotted paths. A trailing `.py` or `.toml` suffix is
//! accepted and dropped. Identifiers starting with `.` are relative to a
//! base package: one dot is the package itself, each further dot climbs
//! one level.

use super::{Layer, ResolutionError};

const STRIPPED_SUFFIXES: &[&str] = &[".py", ".toml"];

/// Anything that names a layer: plain identifiers and loaded layers.
pub trait AsLayerName {
    fn layer_name(&self) -> &str;
}

impl AsLayerName for str {
    fn layer_name(&self) -> &str {
        self
    }
}

impl AsLayerName for String {
    fn layer_name(&self) -> &str {
        self
    }
}

impl AsLayerName for Layer {
    fn layer_name(&self) -> &str {
        &self.id
    }
}

impl<T: AsLayerName + ?Sized> AsLayerName for &T {
    fn layer_name(&self) -> &str {
        (**self).layer_name()
    }
}

/// Drop a trailing file suffix from a layer identifier.
pub fn normalize_id(id: &str) -> &str {
    STRIPPED_SUFFIXES
        .iter()
        .find_map(|suffix| id.strip_suffix(suffix))
        .unwrap_or(id)
}

/// Resolve a relative identifier against a base package.
///
/// Absolute identifiers are returned unchanged.
pub fn resolve_name(name: &str, package: Option<&str>) -> Result<String, ResolutionError> {
    if !name.starts_with('.') {
        return Ok(name.to_string());
    }

    let package = package
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ResolutionError::RelativeWithoutPackage(name.to_string()))?;

    let level = name.chars().take_while(|c| *c == '.').count();
    let mut base = package;
    for _ in 1..level {
        let dot = base
            .rfind('.')
            .ok_or_else(|| ResolutionError::BeyondTopLevel(name.to_string()))?;
        base = &base[..dot];
    }

    Ok(format!("{}.{}", base, &name[level..]))
}

/// One or more layer identifiers, in load order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layers {
    One(String),
    Many(Vec<String>),
}

impl Layers {
    /// Collect the names of loaded layers or other named values
    pub fn named<I, N>(items: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: AsLayerName,
    {
        Layers::Many(
            items
                .into_iter()
                .map(|item| item.layer_name().to_string())
                .collect(),
        )
    }

    /// Normalized identifiers in load order
    pub fn ids(&self) -> Vec<&str> {
        match self {
            Layers::One(id) => vec![normalize_id(id)],
            Layers::Many(ids) => ids.iter().map(|id| normalize_id(id)).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Layers::Many(ids) if ids.is_empty())
    }
}

impl Default for Layers {
    fn default() -> Self {
        Layers::Many(Vec::new())
    }
}

impl From<&str> for Layers {
    fn from(id: &str) -> Self {
        Layers::One(id.to_string())
    }
}

impl From<String> for Layers {
    fn from(id: String) -> Self {
        Layers::One(id)
    }
}

impl From<&String> for Layers {
    fn from(id: &String) -> Self {
        Layers::One(id.clone())
    }
}

impl<S: Into<String>> From<Vec<S>> for Layers {
    fn from(ids: Vec<S>) -> Self {
        Layers::Many(ids.into_iter().map(Into::into).collect())
    }
}

impl From<&[&str]> for Layers {
    fn from(ids: &[&str]) -> Self {
        Layers::Many(ids.iter().map(|id| id.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Layers {
    fn from(ids: [&str; N]) -> Self {
        Layers::Many(ids.iter().map(|id| id.to_string()).collect())
    }
}

impl From<&Layer> for Layers {
    fn from(layer: &Layer) -> Self {
        Layers::One(layer.layer_name().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use settingkit_codec::SettingMap;

    #[test]
    fn test_normalize_id() {
        assert_eq!(normalize_id("config.user_settings.py"), "config.user_settings");
        assert_eq!(normalize_id("config.user.toml"), "config.user");
        assert_eq!(normalize_id("config.python"), "config.python");
        assert_eq!(normalize_id("config.settings"), "config.settings");
    }

    #[test]
    fn test_resolve_absolute() {
        assert_eq!(resolve_name("conf.base", None).unwrap(), "conf.base");
    }

    #[test]
    fn test_resolve_relative() {
        assert_eq!(resolve_name(".local", Some("conf.env")).unwrap(), "conf.env.local");
        assert_eq!(resolve_name("..shared", Some("conf.env")).unwrap(), "conf.shared");
    }

    #[test]
    fn test_resolve_relative_errors() {
        assert!(matches!(
            resolve_name(".local", None),
            Err(ResolutionError::RelativeWithoutPackage(_))
        ));
        assert!(matches!(
            resolve_name("...x", Some("conf.env")),
            Err(ResolutionError::BeyondTopLevel(_))
        ));
    }

    #[test]
    fn test_layers_from() {
        assert_eq!(Layers::from("a.b.py").ids(), vec!["a.b"]);
        assert_eq!(Layers::from(vec!["a", "b.py"]).ids(), vec!["a", "b"]);
        assert_eq!(Layers::from(["x"]).ids(), vec!["x"]);
        assert!(Layers::default().is_empty());
        assert!(!Layers::from("a").is_empty());
    }

    #[test]
    fn test_layers_named() {
        let loaded = Layer::new("conf.user.py", SettingMap::new());
        let layers = Layers::named([&loaded]);
        assert_eq!(layers.ids(), vec!["conf.user"]);
    }
}
