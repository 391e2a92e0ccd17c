//! In-process layer registry

use std::collections::HashMap;

use settingkit_codec::SettingMap;

use super::{normalize_id, Layer, LayerResolver, ResolutionError};

/// Resolves layers from bindings registered in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    layers: HashMap<String, SettingMap>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a layer, returning the bindings it replaced
    pub fn insert(&mut self, id: impl Into<String>, bindings: SettingMap) -> Option<SettingMap> {
        self.layers.insert(id.into(), bindings)
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with_layer(mut self, id: impl Into<String>, bindings: SettingMap) -> Self {
        self.insert(id, bindings);
        self
    }

    pub fn remove(&mut self, id: &str) -> Option<SettingMap> {
        self.layers.remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.layers.contains_key(id)
    }
}

impl LayerResolver for MemoryResolver {
    fn resolve_layer(&mut self, id: &str) -> Result<Layer, ResolutionError> {
        let id = normalize_id(id);
        let bindings = self
            .layers
            .get(id)
            .cloned()
            .ok_or_else(|| ResolutionError::NotFound {
                id: id.to_string(),
                location: "in-memory registry".to_string(),
            })?;

        Ok(Layer::new(id, bindings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use settingkit_codec::SettingValue;

    fn bindings(timeout: i64) -> SettingMap {
        let mut map = SettingMap::new();
        map.insert("TIMEOUT".to_string(), SettingValue::Int(timeout));
        map
    }

    #[test]
    fn test_resolve_registered() {
        let mut resolver = MemoryResolver::new().with_layer("conf.base", bindings(10));
        let layer = resolver.resolve_layer("conf.base").unwrap();

        assert_eq!(layer.id, "conf.base");
        assert_eq!(layer.bindings["TIMEOUT"], SettingValue::Int(10));
        assert!(layer.path.is_none());
    }

    #[test]
    fn test_resolve_sees_replacement() {
        let mut resolver = MemoryResolver::new().with_layer("conf.base", bindings(10));
        resolver.resolve_layer("conf.base").unwrap();

        let previous = resolver.insert("conf.base", bindings(30));
        assert_eq!(previous, Some(bindings(10)));

        let layer = resolver.resolve_layer("conf.base.py").unwrap();
        assert_eq!(layer.bindings["TIMEOUT"], SettingValue::Int(30));
    }

    #[test]
    fn test_resolve_missing() {
        let mut resolver = MemoryResolver::new();
        let err = resolver.resolve_layer("conf.missing").unwrap_err();
        assert!(matches!(err, ResolutionError::NotFound { ref id, .. } if id == "conf.missing"));
        assert!(!resolver.contains("conf.missing"));
        assert!(resolver.remove("conf.missing").is_none());
    }
}
