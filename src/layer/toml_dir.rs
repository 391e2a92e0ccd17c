//! TOML file layers
//!
//! Maps a dotted identifier onto a file under a root directory:
//! `config.user_settings` reads `<root>/config/user_settings.toml`.
//! Top-level keys of the file are the layer's bindings. The file is read
//! again on every resolution.

use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Component, Path, PathBuf};

use settingkit_codec::{SettingMap, SettingValue};

use super::{normalize_id, resolve_name, Layer, LayerResolver, ResolutionError};

/// Resolves layers from `.toml` files under a root directory.
#[derive(Debug, Clone)]
pub struct TomlDirResolver {
    root: PathBuf,
    package: Option<String>,
}

impl TomlDirResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            package: None,
        }
    }

    /// Base package for relative identifiers such as `.local`
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path an absolute identifier maps to.
    ///
    /// Every dotted segment must be a plain file name, so the path always
    /// stays under the root.
    pub fn path_for(&self, id: &str) -> Result<PathBuf, ResolutionError> {
        let id = normalize_id(id);
        if id.is_empty() || !id.split('.').all(is_plain_segment) {
            return Err(ResolutionError::InvalidIdentifier(id.to_string()));
        }

        let mut path = self.root.clone();
        path.extend(id.split('.'));
        path.set_extension("toml");
        Ok(path)
    }

    /// Read a layer file, returning the bindings and the file digest
    fn load_toml_file(id: &str, path: &Path) -> Result<(SettingMap, String), ResolutionError> {
        let bytes = fs::read(path).map_err(|e| ResolutionError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        let contents = String::from_utf8(bytes).map_err(|e| ResolutionError::Parse {
            id: id.to_string(),
            message: format!("Invalid UTF-8: {}", e),
        })?;

        let table: toml::Table = toml::from_str(&contents).map_err(|e| ResolutionError::Parse {
            id: id.to_string(),
            message: format!("TOML parse error: {}", e),
        })?;

        let bindings = table
            .into_iter()
            .map(|(k, v)| (k, toml_to_setting(v)))
            .collect();

        Ok((bindings, digest))
    }
}

impl LayerResolver for TomlDirResolver {
    fn resolve_layer(&mut self, id: &str) -> Result<Layer, ResolutionError> {
        let id = resolve_name(normalize_id(id), self.package.as_deref())?;
        let path = self.path_for(&id)?;

        if !path.is_file() {
            return Err(ResolutionError::NotFound {
                location: path.display().to_string(),
                id,
            });
        }

        let (bindings, digest) = Self::load_toml_file(&id, &path)?;
        tracing::debug!(layer = %id, path = %path.display(), %digest, "read layer file");

        Ok(Layer::new(id, bindings).with_file(path, digest))
    }
}

fn is_plain_segment(segment: &str) -> bool {
    if segment.is_empty() || segment.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Convert a TOML value into a setting value.
///
/// Datetimes become strings.
pub fn toml_to_setting(toml: toml::Value) -> SettingValue {
    match toml {
        toml::Value::String(s) => SettingValue::Str(s),
        toml::Value::Integer(i) => SettingValue::Int(i),
        toml::Value::Float(f) => SettingValue::Float(f),
        toml::Value::Boolean(b) => SettingValue::Bool(b),
        toml::Value::Datetime(dt) => SettingValue::Str(dt.to_string()),
        toml::Value::Array(arr) => {
            SettingValue::List(arr.into_iter().map(toml_to_setting).collect())
        }
        toml::Value::Table(table) => SettingValue::Map(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_setting(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_layer(root: &Path, rel: &str, contents: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_path_for() {
        let resolver = TomlDirResolver::new("/etc/app");
        assert_eq!(
            resolver.path_for("config.user_settings").unwrap(),
            PathBuf::from("/etc/app/config/user_settings.toml")
        );
        assert_eq!(
            resolver.path_for("config.settings.py").unwrap(),
            PathBuf::from("/etc/app/config/settings.toml")
        );
        assert!(matches!(
            resolver.path_for("config..x"),
            Err(ResolutionError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_path_for_stays_under_root() {
        let resolver = TomlDirResolver::new("/srv/app");
        for id in [
            "/etc/hosts",
            "a/../../x",
            "config./etc/passwd",
            "..\\windows",
            "c:\\x",
            "~/x",
        ] {
            let result = resolver.path_for(id);
            assert!(
                matches!(result, Err(ResolutionError::InvalidIdentifier(_)))
                    || result.as_ref().is_ok_and(|p| p.starts_with("/srv/app")),
                "{} escaped the root: {:?}",
                id,
                result
            );
        }
        assert!(matches!(
            resolver.path_for("/etc/hosts"),
            Err(ResolutionError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            resolver.path_for("a/../../x"),
            Err(ResolutionError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_resolve_outside_root_rejected() {
        let tmp = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        write_layer(outside.path(), "secret.toml", "TOKEN = \"x\"\n");

        let mut resolver = TomlDirResolver::new(tmp.path());
        let id = outside.path().join("secret").display().to_string();
        let err = resolver.resolve_layer(&id).unwrap_err();

        assert!(matches!(err, ResolutionError::InvalidIdentifier(_)));
    }

    #[test]
    fn test_resolve_file() {
        let tmp = TempDir::new().unwrap();
        let path = write_layer(
            tmp.path(),
            "config/settings.toml",
            "TIMEOUT = 10\nTAGS = [\"a\", \"b\"]\n[DB]\nhost = \"localhost\"\n",
        );

        let mut resolver = TomlDirResolver::new(tmp.path());
        let layer = resolver.resolve_layer("config.settings").unwrap();

        assert_eq!(layer.bindings["TIMEOUT"], SettingValue::Int(10));
        assert_eq!(layer.bindings["TAGS"], SettingValue::str_list(["a", "b"]));
        assert_eq!(
            layer.bindings["DB"].as_map().unwrap()["host"],
            SettingValue::from("localhost")
        );
        assert_eq!(layer.path, Some(path));
        assert_eq!(layer.digest.as_ref().map(|d| d.len()), Some(64));
    }

    #[test]
    fn test_resolve_rereads_file() {
        let tmp = TempDir::new().unwrap();
        write_layer(tmp.path(), "conf.toml", "TIMEOUT = 10\n");

        let mut resolver = TomlDirResolver::new(tmp.path());
        let first = resolver.resolve_layer("conf").unwrap();

        write_layer(tmp.path(), "conf.toml", "TIMEOUT = 20\n");
        let second = resolver.resolve_layer("conf").unwrap();

        assert_eq!(second.bindings["TIMEOUT"], SettingValue::Int(20));
        assert_ne!(first.digest, second.digest);
    }

    #[test]
    fn test_resolve_relative_to_package() {
        let tmp = TempDir::new().unwrap();
        write_layer(tmp.path(), "conf/env/local.toml", "DEBUG = true\n");

        let mut resolver = TomlDirResolver::new(tmp.path()).with_package("conf.env");
        let layer = resolver.resolve_layer(".local").unwrap();

        assert_eq!(layer.id, "conf.env.local");
        assert_eq!(layer.bindings["DEBUG"], SettingValue::Bool(true));
    }

    #[test]
    fn test_resolve_missing_file() {
        let tmp = TempDir::new().unwrap();
        let mut resolver = TomlDirResolver::new(tmp.path());

        let err = resolver.resolve_layer("config.nope").unwrap_err();
        assert!(matches!(err, ResolutionError::NotFound { .. }));
        assert!(err.to_string().contains("config.nope"));
    }

    #[test]
    fn test_resolve_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        write_layer(tmp.path(), "bad.toml", "TIMEOUT = \n");

        let mut resolver = TomlDirResolver::new(tmp.path());
        let err = resolver.resolve_layer("bad").unwrap_err();
        assert!(matches!(err, ResolutionError::Parse { ref id, .. } if id == "bad"));
    }

    #[test]
    fn test_toml_conversion() {
        let value: toml::Value = toml::from_str("ratio = 0.25\nwhen = 1979-05-27\n").unwrap();
        let setting = toml_to_setting(value);
        let map = setting.as_map().unwrap();

        assert_eq!(map["ratio"], SettingValue::Float(0.25));
        assert_eq!(map["when"], SettingValue::from("1979-05-27"));
    }
}
