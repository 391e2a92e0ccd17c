//! Setting value model
//!
//! A closed set of shapes a setting can take. Merge rules dispatch on the
//! pair of shapes, so every container kind is its own variant.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Mapping from setting name to value.
pub type SettingMap = BTreeMap<String, SettingValue>;

/// A single setting value.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum SettingValue {
    /// Absent value. Unset names read as this.
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Mutable ordered sequence
    List(Vec<SettingValue>),
    /// Immutable ordered sequence
    Tuple(Vec<SettingValue>),
    Map(SettingMap),
}

impl SettingValue {
    /// Short name of the variant, used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            SettingValue::Null => "null",
            SettingValue::Bool(_) => "bool",
            SettingValue::Int(_) => "int",
            SettingValue::Float(_) => "float",
            SettingValue::Str(_) => "str",
            SettingValue::List(_) => "list",
            SettingValue::Tuple(_) => "tuple",
            SettingValue::Map(_) => "map",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SettingValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            SettingValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Items of a list or tuple
    pub fn as_list(&self) -> Option<&[SettingValue]> {
        match self {
            SettingValue::List(items) | SettingValue::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&SettingMap> {
        match self {
            SettingValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Build a list of string values
    pub fn str_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SettingValue::List(items.into_iter().map(|s| SettingValue::Str(s.into())).collect())
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => Err(fmt::Error),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(b: bool) -> Self {
        SettingValue::Bool(b)
    }
}

impl From<i64> for SettingValue {
    fn from(i: i64) -> Self {
        SettingValue::Int(i)
    }
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        SettingValue::Str(s.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(s: String) -> Self {
        SettingValue::Str(s)
    }
}

impl From<SettingMap> for SettingValue {
    fn from(map: SettingMap) -> Self {
        SettingValue::Map(map)
    }
}

impl From<serde_json::Value> for SettingValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => SettingValue::Null,
            serde_json::Value::Bool(b) => SettingValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => SettingValue::Int(i),
                None => n.as_f64().map(SettingValue::Float).unwrap_or(SettingValue::Null),
            },
            serde_json::Value::String(s) => SettingValue::Str(s),
            serde_json::Value::Array(arr) => {
                SettingValue::List(arr.into_iter().map(SettingValue::from).collect())
            }
            serde_json::Value::Object(map) => SettingValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, SettingValue::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json() {
        let value = SettingValue::from(json!({
            "debug": true,
            "port": 8080,
            "ratio": 0.5,
            "hosts": ["a", "b"],
            "empty": null
        }));

        let map = value.as_map().unwrap();
        assert_eq!(map["debug"], SettingValue::Bool(true));
        assert_eq!(map["port"], SettingValue::Int(8080));
        assert_eq!(map["ratio"], SettingValue::Float(0.5));
        assert_eq!(map["hosts"], SettingValue::str_list(["a", "b"]));
        assert!(map["empty"].is_null());
    }

    #[test]
    fn test_serialize_untagged() {
        let mut map = SettingMap::new();
        map.insert("tags".to_string(), SettingValue::Tuple(vec!["x".into()]));
        map.insert("on".to_string(), SettingValue::Bool(false));
        let json = serde_json::to_value(SettingValue::Map(map)).unwrap();

        assert_eq!(json, json!({"on": false, "tags": ["x"]}));
    }

    #[test]
    fn test_display_is_json() {
        assert_eq!(SettingValue::from("hi").to_string(), "\"hi\"");
        assert_eq!(SettingValue::Null.to_string(), "null");
    }

    #[test]
    fn test_as_list_covers_tuple() {
        let tuple = SettingValue::Tuple(vec![SettingValue::Int(1)]);
        assert_eq!(tuple.as_list().map(|items| items.len()), Some(1));
        assert!(SettingValue::Int(1).as_list().is_none());
    }
}
