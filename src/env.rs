//! Environment overrides
//!
//! Variables named `<prefix><NAME>` set the setting `NAME`. The value is
//! trimmed of surrounding spaces and double quotes, then read as a tagged
//! scalar. Anything that is not a bool or an int is read again, from the
//! trimmed string, as a key-value mapping:
//!
//! ```text
//! STK_ITEM_DEBUG="(BOOL)1"        -> DEBUG = true
//! STK_ITEM_FEATURE="a=1&b=x,y"    -> FEATURE = {a: "1", b: ["x", "y"]}
//! ```

use std::ffi::OsString;

use settingkit_codec::{
    decode_kv, decode_scalar, encode_kv, encode_scalar, super_strip, DecodeError, SettingValue,
};

/// Prefix used when none is given
pub const DEFAULT_ENV_PREFIX: &str = "STK_ITEM_";

/// Decode one raw environment value.
pub fn decode_env_value(raw: &str) -> Result<SettingValue, DecodeError> {
    let trimmed = super_strip(raw);

    match decode_scalar(&trimmed)? {
        value @ (SettingValue::Bool(_) | SettingValue::Int(_)) => Ok(value),
        _ => Ok(SettingValue::Map(decode_kv(&trimmed)?)),
    }
}

/// Encode a setting as an environment value that decodes back to it.
///
/// Only bools, ints and mappings can be carried. Mapping entries the
/// key-value grammar cannot express are dropped.
pub fn encode_env_value(value: &SettingValue) -> Option<String> {
    let encoded = match value {
        SettingValue::Bool(_) | SettingValue::Int(_) => encode_scalar(value)?,
        SettingValue::Map(map) => {
            let encoded = encode_kv(map);
            if encoded.starts_with('(') {
                return None;
            }
            encoded
        }
        _ => return None,
    };

    if super_strip(&encoded) != encoded {
        return None;
    }
    Some(encoded)
}

/// Variables of the current process whose name carries `prefix`.
///
/// Names that are not valid UTF-8 cannot carry the prefix and are passed
/// over. A matching variable whose value is not valid UTF-8 is skipped
/// with a warning.
pub fn process_vars(prefix: &str) -> Vec<(String, String)> {
    process_vars_from(prefix, std::env::vars_os())
}

fn process_vars_from<I>(prefix: &str, vars: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(key, value)| {
            let key = key.to_str()?;
            if !key.starts_with(prefix) {
                return None;
            }
            match value.into_string() {
                Ok(value) => Some((key.to_string(), value)),
                Err(raw) => {
                    tracing::warn!(variable = key, value = ?raw, "skipping non UTF-8 environment value");
                    None
                }
            }
        })
        .collect()
}

/// Select variables carrying `prefix`, paired with the setting name.
///
/// Returned sorted by setting name.
pub fn matching_vars<I, K, V>(prefix: &str, vars: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut matched: Vec<(String, String)> = vars
        .into_iter()
        .filter_map(|(key, value)| {
            key.as_ref()
                .strip_prefix(prefix)
                .map(|name| (name.to_string(), value.into()))
        })
        .collect();
    matched.sort_by(|a, b| a.0.cmp(&b.0));
    matched
}
