//! Tagged scalar decoding
//!
//! A tagged scalar is `(TAG)value`. Recognized tags:
//! - `BOOL` / `B`: true iff the value is exactly `1`
//! - `INT` / `I`: base-10 integer
//! - `STR` / `S`: the raw value
//!
//! Any other tag yields the raw value. Input without a leading `(` is
//! returned unchanged.

use crate::error::DecodeError;
use crate::value::SettingValue;

const BOOL_TAGS: &[&str] = &["BOOL", "B"];
const INT_TAGS: &[&str] = &["INT", "I"];

/// Decode a single tagged scalar.
///
/// Empty input decodes to [`SettingValue::Null`].
pub fn decode_scalar(raw: &str) -> Result<SettingValue, DecodeError> {
    if raw.is_empty() {
        return Ok(SettingValue::Null);
    }

    let Some(tagged) = raw.strip_prefix('(') else {
        return Ok(SettingValue::Str(raw.to_string()));
    };

    let (tag, body) = tagged
        .split_once(')')
        .ok_or_else(|| DecodeError::UnterminatedTag(raw.to_string()))?;

    if BOOL_TAGS.contains(&tag) {
        return Ok(SettingValue::Bool(body == "1"));
    }

    if INT_TAGS.contains(&tag) {
        let int = body.trim().parse::<i64>().map_err(|e| DecodeError::InvalidInt {
            raw: raw.to_string(),
            value: body.to_string(),
            source: e,
        })?;
        return Ok(SettingValue::Int(int));
    }

    Ok(SettingValue::Str(body.to_string()))
}

/// Encode a scalar so that [`decode_scalar`] reads it back unchanged.
///
/// Returns `None` for values that are not bool, int or string.
pub fn encode_scalar(value: &SettingValue) -> Option<String> {
    match value {
        SettingValue::Bool(b) => Some(format!("(B){}", if *b { "1" } else { "0" })),
        SettingValue::Int(i) => Some(format!("(I){}", i)),
        // A leading paren would otherwise be read as a tag
        SettingValue::Str(s) if s.starts_with('(') => Some(format!("(S){}", s)),
        SettingValue::Str(s) => Some(s.clone()),
        _ => None,
    }
}

/// Strip surrounding spaces and double quotes until nothing changes.
pub fn super_strip(raw: &str) -> String {
    let mut value = raw;
    loop {
        let stripped = value.trim_matches(' ').trim_matches('"');
        if stripped == value {
            return stripped.to_string();
        }
        value = stripped;
    }
}
