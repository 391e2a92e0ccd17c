//! Key-value string decoding
//!
//! Grammar: `K1=V1&K2=V2&K3=V31,V32`.
//!
//! - entries are split on `&` and trimmed of surrounding spaces
//! - an entry without `=` is skipped
//! - everything after the first `=` is the value, literal `=` included
//! - a value with a comma (and no further `=`) becomes a list of raw strings
//! - other values go through [`decode_scalar`]
//! - once a bypass key (`if`, `for`) is seen, values are kept raw for that
//!   entry and every later one, since those templating keywords carry
//!   parenthesized expressions that are not type tags
//! - repeated keys accumulate into one list in encounter order

use std::collections::BTreeSet;
use std::collections::btree_map::Entry;

use crate::error::DecodeError;
use crate::scalar::{decode_scalar, encode_scalar};
use crate::value::{SettingMap, SettingValue};

/// Keys that switch off tag decoding for the rest of the string.
pub const BYPASS_KEYS: &[&str] = &["if", "for"];

/// Decode a key-value string into a mapping.
pub fn decode_kv(raw: &str) -> Result<SettingMap, DecodeError> {
    let mut map = SettingMap::new();
    let mut accumulated: BTreeSet<String> = BTreeSet::new();
    let mut decode_tags = true;

    if raw.is_empty() {
        return Ok(map);
    }

    for entry in raw.split('&') {
        let entry = entry.trim_matches(' ');
        let Some((key, rest)) = entry.split_once('=') else {
            continue;
        };

        if BYPASS_KEYS.contains(&key) {
            decode_tags = false;
        }

        let value = if !rest.contains('=') && rest.contains(',') {
            SettingValue::str_list(rest.split(','))
        } else if decode_tags && !rest.is_empty() {
            decode_scalar(rest)?
        } else {
            SettingValue::Str(rest.to_string())
        };

        match map.entry(key.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            Entry::Occupied(mut slot) => {
                if accumulated.contains(key) {
                    if let SettingValue::List(items) = slot.get_mut() {
                        items.push(value);
                    }
                } else {
                    let first = std::mem::take(slot.get_mut());
                    slot.insert(SettingValue::List(vec![first, value]));
                    accumulated.insert(key.to_string());
                }
            }
        }
    }

    Ok(map)
}

/// Encode a mapping as a key-value string.
///
/// Entries whose key or value the grammar cannot carry are left out:
/// bypass keys, keys containing `&` or `=`, nested containers, strings
/// containing `&` or `,`, and lists whose items are not plain strings.
pub fn encode_kv(map: &SettingMap) -> String {
    map.iter()
        .filter_map(|(key, value)| {
            if !encodable_key(key) {
                return None;
            }
            encode_kv_value(value).map(|v| format!("{}={}", key, v))
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn encodable_key(key: &str) -> bool {
    !BYPASS_KEYS.contains(&key)
        && !key.contains(['&', '='])
        && !key.starts_with(' ')
}

fn encode_kv_value(value: &SettingValue) -> Option<String> {
    match value {
        SettingValue::Str(s) if s.contains(['&', ',']) || s.ends_with(' ') => None,
        SettingValue::List(items) | SettingValue::Tuple(items) if items.len() > 1 => {
            let parts = items
                .iter()
                .map(|item| match item {
                    SettingValue::Str(s) if !s.contains(['&', ',', '=']) => Some(s.as_str()),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()?;
            let joined = parts.join(",");
            if joined.starts_with(' ') || joined.ends_with(' ') {
                return None;
            }
            Some(joined)
        }
        other => encode_scalar(other),
    }
}
