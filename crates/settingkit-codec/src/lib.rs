//! String codecs for settingkit environment overrides.
//!
//! Two grammars are understood:
//! - tagged scalars, `(TAG)value`, where the tag selects bool, int or string
//! - key-value strings, `K1=V1&K2=V2&K3=V31,V32`, decoded into a mapping
//!
//! Both are pure functions over `&str`. The encoders produce strings the
//! decoders read back to the same value, for the shapes the grammar can
//! express.

mod error;
mod kv;
mod scalar;
mod value;

pub use error::DecodeError;
pub use kv::{decode_kv, encode_kv, BYPASS_KEYS};
pub use scalar::{decode_scalar, encode_scalar, super_strip};
pub use value::{SettingMap, SettingValue};
