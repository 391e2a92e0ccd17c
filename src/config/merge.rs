//! Merge logic
//!
//! Merges a newly loaded value onto the value already held for a name:
//! - List + List: deduplicated union (or deduplicated incoming when covering)
//! - Tuple + Tuple: same, result stays a tuple
//! - Map + Map: key-wise update (or incoming alone when covering)
//! - Anything else: incoming replaces existing

use settingkit_codec::{SettingMap, SettingValue};

use super::options::MergeOptions;

/// Names a layer may define that are never copied into the store.
pub const RESERVED_NAMES: &[&str] = &[
    "__builtins__",
    "__doc__",
    "__file__",
    "__name__",
    "__package__",
];

/// Merge two setting values.
///
/// Merge semantics:
/// - Lists/tuples: union without duplicates, existing items first
/// - Maps: shallow update, incoming keys win
/// - Mismatched kinds, scalars, null: incoming wins
pub fn merge(existing: SettingValue, incoming: SettingValue, options: &MergeOptions) -> SettingValue {
    match (existing, incoming) {
        (SettingValue::List(base), SettingValue::List(overlay)) => {
            SettingValue::List(dedup_union(base, overlay, options.list_or_tuple_cover))
        }

        (SettingValue::Tuple(base), SettingValue::Tuple(overlay)) => {
            SettingValue::Tuple(dedup_union(base, overlay, options.list_or_tuple_cover))
        }

        (SettingValue::Map(_), SettingValue::Map(overlay)) if options.dict_cover => {
            SettingValue::Map(overlay)
        }

        (SettingValue::Map(mut base), SettingValue::Map(overlay)) => {
            base.extend(overlay);
            SettingValue::Map(base)
        }

        (_, overlay) => overlay,
    }
}

/// Merge every binding of a layer into `target`, skipping reserved names.
///
/// Returns the names written, in layer order.
pub fn merge_bindings(
    target: &mut SettingMap,
    layer: SettingMap,
    options: &MergeOptions,
) -> Vec<String> {
    let mut written = Vec::with_capacity(layer.len());

    for (name, incoming) in layer {
        if RESERVED_NAMES.contains(&name.as_str()) {
            continue;
        }

        let existing = target.remove(&name).unwrap_or_default();
        let (from, to) = (existing.kind(), incoming.kind());
        let merged = merge(existing, incoming, options);
        tracing::debug!(name = %name, from, to, result = merged.kind(), "merged setting");

        target.insert(name.clone(), merged);
        written.push(name);
    }

    written
}

fn dedup_union(base: Vec<SettingValue>, overlay: Vec<SettingValue>, cover: bool) -> Vec<SettingValue> {
    let base = if cover { Vec::new() } else { base };
    let mut out: Vec<SettingValue> = Vec::with_capacity(base.len() + overlay.len());

    for item in base.into_iter().chain(overlay) {
        if !out.contains(&item) {
            out.push(item);
        }
    }

    out
}
