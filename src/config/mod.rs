//! Layer merge rules
//!
//! Settings are accumulated layer by layer:
//! 1. Default layer
//! 2. User layers, in the order given
//! 3. Environment overrides (written raw, never merged)
//!
//! Each name from a new layer is merged against the value already held
//! for that name. See [`merge`] for the rules.

mod merge;
mod options;

pub use merge::{merge, merge_bindings, RESERVED_NAMES};
pub use options::MergeOptions;
