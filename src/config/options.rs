//! Merge cover flags

/// Controls whether container values from a later layer replace the
/// earlier value or combine with it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Lists and tuples: replace (true) or deduplicated union (false)
    pub list_or_tuple_cover: bool,

    /// Mappings: replace (true) or key-wise update (false)
    pub dict_cover: bool,
}

impl MergeOptions {
    pub fn new(list_or_tuple_cover: bool, dict_cover: bool) -> Self {
        Self {
            list_or_tuple_cover,
            dict_cover,
        }
    }

    /// Both cover flags set
    pub fn covering() -> Self {
        Self::new(true, true)
    }
}
