//! Decode errors

use std::num::ParseIntError;

/// Errors raised while decoding a tagged scalar or key-value string.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("Unterminated type tag in '{0}': missing ')'")]
    UnterminatedTag(String),

    #[error("Invalid integer '{value}' in '{raw}': {source}")]
    InvalidInt {
        raw: String,
        value: String,
        #[source]
        source: ParseIntError,
    },
}
