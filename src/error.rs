//! Error types for editor operations.
//!
//! Correct use of the core produces no errors: policy anomalies (disallowed
//! tags, unknown child ids, unparseable number buffers) degrade silently to
//! the most permissive or most recently valid state. The error type covers
//! structural addressing failures and strict restriction parsing only.

use crate::Path;
use thiserror::Error;

/// Result type alias for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// Errors that can occur during editor operations.
#[derive(Debug, Error)]
pub enum EditorError {
    /// A path segment addressed a position past the end of a container list.
    #[error("position {index} out of bounds (len: {len}) at path {path}")]
    IndexOutOfBounds {
        /// The full path being resolved.
        path: Path,
        /// The position that was accessed.
        index: usize,
        /// The actual length of the addressed list.
        len: usize,
    },

    /// A restriction dictionary failed strict validation.
    ///
    /// Only `Restriction::try_from_json` reports this; the lenient
    /// `Restriction::from_json` fails open to the unrestricted default.
    #[error("invalid restriction dictionary: {reason}")]
    InvalidRestriction {
        /// Description of what was malformed.
        reason: String,
    },
}

impl EditorError {
    /// Create an index out of bounds error.
    #[inline]
    pub fn index_out_of_bounds(path: Path, index: usize, len: usize) -> Self {
        EditorError::IndexOutOfBounds { path, index, len }
    }

    /// Create an invalid restriction error.
    #[inline]
    pub fn invalid_restriction(reason: impl Into<String>) -> Self {
        EditorError::InvalidRestriction {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;

    #[test]
    fn test_error_display() {
        let err = EditorError::index_out_of_bounds(path!(0usize, 3usize), 3, 2);
        let text = err.to_string();
        assert!(text.contains("out of bounds"));
        assert!(text.contains("$[0][3]"));
    }
}
