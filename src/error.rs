//! Error types for record construction and mutation.

use thiserror::Error;

/// Result type alias for record operations.
pub type Result<T> = std::result::Result<T, RecordError>;

/// Error type for record construction and mutation.
///
/// Reads on malformed buffers degrade instead of erroring (a `?` opcode, an
/// empty view, ended iteration); these variants surface only from operations
/// handed invalid arguments or an undecodable tag stream.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    /// Tag keys are exactly two bytes.
    #[error("tag key must be exactly 2 bytes, got {len}")]
    BadKey {
        /// Length of the offending key.
        len: usize,
    },

    /// A field value does not fit its wire encoding.
    #[error("invalid {field}: {reason}")]
    BadLength {
        /// The field being written.
        field: &'static str,
        /// Explanation of why it's invalid.
        reason: String,
    },

    /// Tag wire type byte not in the recognized set.
    #[error("unknown tag value type '{0}'")]
    UnknownTagType(char),

    /// CIGAR opcode character outside `MIDNSHP=X`.
    #[error("invalid CIGAR operation '{0}'")]
    InvalidCigarOp(char),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_key_message() {
        let error = RecordError::BadKey { len: 3 };
        let msg = format!("{error}");
        assert!(msg.contains("exactly 2 bytes"));
        assert!(msg.contains('3'));
    }

    #[test]
    fn test_bad_length_message() {
        let error = RecordError::BadLength {
            field: "read name",
            reason: "256 bytes, maximum is 254".to_string(),
        };
        let msg = format!("{error}");
        assert!(msg.contains("invalid read name"));
        assert!(msg.contains("maximum is 254"));
    }

    #[test]
    fn test_unknown_tag_type_message() {
        let error = RecordError::UnknownTagType('x');
        assert!(format!("{error}").contains("'x'"));
    }

    #[test]
    fn test_invalid_cigar_op_message() {
        let error = RecordError::InvalidCigarOp('Q');
        assert!(format!("{error}").contains("'Q'"));
    }
}
