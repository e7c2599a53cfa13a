//! Storage error types.

use thiserror::Error;

use crate::envelope::EnvelopeId;

/// Errors reported by an `EnvelopeStore`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No envelope exists with the given identifier (or it carries a
    /// different discriminator than the one the operation was scoped to).
    #[error("envelope not found: {0}")]
    NotFound(EnvelopeId),

    /// The backing medium could not be reached or timed out.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The backing medium refused the write.
    #[error("storage rejected the operation: {0}")]
    Rejected(String),

    /// A stored row could not be mapped back into an envelope.
    #[error("malformed envelope row: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_includes_id() {
        let err = StoreError::NotFound(EnvelopeId::new(42));
        assert_eq!(err.to_string(), "envelope not found: 42");
    }

    #[test]
    fn test_unavailable_message_includes_cause() {
        let err = StoreError::Unavailable("connection refused".into());
        assert_eq!(err.to_string(), "storage unavailable: connection refused");
    }
}
