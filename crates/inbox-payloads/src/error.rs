//! Inbox error types.

use inbox_core::envelope::EnvelopeId;
use inbox_core::error::StoreError;
use thiserror::Error;

use crate::codec::{DecodingError, EncodingError};
use crate::domain::discriminator::Discriminator;

/// Top-level error returned by the inbox handlers.
#[derive(Debug, Error)]
pub enum InboxError {
    /// The backing medium failed; surfaced verbatim, never retried.
    #[error(transparent)]
    Storage(StoreError),

    /// The payload was rejected before any I/O took place.
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// A stored document did not match its discriminator's schema.
    #[error(transparent)]
    Decoding(#[from] DecodingError),

    /// No envelope exists with the given id.
    #[error("envelope not found: {0}")]
    NotFound(EnvelopeId),

    /// No envelope of this discriminator satisfied the lookup.
    #[error("no {discriminator} envelope matched")]
    NoMatch {
        /// The discriminator that was searched.
        discriminator: Discriminator,
    },

    /// More than one envelope satisfied a lookup that expects a single match.
    #[error("expected a single {discriminator} envelope, found {count} matches")]
    MultipleMatches {
        /// The discriminator that was searched.
        discriminator: Discriminator,
        /// How many envelopes matched.
        count: usize,
    },
}

impl From<StoreError> for InboxError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            other => Self::Storage(other),
        }
    }
}
