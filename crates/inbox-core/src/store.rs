//! Envelope store abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;
use serde_json::Value;

use crate::envelope::{Document, Envelope, EnvelopeId, NewEnvelope};
use crate::error::StoreError;

/// Lazy sequence of envelopes produced by a store query.
pub type EnvelopeStream<'a> = BoxStream<'a, Result<Envelope, StoreError>>;

/// Durable storage of envelopes keyed by a store-assigned id.
///
/// Every method performs exactly one unit of work against the backing medium.
/// Implementations do not inspect documents beyond field-equality filtering;
/// validating that a document matches its discriminator is the codec's job.
///
/// Concurrent `replace` calls for the same id are not ordered: the last write
/// wins.
#[async_trait]
pub trait EnvelopeStore: Send + Sync {
    /// Persists a new envelope and returns its freshly assigned id.
    async fn insert(&self, envelope: NewEnvelope) -> Result<EnvelopeId, StoreError>;

    /// Loads a single envelope.
    ///
    /// Returns `StoreError::NotFound` if no envelope has this id.
    async fn get_by_id(&self, id: EnvelopeId) -> Result<Envelope, StoreError>;

    /// Replaces the document of an existing envelope wholesale.
    ///
    /// The envelope must carry `discriminator`; otherwise
    /// `StoreError::NotFound` is returned and nothing is written.
    async fn replace(
        &self,
        id: EnvelopeId,
        discriminator: &str,
        document: Document,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Deletes an envelope and the whole payload tree it holds.
    ///
    /// Returns `StoreError::NotFound` if no envelope has this id.
    async fn delete(&self, id: EnvelopeId) -> Result<(), StoreError>;

    /// Streams every envelope carrying `discriminator`, in ascending id order.
    ///
    /// Nothing is read until the stream is polled. Calling this again re-reads
    /// the current state of the store.
    fn query_by_discriminator<'a>(&'a self, discriminator: &'a str) -> EnvelopeStream<'a>;

    /// Streams every envelope carrying `discriminator` whose document holds
    /// `value` at the object-key `path`, in ascending id order.
    fn query_by_field<'a>(
        &'a self,
        discriminator: &'a str,
        path: &'a [&'a str],
        value: &'a Value,
    ) -> EnvelopeStream<'a>;
}
