//! Test stores — `EnvelopeStore` implementations for tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use futures::stream;
use inbox_core::envelope::{Document, Envelope, EnvelopeId, NewEnvelope};
use inbox_core::error::StoreError;
use inbox_core::store::{EnvelopeStore, EnvelopeStream};
use serde_json::Value;

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    rows: BTreeMap<EnvelopeId, Envelope>,
    operations: usize,
}

/// A fully working envelope store held in memory. Ids start at 1 and are
/// never reused. Every trait call counts as one operation, which lets tests
/// assert that a handler never reached the store.
#[derive(Debug, Default)]
pub struct InMemoryEnvelopeStore {
    state: Mutex<State>,
}

impl InMemoryEnvelopeStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many store operations have been issued so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn operation_count(&self) -> usize {
        self.state.lock().unwrap().operations
    }

    /// Returns how many envelopes are currently stored.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn len(&self) -> usize {
        self.state.lock().unwrap().rows.len()
    }

    /// Returns `true` if the store holds no envelopes.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot(&self, filter: impl Fn(&Envelope) -> bool) -> Vec<Envelope> {
        let mut state = self.state.lock().unwrap();
        state.operations += 1;
        state
            .rows
            .values()
            .filter(|envelope| filter(envelope))
            .cloned()
            .collect()
    }

    fn lazy_scan<'a>(
        &'a self,
        filter: impl Fn(&Envelope) -> bool + Send + 'a,
    ) -> EnvelopeStream<'a> {
        stream::once(async move { self.snapshot(filter) })
            .flat_map(|rows| stream::iter(rows.into_iter().map(Ok)))
            .boxed()
    }
}

#[async_trait]
impl EnvelopeStore for InMemoryEnvelopeStore {
    async fn insert(&self, envelope: NewEnvelope) -> Result<EnvelopeId, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.operations += 1;
        state.next_id += 1;
        let id = EnvelopeId::new(state.next_id);
        state.rows.insert(
            id,
            Envelope {
                id,
                discriminator: envelope.discriminator,
                document: envelope.document,
                created_at: envelope.created_at,
                updated_at: envelope.created_at,
            },
        );
        Ok(id)
    }

    async fn get_by_id(&self, id: EnvelopeId) -> Result<Envelope, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.operations += 1;
        state.rows.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn replace(
        &self,
        id: EnvelopeId,
        discriminator: &str,
        document: Document,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.operations += 1;
        match state.rows.get_mut(&id) {
            Some(row) if row.discriminator == discriminator => {
                row.document = document;
                row.updated_at = updated_at;
                Ok(())
            }
            _ => Err(StoreError::NotFound(id)),
        }
    }

    async fn delete(&self, id: EnvelopeId) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.operations += 1;
        state
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    fn query_by_discriminator<'a>(&'a self, discriminator: &'a str) -> EnvelopeStream<'a> {
        self.lazy_scan(move |envelope| envelope.discriminator == discriminator)
    }

    fn query_by_field<'a>(
        &'a self,
        discriminator: &'a str,
        path: &'a [&'a str],
        value: &'a Value,
    ) -> EnvelopeStream<'a> {
        self.lazy_scan(move |envelope| {
            envelope.discriminator == discriminator && envelope.document.field(path) == Some(value)
        })
    }
}

/// A store that always returns an unavailability error. Useful for testing
/// error-handling paths.
#[derive(Debug)]
pub struct FailingEnvelopeStore;

fn connection_refused() -> StoreError {
    StoreError::Unavailable("connection refused".into())
}

#[async_trait]
impl EnvelopeStore for FailingEnvelopeStore {
    async fn insert(&self, _envelope: NewEnvelope) -> Result<EnvelopeId, StoreError> {
        Err(connection_refused())
    }

    async fn get_by_id(&self, _id: EnvelopeId) -> Result<Envelope, StoreError> {
        Err(connection_refused())
    }

    async fn replace(
        &self,
        _id: EnvelopeId,
        _discriminator: &str,
        _document: Document,
        _updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        Err(connection_refused())
    }

    async fn delete(&self, _id: EnvelopeId) -> Result<(), StoreError> {
        Err(connection_refused())
    }

    fn query_by_discriminator<'a>(&'a self, _discriminator: &'a str) -> EnvelopeStream<'a> {
        stream::once(async { Err(connection_refused()) }).boxed()
    }

    fn query_by_field<'a>(
        &'a self,
        _discriminator: &'a str,
        _path: &'a [&'a str],
        _value: &'a Value,
    ) -> EnvelopeStream<'a> {
        stream::once(async { Err(connection_refused()) }).boxed()
    }
}
