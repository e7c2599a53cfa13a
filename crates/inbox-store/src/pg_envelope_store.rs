//! `PostgreSQL` implementation of the `EnvelopeStore` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::{StreamExt, TryStreamExt, stream};
use inbox_core::envelope::{Document, Envelope, EnvelopeId, NewEnvelope};
use inbox_core::error::StoreError;
use inbox_core::store::{EnvelopeStore, EnvelopeStream};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use tracing::{Instrument, Span, debug, field, info_span};

use crate::schema::{
    DELETE_ENVELOPE, INSERT_ENVELOPE, REPLACE_DOCUMENT, SELECT_ENVELOPE_BY_ID,
    SELECT_ENVELOPES_BY_DISCRIMINATOR, SELECT_ENVELOPES_BY_FIELD,
};

#[derive(Debug, FromRow)]
struct EnvelopeRow {
    id: i64,
    discriminator: String,
    document: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EnvelopeRow> for Envelope {
    fn from(row: EnvelopeRow) -> Self {
        Self {
            id: EnvelopeId::new(row.id),
            discriminator: row.discriminator,
            document: Document::new(row.document),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// SQLSTATE classes reporting that the server cannot serve the request right
/// now: connection exception (08), insufficient resources (53) and operator
/// intervention (57).
fn is_unavailable_sqlstate(code: &str) -> bool {
    matches!(code.get(..2), Some("08" | "53" | "57"))
}

/// Maps a driver error onto the store's error taxonomy.
fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db) => {
            if db.code().is_some_and(|code| is_unavailable_sqlstate(&code)) {
                StoreError::Unavailable(db.to_string())
            } else {
                StoreError::Rejected(db.to_string())
            }
        }
        e @ (sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::Decode(_)
        | sqlx::Error::TypeNotFound { .. }) => StoreError::Malformed(e.to_string()),
        other => StoreError::Unavailable(other.to_string()),
    }
}

/// PostgreSQL-backed envelope store.
///
/// Every operation runs inside an `envelope.*` span parented to the span
/// handed to [`PgEnvelopeStore::new`]. Replacing the same envelope from
/// several callers at once is last-writer-wins.
#[derive(Debug, Clone)]
pub struct PgEnvelopeStore {
    pool: PgPool,
    span: Span,
}

impl PgEnvelopeStore {
    /// Creates a new `PgEnvelopeStore` that logs under `span`.
    #[must_use]
    pub fn new(pool: PgPool, span: Span) -> Self {
        Self { pool, span }
    }

}

/// Enters `span` for every poll of `rows`, so the work of a scan is recorded
/// under its span however long the caller takes to drain it.
fn instrument_scan(span: Span, mut rows: EnvelopeStream<'_>) -> EnvelopeStream<'_> {
    stream::poll_fn(move |cx| {
        let _entered = span.enter();
        rows.poll_next_unpin(cx)
    })
    .boxed()
}

#[async_trait]
impl EnvelopeStore for PgEnvelopeStore {
    async fn insert(&self, envelope: NewEnvelope) -> Result<EnvelopeId, StoreError> {
        let span = info_span!(
            parent: &self.span,
            "envelope.insert",
            discriminator = %envelope.discriminator,
            id = field::Empty,
        );
        let (id,): (i64,) = sqlx::query_as(INSERT_ENVELOPE)
            .bind(&envelope.discriminator)
            .bind(envelope.document.as_value())
            .bind(envelope.created_at)
            .fetch_one(&self.pool)
            .instrument(span.clone())
            .await
            .map_err(map_sqlx_error)?;
        span.record("id", id);
        debug!(parent: &span, "envelope inserted");
        Ok(EnvelopeId::new(id))
    }

    async fn get_by_id(&self, id: EnvelopeId) -> Result<Envelope, StoreError> {
        let span = info_span!(parent: &self.span, "envelope.get", %id);
        sqlx::query_as::<_, EnvelopeRow>(SELECT_ENVELOPE_BY_ID)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .map_err(map_sqlx_error)?
            .map(Envelope::from)
            .ok_or(StoreError::NotFound(id))
    }

    async fn replace(
        &self,
        id: EnvelopeId,
        discriminator: &str,
        document: Document,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let span = info_span!(parent: &self.span, "envelope.replace", %id, discriminator);
        let result = sqlx::query(REPLACE_DOCUMENT)
            .bind(id.get())
            .bind(discriminator)
            .bind(document.as_value())
            .bind(updated_at)
            .execute(&self.pool)
            .instrument(span)
            .await
            .map_err(map_sqlx_error)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn delete(&self, id: EnvelopeId) -> Result<(), StoreError> {
        let span = info_span!(parent: &self.span, "envelope.delete", %id);
        let result = sqlx::query(DELETE_ENVELOPE)
            .bind(id.get())
            .execute(&self.pool)
            .instrument(span)
            .await
            .map_err(map_sqlx_error)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn query_by_discriminator<'a>(&'a self, discriminator: &'a str) -> EnvelopeStream<'a> {
        let span = info_span!(parent: &self.span, "envelope.query_by_discriminator", discriminator);
        let rows = sqlx::query_as::<_, EnvelopeRow>(SELECT_ENVELOPES_BY_DISCRIMINATOR)
            .bind(discriminator)
            .fetch(&self.pool)
            .map_ok(Envelope::from)
            .map_err(map_sqlx_error)
            .boxed();
        instrument_scan(span, rows)
    }

    fn query_by_field<'a>(
        &'a self,
        discriminator: &'a str,
        path: &'a [&'a str],
        value: &'a Value,
    ) -> EnvelopeStream<'a> {
        let span = info_span!(
            parent: &self.span,
            "envelope.query_by_field",
            discriminator,
            path = ?path,
        );
        let rows = sqlx::query_as::<_, EnvelopeRow>(SELECT_ENVELOPES_BY_FIELD)
            .bind(discriminator)
            .bind(path.to_vec())
            .bind(value)
            .fetch(&self.pool)
            .map_ok(Envelope::from)
            .map_err(map_sqlx_error)
            .boxed();
        instrument_scan(span, rows)
    }
}
