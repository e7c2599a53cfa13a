//! Query handlers for the inbox.
//!
//! Typed, discriminator-scoped retrieval: envelopes are read through the
//! store and decoded under the schema of the payload type asked for.

use chrono::{DateTime, Utc};
use futures::future;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use inbox_core::envelope::{Envelope, EnvelopeId};
use inbox_core::store::{EnvelopeStore, EnvelopeStream};
use serde_json::Value;
use tracing::warn;

use crate::codec;
use crate::domain::entry::InboxEntry;
use crate::domain::events::EventA;
use crate::domain::payload::Payload;
use crate::domain::variant::PayloadVariant;
use crate::error::InboxError;

/// Lazy sequence of decoded entries. Each item fails or succeeds on its own.
pub type EntryStream<'a, P> = BoxStream<'a, Result<InboxEntry<P>, InboxError>>;

fn into_entry<P>(envelope: &Envelope, payload: P) -> InboxEntry<P> {
    InboxEntry {
        id: envelope.id,
        created_at: envelope.created_at,
        updated_at: envelope.updated_at,
        payload,
    }
}

fn decode_entry<P: Payload>(envelope: &Envelope) -> Result<InboxEntry<P>, InboxError> {
    let payload = codec::decode_payload::<P>(&envelope.document, &envelope.discriminator)?;
    Ok(into_entry(envelope, payload))
}

fn decode_variant_entry(envelope: &Envelope) -> Result<InboxEntry<PayloadVariant>, InboxError> {
    let payload = codec::decode(&envelope.document, &envelope.discriminator)?;
    Ok(into_entry(envelope, payload))
}

fn report_undecodable<T>(
    id: EnvelopeId,
    discriminator: &str,
    result: Result<T, InboxError>,
) -> Result<T, InboxError> {
    if let Err(InboxError::Decoding(err)) = &result {
        warn!(%id, discriminator, error = %err, "stored document does not decode");
    }
    result
}

/// Scans `rows` and returns the only entry satisfying `predicate`.
async fn expect_single<P, F>(
    mut rows: EnvelopeStream<'_>,
    predicate: F,
) -> Result<InboxEntry<P>, InboxError>
where
    P: Payload,
    F: Fn(&P) -> bool,
{
    let mut found = None;
    let mut count = 0_usize;

    while let Some(envelope) = rows.try_next().await? {
        // Undecodable candidates cannot satisfy the predicate; skip them.
        let Ok(entry) =
            report_undecodable(envelope.id, &envelope.discriminator, decode_entry::<P>(&envelope))
        else {
            continue;
        };
        if predicate(&entry.payload) {
            count += 1;
            found.get_or_insert(entry);
        }
    }

    match found {
        Some(entry) if count == 1 => Ok(entry),
        Some(_) => Err(InboxError::MultipleMatches {
            discriminator: P::DISCRIMINATOR,
            count,
        }),
        None => Err(InboxError::NoMatch {
            discriminator: P::DISCRIMINATOR,
        }),
    }
}

/// Retrieves envelope `id` decoded as a `P`.
///
/// # Errors
///
/// Returns `InboxError::NotFound` if the envelope does not exist,
/// `InboxError::Decoding` if it holds another payload type or a malformed
/// document, or `InboxError::Storage` if the read fails.
pub async fn get_by_id<P: Payload>(
    id: EnvelopeId,
    store: &dyn EnvelopeStore,
) -> Result<InboxEntry<P>, InboxError> {
    let envelope = store.get_by_id(id).await?;
    decode_entry(&envelope)
}

/// Returns the single `P` for which `predicate` holds.
///
/// Every envelope carrying `P`'s discriminator is decoded and tested.
///
/// # Errors
///
/// Returns `InboxError::NoMatch` if nothing matches,
/// `InboxError::MultipleMatches` if more than one envelope matches, or
/// `InboxError::Storage` if the scan fails.
pub async fn find_by_natural_key<P, F>(
    store: &dyn EnvelopeStore,
    predicate: F,
) -> Result<InboxEntry<P>, InboxError>
where
    P: Payload,
    F: Fn(&P) -> bool,
{
    let rows = store.query_by_discriminator(P::DISCRIMINATOR.as_str());
    expect_single(rows, predicate).await
}

/// Returns the single `P` whose document holds `value` at `path`.
///
/// The field comparison is pushed down to the store, so only matching
/// envelopes are read and decoded. `path` uses the document's field names,
/// e.g. `["contact", "address", "city"]`.
///
/// # Errors
///
/// Same as [`find_by_natural_key`].
pub async fn find_by_field<P: Payload>(
    store: &dyn EnvelopeStore,
    path: &[&str],
    value: &Value,
) -> Result<InboxEntry<P>, InboxError> {
    let rows = store.query_by_field(P::DISCRIMINATOR.as_str(), path, value);
    expect_single(rows, |_: &P| true).await
}

/// Streams every envelope holding a `P`, in ascending id order.
///
/// A document that fails to decode yields an `Err` item; the stream carries
/// on with the next envelope.
pub fn list_all<'a, P: Payload>(store: &'a dyn EnvelopeStore) -> EntryStream<'a, P> {
    store
        .query_by_discriminator(P::DISCRIMINATOR.as_str())
        .map(|row| -> Result<InboxEntry<P>, InboxError> {
            let envelope = row?;
            report_undecodable(envelope.id, &envelope.discriminator, decode_entry(&envelope))
        })
        .boxed()
}

/// Streams every envelope stored under `discriminator`, decoded as whichever
/// variant the discriminator names.
///
/// An unknown discriminator makes every item a decoding error.
pub fn list_all_variants<'a>(
    store: &'a dyn EnvelopeStore,
    discriminator: &'a str,
) -> EntryStream<'a, PayloadVariant> {
    store
        .query_by_discriminator(discriminator)
        .map(|row| -> Result<InboxEntry<PayloadVariant>, InboxError> {
            let envelope = row?;
            report_undecodable(
                envelope.id,
                &envelope.discriminator,
                decode_variant_entry(&envelope),
            )
        })
        .boxed()
}

/// Streams every `EventA` whose `processEarliest` has passed at `now`, in
/// ascending id order.
///
/// Only decoded entries that are not yet due are dropped; undecodable rows
/// and storage failures stay in the stream as `Err` items.
pub fn list_due_event_a<'a>(
    store: &'a dyn EnvelopeStore,
    now: DateTime<Utc>,
) -> EntryStream<'a, EventA> {
    list_all::<EventA>(store)
        .filter(move |item| {
            let not_due = matches!(item, Ok(entry) if !entry.payload.is_due(now));
            future::ready(!not_due)
        })
        .boxed()
}
