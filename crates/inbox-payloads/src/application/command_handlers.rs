//! Write handlers for the inbox.
//!
//! Each handler encodes its payload before touching the store, so a payload
//! with a missing required field never causes a partial write.

use inbox_core::clock::Clock;
use inbox_core::envelope::{Document, EnvelopeId, NewEnvelope};
use inbox_core::store::EnvelopeStore;
use tracing::debug;

use crate::codec;
use crate::domain::discriminator::Discriminator;
use crate::domain::payload::Payload;
use crate::domain::variant::PayloadVariant;
use crate::error::InboxError;

async fn persist(
    discriminator: Discriminator,
    document: Document,
    clock: &dyn Clock,
    store: &dyn EnvelopeStore,
) -> Result<EnvelopeId, InboxError> {
    let id = store
        .insert(NewEnvelope {
            discriminator: discriminator.as_str().to_owned(),
            document,
            created_at: clock.now(),
        })
        .await?;
    debug!(%id, %discriminator, "payload stored");
    Ok(id)
}

/// Encodes `payload` and stores it in a new envelope.
///
/// # Errors
///
/// Returns `InboxError::Encoding` (without touching the store) if a required
/// field is missing, or `InboxError::Storage` if the insert fails.
pub async fn handle_insert<P: Payload>(
    payload: &P,
    clock: &dyn Clock,
    store: &dyn EnvelopeStore,
) -> Result<EnvelopeId, InboxError> {
    let document = codec::encode_payload(payload)?;
    persist(P::DISCRIMINATOR, document, clock, store).await
}

/// Encodes any payload variant and stores it in a new envelope.
///
/// # Errors
///
/// Same as [`handle_insert`].
pub async fn handle_insert_variant(
    payload: &PayloadVariant,
    clock: &dyn Clock,
    store: &dyn EnvelopeStore,
) -> Result<EnvelopeId, InboxError> {
    let document = codec::encode(payload)?;
    persist(payload.discriminator(), document, clock, store).await
}

/// Replaces the document of envelope `id` with `payload`.
///
/// The envelope must already hold a `P`. Concurrent replacements of the same
/// envelope are last-writer-wins.
///
/// # Errors
///
/// Returns `InboxError::Encoding` if a required field is missing,
/// `InboxError::NotFound` if no envelope with this id holds a `P`, or
/// `InboxError::Storage` if the write fails.
pub async fn handle_replace<P: Payload>(
    id: EnvelopeId,
    payload: &P,
    clock: &dyn Clock,
    store: &dyn EnvelopeStore,
) -> Result<(), InboxError> {
    let document = codec::encode_payload(payload)?;
    store
        .replace(id, P::DISCRIMINATOR.as_str(), document, clock.now())
        .await?;
    debug!(%id, discriminator = %P::DISCRIMINATOR, "payload replaced");
    Ok(())
}

/// Deletes envelope `id` together with its payload tree.
///
/// # Errors
///
/// Returns `InboxError::NotFound` if the envelope does not exist, or
/// `InboxError::Storage` if the delete fails.
pub async fn handle_delete(id: EnvelopeId, store: &dyn EnvelopeStore) -> Result<(), InboxError> {
    store.delete(id).await?;
    debug!(%id, "envelope deleted");
    Ok(())
}
