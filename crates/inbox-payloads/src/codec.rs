//! Payload codec: typed payloads to and from envelope documents.
//!
//! Required fields are checked here, in both directions, so the guarantee
//! does not depend on constraints in whatever medium stores the documents.
//! Unknown fields in a stored document are ignored, which keeps adding an
//! optional field backward compatible.

use inbox_core::envelope::Document;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::discriminator::{Discriminator, UnknownDiscriminator};
use crate::domain::payload::{MissingField, Payload};
use crate::domain::variant::PayloadVariant;

/// A payload could not be turned into a document.
#[derive(Debug, Error)]
pub enum EncodingError {
    /// A required field is absent or blank.
    #[error("cannot encode {discriminator}: {source}")]
    MissingField {
        /// The payload being encoded.
        discriminator: Discriminator,
        /// The missing field.
        source: MissingField,
    },

    /// Serialization to JSON failed.
    #[error("cannot encode {discriminator}: {source}")]
    Serialization {
        /// The payload being encoded.
        discriminator: Discriminator,
        /// The serializer error.
        source: serde_json::Error,
    },
}

/// A document does not match the schema named by its discriminator.
#[derive(Debug, Error)]
pub enum DecodingError {
    /// The discriminator is not one the codec knows.
    #[error(transparent)]
    UnknownDiscriminator(#[from] UnknownDiscriminator),

    /// The caller asked for a different payload type than the envelope holds.
    #[error("expected a {expected} document, found {found}")]
    DiscriminatorMismatch {
        /// The requested payload type.
        expected: Discriminator,
        /// The discriminator stored with the document.
        found: String,
    },

    /// The document has the wrong shape: a required field is absent, a field
    /// has the wrong type, or the document is not an object.
    #[error("malformed {discriminator} document: {source}")]
    Shape {
        /// The schema the document was decoded against.
        discriminator: Discriminator,
        /// The deserializer error.
        source: serde_json::Error,
    },

    /// A required field is present but blank.
    #[error("invalid {discriminator} document: {source}")]
    MissingField {
        /// The schema the document was decoded against.
        discriminator: Discriminator,
        /// The blank field.
        source: MissingField,
    },
}

/// Validates and serializes a typed payload.
///
/// # Errors
///
/// Returns `EncodingError::MissingField` if a required field is blank.
pub fn encode_payload<P: Payload>(payload: &P) -> Result<Document, EncodingError> {
    payload
        .validate()
        .map_err(|source| EncodingError::MissingField {
            discriminator: P::DISCRIMINATOR,
            source,
        })?;
    serde_json::to_value(payload)
        .map(Document::new)
        .map_err(|source| EncodingError::Serialization {
            discriminator: P::DISCRIMINATOR,
            source,
        })
}

/// Decodes a document stored under `discriminator` as a `P`.
///
/// # Errors
///
/// Returns `DecodingError` if `discriminator` is unknown or names another
/// payload type, or if the document does not match `P`'s schema.
pub fn decode_payload<P: Payload>(
    document: &Document,
    discriminator: &str,
) -> Result<P, DecodingError> {
    let found: Discriminator = discriminator.parse()?;
    if found != P::DISCRIMINATOR {
        return Err(DecodingError::DiscriminatorMismatch {
            expected: P::DISCRIMINATOR,
            found: discriminator.to_owned(),
        });
    }

    let payload = P::deserialize(document.as_value()).map_err(|source| DecodingError::Shape {
        discriminator: found,
        source,
    })?;
    payload
        .validate()
        .map_err(|source| DecodingError::MissingField {
            discriminator: found,
            source,
        })?;
    Ok(payload)
}

/// Validates and serializes any payload variant.
///
/// # Errors
///
/// Returns `EncodingError::MissingField` if a required field is blank.
pub fn encode(payload: &PayloadVariant) -> Result<Document, EncodingError> {
    match payload {
        PayloadVariant::EventA(p) => encode_payload(p),
        PayloadVariant::EventB(p) => encode_payload(p),
        PayloadVariant::Author(p) => encode_payload(p),
    }
}

/// Decodes a document under the schema named by `discriminator`.
///
/// # Errors
///
/// Returns `DecodingError` if `discriminator` is unknown or the document does
/// not match its schema.
pub fn decode(document: &Document, discriminator: &str) -> Result<PayloadVariant, DecodingError> {
    match discriminator.parse::<Discriminator>()? {
        Discriminator::EventA => decode_payload(document, discriminator).map(PayloadVariant::EventA),
        Discriminator::EventB => decode_payload(document, discriminator).map(PayloadVariant::EventB),
        Discriminator::Author => decode_payload(document, discriminator).map(PayloadVariant::Author),
    }
}
