//! The `Payload` trait implemented by every typed payload.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::discriminator::Discriminator;

/// A required field that is absent or blank.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("required field `{0}` is missing")]
pub struct MissingField(pub &'static str);

/// A typed payload stored as one envelope document.
pub trait Payload: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The discriminator envelopes of this payload carry.
    const DISCRIMINATOR: Discriminator;

    /// Checks that every required field holds a value.
    ///
    /// # Errors
    ///
    /// Returns the dotted path of the first missing field.
    fn validate(&self) -> Result<(), MissingField>;
}

/// Fails with `MissingField(field)` when `value` is empty or whitespace.
pub(crate) fn require(value: &str, field: &'static str) -> Result<(), MissingField> {
    if value.trim().is_empty() {
        Err(MissingField(field))
    } else {
        Ok(())
    }
}
