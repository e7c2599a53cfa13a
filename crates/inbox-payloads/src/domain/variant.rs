//! The closed set of payload variants.

use super::author::Author;
use super::discriminator::Discriminator;
use super::events::{EventA, EventB};
use super::payload::{MissingField, Payload};

/// Any payload the inbox understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadVariant {
    /// See [`EventA`].
    EventA(EventA),
    /// See [`EventB`].
    EventB(EventB),
    /// See [`Author`].
    Author(Author),
}

impl PayloadVariant {
    /// The discriminator this variant is stored under.
    #[must_use]
    pub fn discriminator(&self) -> Discriminator {
        match self {
            Self::EventA(_) => Discriminator::EventA,
            Self::EventB(_) => Discriminator::EventB,
            Self::Author(_) => Discriminator::Author,
        }
    }

    /// Checks the required fields of the wrapped payload.
    ///
    /// # Errors
    ///
    /// Returns the first missing field.
    pub fn validate(&self) -> Result<(), MissingField> {
        match self {
            Self::EventA(p) => p.validate(),
            Self::EventB(p) => p.validate(),
            Self::Author(p) => p.validate(),
        }
    }
}

impl From<EventA> for PayloadVariant {
    fn from(payload: EventA) -> Self {
        Self::EventA(payload)
    }
}

impl From<EventB> for PayloadVariant {
    fn from(payload: EventB) -> Self {
        Self::EventB(payload)
    }
}

impl From<Author> for PayloadVariant {
    fn from(payload: Author) -> Self {
        Self::Author(payload)
    }
}
