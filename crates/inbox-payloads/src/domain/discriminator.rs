//! Discriminators naming each payload schema.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The schema a stored document follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Discriminator {
    /// An `EventA` inbox entry.
    EventA,
    /// An `EventB` inbox entry.
    EventB,
    /// An `Author` with embedded contact details.
    Author,
}

impl Discriminator {
    /// Every known discriminator.
    pub const ALL: [Self; 3] = [Self::EventA, Self::EventB, Self::Author];

    /// The string stored in the envelope's discriminator column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EventA => "EventA",
            Self::EventB => "EventB",
            Self::Author => "Author",
        }
    }
}

impl fmt::Display for Discriminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A discriminator string outside the known set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown discriminator: {0}")]
pub struct UnknownDiscriminator(pub String);

impl FromStr for Discriminator {
    type Err = UnknownDiscriminator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| UnknownDiscriminator(s.to_owned()))
    }
}
