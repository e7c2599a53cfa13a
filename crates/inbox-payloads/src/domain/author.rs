//! The `Author` payload: an owned-object graph stored as a single document.
//!
//! `ContactDetails` and `Address` have no identity of their own. They live
//! and die with the author that owns them.

use serde::{Deserialize, Serialize};

use super::discriminator::Discriminator;
use super::payload::{MissingField, Payload, require};

/// A postal address. Every field is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Street line.
    pub street: String,
    /// City or town.
    pub city: String,
    /// Postal code.
    pub postcode: String,
    /// Country.
    pub country: String,
}

impl Address {
    /// Creates an address.
    #[must_use]
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        postcode: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            city: city.into(),
            postcode: postcode.into(),
            country: country.into(),
        }
    }
}

/// How to reach an author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    /// Required.
    pub address: Address,
    /// Optional phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// An author and their embedded contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    /// Required; the natural key authors are usually looked up by.
    pub name: String,
    /// Required.
    pub contact: ContactDetails,
}

impl Payload for Author {
    const DISCRIMINATOR: Discriminator = Discriminator::Author;

    fn validate(&self) -> Result<(), MissingField> {
        let address = &self.contact.address;
        require(&self.name, "name")?;
        require(&address.street, "contact.address.street")?;
        require(&address.city, "contact.address.city")?;
        require(&address.postcode, "contact.address.postcode")?;
        require(&address.country, "contact.address.country")
    }
}
