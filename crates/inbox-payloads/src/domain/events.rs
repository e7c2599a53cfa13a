//! Event payloads sharing the inbox envelope table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::discriminator::Discriminator;
use super::payload::{MissingField, Payload, require};

/// An event that may be deferred until `process_earliest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventA {
    /// Required.
    pub name: String,
    /// Earliest time the event may be processed; `None` means immediately.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_earliest: Option<DateTime<Utc>>,
}

impl EventA {
    /// Returns `true` if the event may be processed at `now`.
    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.process_earliest.is_none_or(|earliest| earliest <= now)
    }
}

impl Payload for EventA {
    const DISCRIMINATOR: Discriminator = Discriminator::EventA;

    fn validate(&self) -> Result<(), MissingField> {
        require(&self.name, "name")
    }
}

/// An event about a named person and their age.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventB {
    /// Required.
    pub name: String,
    /// Age in years.
    pub age: i32,
}

impl Payload for EventB {
    const DISCRIMINATOR: Discriminator = Discriminator::EventB;

    fn validate(&self) -> Result<(), MissingField> {
        require(&self.name, "name")
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_event_a_without_process_earliest_is_always_due() {
        let event = EventA {
            name: "Maddy Montaquila".to_owned(),
            process_earliest: None,
        };
        assert!(event.is_due(Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_event_a_is_due_from_process_earliest_onwards() {
        let earliest = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        let event = EventA {
            name: "Maddy Montaquila".to_owned(),
            process_earliest: Some(earliest),
        };

        assert!(!event.is_due(earliest - chrono::Duration::seconds(1)));
        assert!(event.is_due(earliest));
    }

    #[test]
    fn test_blank_name_fails_validation() {
        let event = EventB {
            name: "   ".to_owned(),
            age: 43,
        };
        assert_eq!(event.validate(), Err(MissingField("name")));
    }
}
