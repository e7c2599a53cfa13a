//! Typed view of a stored envelope.

use chrono::{DateTime, Utc};
use inbox_core::envelope::EnvelopeId;

use super::events::{EventA, EventB};

/// A decoded payload together with the envelope fields that address it.
#[derive(Debug, Clone, PartialEq)]
pub struct InboxEntry<P> {
    /// Store-assigned identifier.
    pub id: EnvelopeId,
    /// When the envelope was inserted.
    pub created_at: DateTime<Utc>,
    /// When the document was last replaced.
    pub updated_at: DateTime<Utc>,
    /// The decoded payload.
    pub payload: P,
}

/// An inbox row holding an `EventA`.
pub type EventAInbox = InboxEntry<EventA>;

/// An inbox row holding an `EventB`.
pub type EventBInbox = InboxEntry<EventB>;
