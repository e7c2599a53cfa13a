//! Payload variants and the envelope-side view of a stored payload.

pub mod author;
pub mod discriminator;
pub mod entry;
pub mod events;
pub mod payload;
pub mod variant;
