//! Inbox Core — envelope model and storage abstractions.
//!
//! This crate defines the envelope types and the `EnvelopeStore` trait that
//! storage backends implement and the payload layer depends on. It contains no
//! infrastructure code.

pub mod clock;
pub mod envelope;
pub mod error;
pub mod store;
