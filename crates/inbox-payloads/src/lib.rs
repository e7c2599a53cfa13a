//! Inbox Payloads — typed payloads stored as JSON documents.
//!
//! Holds the closed set of payload variants, the codec that maps them to and
//! from envelope documents, and the application handlers that write and query
//! them through an `EnvelopeStore`.

pub mod application;
pub mod codec;
pub mod domain;
pub mod error;

pub use error::InboxError;
