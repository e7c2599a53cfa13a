//! Shared test stores and utilities for the JSON-document inbox.

mod clock;
mod store;

pub use clock::FixedClock;
pub use store::{FailingEnvelopeStore, InMemoryEnvelopeStore};
