//! Inbox Store — PostgreSQL implementation of `EnvelopeStore`.
//!
//! Envelopes live in a single `envelopes` table: one discriminator column and
//! one `JSONB` document column, whatever the payload type.

pub mod pg_envelope_store;
pub mod schema;
