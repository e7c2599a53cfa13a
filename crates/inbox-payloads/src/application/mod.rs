//! Application layer: write handlers and the typed query façade.

pub mod command_handlers;
pub mod query_handlers;
