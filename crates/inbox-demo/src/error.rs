//! Demo error types.

use inbox_payloads::InboxError;
use thiserror::Error;

/// Startup and runtime errors for the demo.
#[derive(Debug, Error)]
pub enum DemoError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection or pool error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Applying migrations failed.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// An inbox operation failed.
    #[error("inbox error: {0}")]
    Inbox(#[from] InboxError),
}
