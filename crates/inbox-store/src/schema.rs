//! Envelope store database schema and statements.

use sqlx::PgPool;
use sqlx::migrate::{MigrateError, Migrator};

/// Forward-only migrations for the envelope table.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Applies any pending migrations. Existing data is never dropped.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or the applied history does
/// not match the embedded migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

pub(crate) const INSERT_ENVELOPE: &str = r"
INSERT INTO envelopes (discriminator, document, created_at, updated_at)
VALUES ($1, $2, $3, $3)
RETURNING id
";

pub(crate) const SELECT_ENVELOPE_BY_ID: &str = r"
SELECT id, discriminator, document, created_at, updated_at
FROM envelopes
WHERE id = $1
";

pub(crate) const SELECT_ENVELOPES_BY_DISCRIMINATOR: &str = r"
SELECT id, discriminator, document, created_at, updated_at
FROM envelopes
WHERE discriminator = $1
ORDER BY id
";

pub(crate) const SELECT_ENVELOPES_BY_FIELD: &str = r"
SELECT id, discriminator, document, created_at, updated_at
FROM envelopes
WHERE discriminator = $1 AND document #> $2 = $3
ORDER BY id
";

pub(crate) const REPLACE_DOCUMENT: &str = r"
UPDATE envelopes
SET document = $3, updated_at = $4
WHERE id = $1 AND discriminator = $2
";

pub(crate) const DELETE_ENVELOPE: &str = r"
DELETE FROM envelopes
WHERE id = $1
";
