//! Embedded schema migrations
//!
//! SQL files live in `atlas-db/migrations/` and are compiled into the
//! binary. The same migrator seeds every `#[sqlx::test]` database.

use sqlx::migrate::Migrator;
use sqlx::PgPool;

use crate::DbError;

/// Migrator for the atlas schema.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Apply all pending migrations.
pub async fn run(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Running schema migrations...");

    MIGRATOR.run(pool).await?;

    tracing::info!(
        migrations = MIGRATOR.iter().count(),
        "Schema migrations complete"
    );
    Ok(())
}
