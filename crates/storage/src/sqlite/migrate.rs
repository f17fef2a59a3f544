use sqlx::SqlitePool;

use super::SqliteInitError;

/// Runs a single, consolidated migration for the current schema.
///
/// One row per `(namespace, username)` pair, the profile itself stored as a
/// JSON blob so the wire contract stays identical across backends.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS profiles (
                namespace TEXT NOT NULL,
                username TEXT NOT NULL,
                data TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (namespace, username)
            );
            ",
    )
    .execute(pool)
    .await?;

    Ok(())
}
