//! Schema for the POS store, embedded at compile time from
//! `migrations/sqlite/` in the workspace root.
//!
//! ```text
//! 001_create_pos.sql   pos table: seq (insertion order), id, fields,
//!                      created_at, updated_at, CHECKs on type/campus
//! ```
//!
//! Applied files are recorded in `_sqlx_migrations`. Schema changes go in a
//! new numbered file; an applied file is never edited, since sqlx refuses to
//! start when a recorded checksum no longer matches.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies every migration not yet recorded. A no-op on an up-to-date store.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    MIGRATOR.run(pool).await?;
    info!(known = MIGRATOR.migrations.len(), "POS schema up to date");
    Ok(())
}

/// `(embedded, applied)` migration counts. A store that was never migrated
/// reports zero applied.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
        .unwrap_or(0);

    Ok((total, usize::try_from(applied).unwrap_or(0)))
}
