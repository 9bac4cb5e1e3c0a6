//! # POS Repository
//!
//! SQLite implementation of the [`PosRepository`] port.
//!
//! ## Insertion Order and Batches
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How the pos table is used                            │
//! │                                                                         │
//! │  seq (AUTOINCREMENT)  id (UUID v4)          name        ...            │
//! │  ─────────────────    ───────────────────   ─────────                  │
//! │  1                    6f1c...               Kaffeebar                   │
//! │  2                    a03e...               Automat                     │
//! │  3                    19bd...               Backstube                   │
//! │                                                                         │
//! │  list      → ORDER BY seq                (insertion order)             │
//! │  by name   → ORDER BY seq LIMIT 1        (earliest insert wins)        │
//! │                                                                         │
//! │  insert_batch / update_batch:                                          │
//! │    BEGIN ── row 1 ── row 2 ── ... ── row N ── COMMIT                   │
//! │               └─ any error: ROLLBACK, nothing visible                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Executor, Sqlite, SqlitePool};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use campus_core::{NewPos, Pos, PosChange, PosRepository, RepositoryResult};

/// Repository for POS database operations.
///
/// Handles made by the same [`crate::Database`] share one gate, so every
/// `PosService` built on them serializes against the others.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.pos();
///
/// let created = repo.insert_batch(&drafts).await?;
/// let all = repo.list().await?;
/// ```
#[derive(Debug, Clone)]
pub struct SqlitePosRepository {
    pool: SqlitePool,
    gate: Arc<RwLock<()>>,
}

impl SqlitePosRepository {
    /// Creates a repository over `pool` that hands out `gate` to services.
    pub fn new(pool: SqlitePool, gate: Arc<RwLock<()>>) -> Self {
        SqlitePosRepository { pool, gate }
    }

    /// Inserts one POS and assigns its id.
    pub async fn insert_one(&self, draft: &NewPos) -> DbResult<Pos> {
        insert_row(&self.pool, draft).await
    }

    /// Inserts every draft in one transaction.
    ///
    /// ## Returns
    /// * `Ok(Vec<Pos>)` - Inserted records, in input order
    /// * `Err(DbError)` - Nothing was inserted
    pub async fn insert_batch(&self, drafts: &[NewPos]) -> DbResult<Vec<Pos>> {
        debug!(count = drafts.len(), "Inserting POS batch");

        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(drafts.len());
        for draft in drafts {
            created.push(insert_row(&mut *tx, draft).await?);
        }
        tx.commit().await?;

        Ok(created)
    }

    /// Overwrites an existing POS.
    ///
    /// ## Returns
    /// * `Ok(Pos)` - The stored record after the update
    /// * `Err(DbError::NotFound)` - POS doesn't exist
    pub async fn update_one(&self, change: &PosChange) -> DbResult<Pos> {
        update_row(&self.pool, change).await
    }

    /// Applies every change in one transaction.
    ///
    /// One missing id rolls back the whole batch.
    pub async fn update_batch(&self, changes: &[PosChange]) -> DbResult<Vec<Pos>> {
        debug!(count = changes.len(), "Updating POS batch");

        let mut tx = self.pool.begin().await?;
        let mut updated = Vec::with_capacity(changes.len());
        for change in changes {
            updated.push(update_row(&mut *tx, change).await?);
        }
        tx.commit().await?;

        Ok(updated)
    }

    /// Gets a POS by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Pos))` - POS found
    /// * `Ok(None)` - POS not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Pos>> {
        let pos = sqlx::query_as::<_, Pos>(
            r#"
            SELECT
                id, name, description, pos_type, campus,
                street, house_number, postal_code, city,
                created_at, updated_at
            FROM pos
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(pos)
    }

    /// Gets the earliest inserted POS with the given name.
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Pos>> {
        let pos = sqlx::query_as::<_, Pos>(
            r#"
            SELECT
                id, name, description, pos_type, campus,
                street, house_number, postal_code, city,
                created_at, updated_at
            FROM pos
            WHERE name = ?1
            ORDER BY seq
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(pos)
    }

    /// Lists every POS in insertion order.
    pub async fn list(&self) -> DbResult<Vec<Pos>> {
        let all = sqlx::query_as::<_, Pos>(
            r#"
            SELECT
                id, name, description, pos_type, campus,
                street, house_number, postal_code, city,
                created_at, updated_at
            FROM pos
            ORDER BY seq
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = all.len(), "Listed POS");
        Ok(all)
    }

    /// Deletes every POS. Returns the number of removed rows.
    pub async fn purge(&self) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM pos").execute(&self.pool).await?;

        debug!(removed = result.rows_affected(), "Purged POS table");
        Ok(result.rows_affected())
    }

    /// Counts stored POS (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pos")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[async_trait]
impl PosRepository for SqlitePosRepository {
    async fn insert(&self, draft: &NewPos) -> RepositoryResult<Pos> {
        Ok(self.insert_one(draft).await?)
    }

    async fn insert_all(&self, drafts: &[NewPos]) -> RepositoryResult<Vec<Pos>> {
        Ok(self.insert_batch(drafts).await?)
    }

    async fn update_by_id(&self, change: &PosChange) -> RepositoryResult<Pos> {
        Ok(self.update_one(change).await?)
    }

    async fn update_all(&self, changes: &[PosChange]) -> RepositoryResult<Vec<Pos>> {
        Ok(self.update_batch(changes).await?)
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Pos>> {
        Ok(self.get_by_id(id).await?)
    }

    async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Pos>> {
        Ok(self.get_by_name(name).await?)
    }

    async fn list_all(&self) -> RepositoryResult<Vec<Pos>> {
        Ok(self.list().await?)
    }

    async fn delete_all(&self) -> RepositoryResult<u64> {
        Ok(self.purge().await?)
    }

    fn gate(&self) -> Arc<RwLock<()>> {
        Arc::clone(&self.gate)
    }
}

async fn insert_row<'e, E>(executor: E, draft: &NewPos) -> DbResult<Pos>
where
    E: Executor<'e, Database = Sqlite>,
{
    let id = generate_pos_id();
    let fields = &draft.fields;

    debug!(id = %id, name = %fields.name, "Inserting POS");

    sqlx::query(
        r#"
        INSERT INTO pos (
            id, name, description, pos_type, campus,
            street, house_number, postal_code, city,
            created_at, updated_at
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5,
            ?6, ?7, ?8, ?9,
            ?10, ?10
        )
        "#,
    )
    .bind(&id)
    .bind(&fields.name)
    .bind(&fields.description)
    .bind(fields.pos_type)
    .bind(fields.campus)
    .bind(&fields.street)
    .bind(&fields.house_number)
    .bind(fields.postal_code)
    .bind(&fields.city)
    .bind(draft.created_at)
    .execute(executor)
    .await?;

    Ok(Pos::from_parts(
        id,
        fields.clone(),
        draft.created_at,
        draft.created_at,
    ))
}

async fn update_row<'e, E>(executor: E, change: &PosChange) -> DbResult<Pos>
where
    E: Executor<'e, Database = Sqlite>,
{
    let fields = &change.fields;

    debug!(id = %change.id, "Updating POS");

    sqlx::query_as::<_, Pos>(
        r#"
        UPDATE pos SET
            name = ?2,
            description = ?3,
            pos_type = ?4,
            campus = ?5,
            street = ?6,
            house_number = ?7,
            postal_code = ?8,
            city = ?9,
            updated_at = ?10
        WHERE id = ?1
        RETURNING
            id, name, description, pos_type, campus,
            street, house_number, postal_code, city,
            created_at, updated_at
        "#,
    )
    .bind(&change.id)
    .bind(&fields.name)
    .bind(&fields.description)
    .bind(fields.pos_type)
    .bind(fields.campus)
    .bind(&fields.street)
    .bind(&fields.house_number)
    .bind(fields.postal_code)
    .bind(&fields.city)
    .bind(change.updated_at)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| DbError::not_found(&change.id))
}

/// Generates a new POS ID (UUID v4).
pub fn generate_pos_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
