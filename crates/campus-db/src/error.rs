//! # Store Errors
//!
//! What can go wrong between the POS repository and SQLite, and how each
//! case is reported to the domain.
//!
//! ```text
//! sqlx::Error / MigrateError
//!       │  From
//!       ▼
//! DbError            NotFound │ UniqueViolation │ ConstraintViolation │ ...
//!       │  From
//!       ▼
//! RepositoryError    NotFound │ Connection      │ Query
//!       │  From (campus-core)
//!       ▼
//! PosError::NotFound (update target vanished) or PosError::Storage
//! ```

use campus_core::RepositoryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// An `UPDATE ... RETURNING` matched no row.
    ///
    /// ## When This Occurs
    /// - The id was never stored
    /// - Something outside the service gate removed the row
    #[error("POS not found: {id}")]
    NotFound { id: String },

    /// A second row tried to take an existing `id`.
    #[error("Duplicate value for {column}")]
    UniqueViolation { column: String },

    /// A CHECK or NOT NULL constraint on the `pos` table failed.
    ///
    /// ## When This Occurs
    /// - A `type` or `campus` value outside its CHECK list
    /// - A postal code outside 1..=99999
    ///
    /// Validation in campus-core rejects these first, so seeing one means a
    /// row reached the table without passing through `PosService`.
    #[error("Constraint violation: {message}")]
    ConstraintViolation { message: String },

    /// The store could not be opened or the pool was closed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Every connection stayed busy for the whole acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,
}

impl DbError {
    pub fn not_found(id: impl Into<String>) -> Self {
        DbError::NotFound { id: id.into() }
    }
}

/// SQLite reports constraint failures as plain messages:
/// `UNIQUE constraint failed: pos.id`, `CHECK constraint failed: ...`,
/// `NOT NULL constraint failed: pos.name`.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();
                if let Some(column) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    DbError::UniqueViolation {
                        column: column.to_string(),
                    }
                } else if msg.starts_with("CHECK constraint failed")
                    || msg.starts_with("NOT NULL constraint failed")
                {
                    DbError::ConstraintViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),
            sqlx::Error::Io(io_err) => DbError::ConnectionFailed(io_err.to_string()),
            other => DbError::QueryFailed(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Crosses the port boundary: the domain only distinguishes "missing",
/// "unreachable" and "failed".
impl From<DbError> for RepositoryError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { id } => RepositoryError::NotFound { id },
            DbError::ConnectionFailed(_) | DbError::PoolExhausted => {
                RepositoryError::connection(err.to_string())
            }
            other => RepositoryError::query(other.to_string()),
        }
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_port_not_found() {
        let err: RepositoryError = DbError::not_found("abc").into();
        assert!(matches!(err, RepositoryError::NotFound { ref id } if id == "abc"));
    }

    #[test]
    fn test_pool_errors_map_to_connection() {
        let err: RepositoryError = DbError::PoolExhausted.into();
        assert!(matches!(err, RepositoryError::Connection { .. }));

        let err: RepositoryError = DbError::from(sqlx::Error::PoolClosed).into();
        assert!(matches!(err, RepositoryError::Connection { .. }));
    }

    #[test]
    fn test_other_errors_map_to_query() {
        let err: RepositoryError = DbError::UniqueViolation {
            column: "pos.id".to_string(),
        }
        .into();
        assert!(matches!(err, RepositoryError::Query { .. }));
        assert_eq!(
            err.to_string(),
            "POS repository query failed: Duplicate value for pos.id"
        );

        let err: RepositoryError = DbError::from(sqlx::Error::RowNotFound).into();
        assert!(matches!(err, RepositoryError::Query { .. }));
    }
}
