//! # Error Types
//!
//! Domain-specific error types for campus-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  campus-core errors (this file)                                        │
//! │  ├── PosError          - What PosService callers see                   │
//! │  ├── ValidationError   - Input validation failures                     │
//! │  └── RepositoryError   - Persistence port failures                     │
//! │                                                                         │
//! │  campus-db errors (separate crate)                                     │
//! │  └── DbError           - SQLite operation failures                     │
//! │                                                                         │
//! │  Flow: DbError → RepositoryError → PosError::Storage → transport       │
//! │        ValidationError → PosError::Validation { index } → transport    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Batch errors carry the index of the offending element
//! 3. Errors are enum variants, never String
//! 4. Storage failures are wrapped, never swallowed

use thiserror::Error;

use crate::types::PosTarget;

// =============================================================================
// POS Error
// =============================================================================

/// Errors returned by [`crate::service::PosService`].
///
/// Receiving any of these means nothing from the batch was persisted.
#[derive(Debug, Error)]
pub enum PosError {
    /// A batch element failed validation.
    ///
    /// ## When This Occurs
    /// - A required field is missing or blank
    /// - `type` or `campus` is outside its closed set
    /// - `postalCode` is not a valid postal code
    #[error("POS #{index} is invalid: {source}")]
    Validation {
        index: usize,
        #[source]
        source: ValidationError,
    },

    /// The POS an update refers to does not exist.
    ///
    /// ## User Workflow
    /// ```text
    /// update_pos([{ name: "Kaffeebar", ... }])
    ///      │
    ///      ▼
    /// find_by_name("Kaffeebar") → None
    ///      │
    ///      ▼
    /// NotFound { index: 0, target: Name("Kaffeebar") }
    /// ```
    #[error("POS #{index} not found: no POS with {target}")]
    NotFound { index: usize, target: PosTarget },

    /// The persistence port failed.
    #[error("Storage error: {0}")]
    Storage(#[from] RepositoryError),
}

impl PosError {
    /// Returns the batch index this error refers to, if any.
    pub fn index(&self) -> Option<usize> {
        match self {
            PosError::Validation { index, .. } | PosError::NotFound { index, .. } => Some(*index),
            PosError::Storage(_) => None,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Raised before anything reaches storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., postal code that is not a number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Returns the name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotAllowed { field, .. } => field,
        }
    }
}

// =============================================================================
// Repository Error
// =============================================================================

/// Errors raised by implementations of [`crate::ports::PosRepository`].
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No POS with this id exists.
    #[error("POS not found: {id}")]
    NotFound { id: String },

    /// The store could not be reached.
    #[error("POS repository connection failed: {message}")]
    Connection { message: String },

    /// A query or mutation failed while executing.
    #[error("POS repository query failed: {message}")]
    Query { message: String },
}

impl RepositoryError {
    /// Creates a NotFound error for the given id.
    pub fn not_found(id: impl Into<String>) -> Self {
        RepositoryError::NotFound { id: id.into() }
    }

    /// Creates a Connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        RepositoryError::Connection {
            message: message.into(),
        }
    }

    /// Creates a Query error.
    pub fn query(message: impl Into<String>) -> Self {
        RepositoryError::Query {
            message: message.into(),
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with PosError.
pub type PosResult<T> = Result<T, PosError>;

/// Result type for persistence port operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

// =============================================================================
// Unit Tests
// =============================================================================
