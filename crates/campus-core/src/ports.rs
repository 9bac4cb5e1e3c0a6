//! # Persistence Port
//!
//! The storage abstraction [`crate::service::PosService`] depends on.
//!
//! campus-core only declares the contract; adapters (the SQLite repository in
//! campus-db, fakes in tests) live outside the domain.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PosRepository                                                          │
//! │                                                                         │
//! │  insert / insert_all     NewPos → Pos        id assigned by adapter     │
//! │  update_by_id/update_all PosChange → Pos     NotFound if id absent      │
//! │  find_by_id / by_name    → Option<Pos>       name: earliest insert wins │
//! │  list_all                → Vec<Pos>          insertion order            │
//! │  delete_all              → u64               idempotent                 │
//! │  gate                    → Arc<RwLock<()>>   one per store              │
//! │                                                                         │
//! │  *_all variants are atomic: every element is written, or none is.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::RepositoryResult;
use crate::types::{NewPos, Pos, PosChange};

#[async_trait]
pub trait PosRepository: Send + Sync {
    /// Inserts one POS and returns it with its new id.
    async fn insert(&self, draft: &NewPos) -> RepositoryResult<Pos>;

    /// Inserts a batch atomically, returning records in input order.
    async fn insert_all(&self, drafts: &[NewPos]) -> RepositoryResult<Vec<Pos>>;

    /// Overwrites the mutable fields of an existing POS.
    ///
    /// Fails with `RepositoryError::NotFound` when the id is absent.
    async fn update_by_id(&self, change: &PosChange) -> RepositoryResult<Pos>;

    /// Applies a batch of overwrites atomically, returning records in input
    /// order. One absent id rolls back the whole batch.
    async fn update_all(&self, changes: &[PosChange]) -> RepositoryResult<Vec<Pos>>;

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Pos>>;

    /// Finds a POS by name. With duplicate names the earliest inserted wins.
    async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Pos>>;

    /// Lists every POS in insertion order.
    async fn list_all(&self) -> RepositoryResult<Vec<Pos>>;

    /// Removes every POS, returning how many were removed.
    async fn delete_all(&self) -> RepositoryResult<u64>;

    /// The reader/writer lock for the store behind this handle.
    ///
    /// Every handle onto the same store must hand out the same lock, so
    /// services built from different handles still exclude each other.
    fn gate(&self) -> Arc<RwLock<()>>;
}
