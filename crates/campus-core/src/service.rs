//! # POS Domain Service
//!
//! The only place where POS business rules live: validation, identity and
//! timestamp assignment, batch semantics and the clear barrier.
//!
//! ## Batch Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    create_pos / update_pos                              │
//! │                                                                         │
//! │  1. STAGE (no lock, no I/O)                                            │
//! │     └── validate every element → Vec<PosFields>                        │
//! │         └── first failure → PosError::Validation { index }             │
//! │                                                                         │
//! │  2. LOCK (exclusive)                                                   │
//! │     └── update only: resolve id / name → existing Pos                  │
//! │         └── absent → PosError::NotFound { index }                      │
//! │                                                                         │
//! │  3. COMMIT (one repository call, one transaction)                      │
//! │     └── insert_all / update_all → Vec<Pos> in input order              │
//! │                                                                         │
//! │  Nothing is written unless every element got through steps 1 and 2.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Locking
//! ```text
//! retrieve_pos, get_pos        → read   (shared)
//! create_pos, update_pos, clear → write (exclusive)
//! ```
//! The lock comes from the repository ([`PosRepository::gate`]), so every
//! service over the same store shares it, however many handles were built.
//! Mutations are serialized, so concurrent updates of the same POS are
//! last-committed-wins and the last committer always carries the largest
//! `updated_at`.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::{PosError, PosResult, RepositoryError};
use crate::ports::PosRepository;
use crate::types::{NewPos, Pos, PosChange, PosInput, PosTarget, PosUpdate};
use crate::validation::validate_pos_input;

/// Domain service for points of sale.
///
/// ## Usage
/// ```rust,ignore
/// let service = PosService::new(Arc::new(db.pos()));
///
/// let created = service.create_pos(vec![input]).await?;
/// let all = service.retrieve_pos().await?;
/// ```
pub struct PosService<R> {
    repo: Arc<R>,
    gate: Arc<RwLock<()>>,
}

impl<R> Clone for PosService<R> {
    fn clone(&self) -> Self {
        PosService {
            repo: Arc::clone(&self.repo),
            gate: Arc::clone(&self.gate),
        }
    }
}

impl<R> PosService<R>
where
    R: PosRepository,
{
    /// Creates a service on top of a repository.
    pub fn new(repo: Arc<R>) -> Self {
        let gate = repo.gate();
        PosService { repo, gate }
    }

    /// Creates a batch of POS.
    ///
    /// ## Returns
    /// * `Ok(Vec<Pos>)` - one record per input, same order
    /// * `Err(PosError::Validation)` - nothing was persisted
    /// * `Err(PosError::Storage)` - nothing was persisted
    pub async fn create_pos(&self, inputs: Vec<PosInput>) -> PosResult<Vec<Pos>> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let now = Utc::now();
        let drafts = inputs
            .iter()
            .enumerate()
            .map(|(index, input)| {
                validate_pos_input(input)
                    .map(|fields| NewPos {
                        fields,
                        created_at: now,
                    })
                    .map_err(|source| PosError::Validation { index, source })
            })
            .collect::<PosResult<Vec<_>>>()
            .inspect_err(|err| warn!(error = %err, "Rejected POS create batch"))?;

        let _guard = self.gate.write().await;

        debug!(count = drafts.len(), "Creating POS batch");
        let created = self.repo.insert_all(&drafts).await?;
        ensure_batch_len(drafts.len(), created.len())?;

        info!(count = created.len(), "Created POS batch");
        Ok(created)
    }

    /// Updates a batch of existing POS.
    ///
    /// Each element targets a POS by id, or by name when no id is given.
    /// Every field except `id` and `created_at` is overwritten.
    ///
    /// ## Returns
    /// * `Ok(Vec<Pos>)` - one record per input, same order
    /// * `Err(PosError::Validation)` - bad fields or no lookup key
    /// * `Err(PosError::NotFound)` - a target does not exist
    /// * `Err(PosError::Storage)` - the repository failed
    ///
    /// On any error the collection is unchanged.
    pub async fn update_pos(&self, updates: Vec<PosUpdate>) -> PosResult<Vec<Pos>> {
        if updates.is_empty() {
            return Ok(Vec::new());
        }

        let staged = updates
            .iter()
            .enumerate()
            .map(|(index, update)| {
                let target = update.target();
                target
                    .and_then(|target| validate_pos_input(&update.fields).map(|f| (target, f)))
                    .map_err(|source| PosError::Validation { index, source })
            })
            .collect::<PosResult<Vec<_>>>()
            .inspect_err(|err| warn!(error = %err, "Rejected POS update batch"))?;

        let _guard = self.gate.write().await;

        let now = Utc::now();
        // Latest updated_at per id within this batch, so repeated targets
        // still get strictly increasing timestamps.
        let mut last_written: HashMap<String, DateTime<Utc>> = HashMap::new();
        let mut changes = Vec::with_capacity(staged.len());

        for (index, (target, fields)) in staged.into_iter().enumerate() {
            let existing = self.resolve(&target).await?.ok_or_else(|| {
                warn!(index, target = %target, "POS update target not found");
                PosError::NotFound {
                    index,
                    target: target.clone(),
                }
            })?;

            let previous = last_written
                .get(&existing.id)
                .copied()
                .unwrap_or(existing.updated_at);
            let updated_at = next_timestamp(now, previous);
            last_written.insert(existing.id.clone(), updated_at);

            changes.push(PosChange {
                id: existing.id,
                fields,
                updated_at,
            });
        }

        debug!(count = changes.len(), "Updating POS batch");
        let updated = self.repo.update_all(&changes).await.map_err(|err| match err {
            RepositoryError::NotFound { id } => {
                let index = changes.iter().position(|c| c.id == id).unwrap_or(0);
                PosError::NotFound {
                    index,
                    target: PosTarget::Id(id),
                }
            }
            other => PosError::Storage(other),
        })?;
        ensure_batch_len(changes.len(), updated.len())?;

        info!(count = updated.len(), "Updated POS batch");
        Ok(updated)
    }

    /// Returns every POS in insertion order.
    pub async fn retrieve_pos(&self) -> PosResult<Vec<Pos>> {
        let _guard = self.gate.read().await;
        let all = self.repo.list_all().await?;
        debug!(count = all.len(), "Retrieved POS list");
        Ok(all)
    }

    /// Returns one POS by id.
    ///
    /// A miss is reported as `NotFound` with index 0.
    pub async fn get_pos(&self, id: &str) -> PosResult<Pos> {
        let _guard = self.gate.read().await;
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| PosError::NotFound {
                index: 0,
                target: PosTarget::Id(id.to_string()),
            })
    }

    /// Deletes every POS. Calling it on an empty collection is a no-op.
    pub async fn clear(&self) -> PosResult<()> {
        let _guard = self.gate.write().await;
        let removed = self.repo.delete_all().await?;
        info!(removed, "Cleared POS collection");
        Ok(())
    }

    async fn resolve(&self, target: &PosTarget) -> PosResult<Option<Pos>> {
        let found = match target {
            PosTarget::Id(id) => self.repo.find_by_id(id).await?,
            PosTarget::Name(name) => self.repo.find_by_name(name).await?,
        };
        Ok(found)
    }
}

/// Picks the `updated_at` for a write: `now`, or just after `previous` when
/// the clock has not moved past it.
fn next_timestamp(now: DateTime<Utc>, previous: DateTime<Utc>) -> DateTime<Utc> {
    let floor = previous + Duration::microseconds(1);
    if now >= floor {
        now
    } else {
        floor
    }
}

fn ensure_batch_len(expected: usize, actual: usize) -> PosResult<()> {
    if expected != actual {
        return Err(PosError::Storage(RepositoryError::query(format!(
            "repository returned {} records for a batch of {}",
            actual, expected
        ))));
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
