//! # Shared State
//!
//! The single synchronization boundary around the whole [`Snapshot`].
//!
//! ## Transaction Model
//!
//! ```text
//! begin()  -> lock snapshot, clone a draft
//! mutate   -> caller edits the draft only
//! commit() -> save(draft) -> on Ok, draft replaces the snapshot
//! drop     -> uncommitted draft is discarded (rollback)
//! ```
//!
//! The lock is held from `begin()` until commit or drop, so two purchases of
//! the same item can never interleave, and a failed save never leaves a
//! half-applied mutation in memory.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::model::Snapshot;
use crate::store::{PersistentStore, StoreError, StoreResult};

/// Owned application state plus the store it is persisted to.
pub struct SharedState {
    /// Committed state. Only replaced by a successful commit.
    current: Mutex<Snapshot>,
    /// Durability boundary.
    store: Arc<dyn PersistentStore>,
}

impl SharedState {
    /// Loads state from the store, or uses `seed` if nothing was saved yet.
    ///
    /// The seed is not written until the first committed mutation.
    ///
    /// # Errors
    ///
    /// Returns error if the store holds data that cannot be read.
    pub fn open(store: Arc<dyn PersistentStore>, seed: impl FnOnce() -> Snapshot) -> StoreResult<Self> {
        let snapshot = match store.load()? {
            Some(snapshot) => {
                tracing::info!(
                    users = snapshot.users.len(),
                    items = snapshot.items.len(),
                    reports = snapshot.reports.len(),
                    "restored saved state"
                );
                snapshot
            }
            None => {
                tracing::info!("no saved state, starting fresh");
                seed()
            }
        };

        Ok(Self {
            current: Mutex::new(snapshot),
            store,
        })
    }

    /// Runs a read-only closure against the committed state.
    pub fn read<R>(&self, f: impl FnOnce(&Snapshot) -> R) -> R {
        f(&self.current.lock())
    }

    /// Returns a copy of the committed state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.current.lock().clone()
    }

    /// Begins a transaction. Blocks until no other transaction is open.
    pub fn begin(&self) -> Transaction<'_> {
        let guard = self.current.lock();
        let draft = guard.clone();
        Transaction {
            guard,
            draft,
            store: self.store.as_ref(),
        }
    }

    /// Applies `f` to a draft and commits it if `f` succeeds.
    ///
    /// # Errors
    ///
    /// Returns the closure's error, or the store's error converted into `E`.
    /// In both cases the committed state is unchanged.
    pub fn transact<T, E>(&self, f: impl FnOnce(&mut Snapshot) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let mut txn = self.begin();
        let value = f(txn.draft_mut())?;
        txn.commit()?;
        Ok(value)
    }
}

/// An open transaction. Holds the state lock until committed or dropped.
pub struct Transaction<'a> {
    /// Lock on the committed state.
    guard: MutexGuard<'a, Snapshot>,
    /// Working copy.
    draft: Snapshot,
    /// Where the draft is saved on commit.
    store: &'a dyn PersistentStore,
}

impl Transaction<'_> {
    /// Returns the working copy.
    #[must_use]
    pub fn draft(&self) -> &Snapshot {
        &self.draft
    }

    /// Returns the working copy for mutation.
    pub fn draft_mut(&mut self) -> &mut Snapshot {
        &mut self.draft
    }

    /// Saves the draft and makes it the committed state.
    ///
    /// # Errors
    ///
    /// Returns error if the store rejects the write; the draft is discarded.
    pub fn commit(mut self) -> StoreResult<()> {
        if let Err(e) = self.store.save(&self.draft) {
            tracing::warn!(error = %e, "save failed, transaction rolled back");
            return Err(e);
        }
        *self.guard = std::mem::take(&mut self.draft);
        Ok(())
    }
}
