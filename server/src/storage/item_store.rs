//! In-memory item store.
//!
//! # Thread Safety
//!
//! The store keeps its map and ID counter behind a single `RwLock`:
//! - Fetches and listings take the read lock and may run concurrently
//! - Inserts and deletes take the write lock
//!
//! # Invariants
//!
//! - Every stored item's `id` equals its key
//! - IDs are assigned as `last_id + 1` and are never reused, even after
//!   `delete` or `delete_all`

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::types::{Item, ItemId};

/// Errors returned by item store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No item with the given ID exists.
    NotFound(ItemId),
    /// A thread panicked while holding the store lock.
    LockPoisoned,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "no such item (id = {id})"),
            Self::LockPoisoned => write!(f, "item store lock poisoned"),
        }
    }
}

impl std::error::Error for StoreError {}

#[derive(Debug, Default)]
struct StoreState {
    items: BTreeMap<ItemId, Item>,
    /// Last ID handed out. Zero means nothing has been inserted yet.
    last_id: ItemId,
}

/// The authoritative set of items for the lifetime of the process.
#[derive(Debug, Default)]
pub struct ItemStore {
    state: RwLock<StoreState>,
}

impl ItemStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>, StoreError> {
        self.state.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>, StoreError> {
        self.state.write().map_err(|_| StoreError::LockPoisoned)
    }

    /// Insert a new item and return its freshly assigned ID.
    ///
    /// # Post-conditions
    ///
    /// - The returned ID is one greater than the previously assigned ID
    pub fn insert(&self, info: String) -> Result<ItemId, StoreError> {
        let mut state = self.write()?;
        let id = state.last_id.next();
        state.last_id = id;
        state.items.insert(id, Item::new(id, info));
        drop(state);

        tracing::debug!("inserted item {id}");
        Ok(id)
    }

    /// Fetch an item by ID.
    pub fn get(&self, id: ItemId) -> Result<Item, StoreError> {
        self.read()?
            .items
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    /// Find an item whose `info` equals `info` exactly.
    ///
    /// When several items match, the one with the lowest ID wins.
    pub fn find_by_info(&self, info: &str) -> Result<Option<Item>, StoreError> {
        Ok(self
            .read()?
            .items
            .values()
            .find(|item| item.info == info)
            .cloned())
    }

    /// Remove an item by ID.
    pub fn delete(&self, id: ItemId) -> Result<(), StoreError> {
        let removed = self.write()?.items.remove(&id);
        match removed {
            Some(_) => {
                tracing::debug!("deleted item {id}");
                Ok(())
            }
            None => Err(StoreError::NotFound(id)),
        }
    }

    /// Remove every item.
    ///
    /// The ID counter is left alone, so later inserts keep counting up from
    /// the last ID handed out.
    pub fn delete_all(&self) -> Result<(), StoreError> {
        let mut state = self.write()?;
        let removed = state.items.len();
        state.items.clear();
        drop(state);

        tracing::debug!("deleted all items ({removed} removed)");
        Ok(())
    }

    /// Snapshot of every item, ordered by ascending ID.
    pub fn list_all(&self) -> Result<Vec<Item>, StoreError> {
        Ok(self.read()?.items.values().cloned().collect())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.items.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.read()?.items.is_empty())
    }
}
