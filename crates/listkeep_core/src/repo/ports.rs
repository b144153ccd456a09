//! Store contracts consumed by the association engine.
//!
//! # Responsibility
//! - Describe list, item and association persistence without naming a
//!   storage technology.
//! - Describe the transaction boundary the service facade runs inside.
//!
//! # Invariants
//! - Every owner-scoped lookup treats "exists under another owner" exactly
//!   like "does not exist".
//! - Mutations report affected row counts; interpreting them is the
//!   engine's job.

use crate::model::association::{Association, AssociationKey};
use crate::model::item::{Item, ItemId, NewItem};
use crate::model::list::{List, ListId, NewList};
use crate::repo::error::{RepoError, RepoResult};
use std::collections::BTreeSet;

/// Persistence contract for lists.
pub trait ListStore {
    /// Inserts one list owned by `owner` and returns the stored record.
    fn create(&self, owner: &str, list: &NewList) -> RepoResult<List>;
    /// Loads one list when it exists and belongs to `owner`.
    fn find_by_owner_and_id(&self, id: ListId, owner: &str) -> RepoResult<Option<List>>;
    /// Loads every list in `ids` that belongs to `owner`.
    fn find_by_owner_and_ids(&self, ids: &BTreeSet<ListId>, owner: &str)
        -> RepoResult<Vec<List>>;
    /// Loads all lists of one owner sorted by name.
    fn find_all_by_owner(&self, owner: &str) -> RepoResult<Vec<List>>;
    /// Returns the subset of `ids` that is absent or owned by someone else.
    fn ids_not_found(&self, ids: &BTreeSet<ListId>, owner: &str) -> RepoResult<BTreeSet<ListId>>;
    /// Writes mutable fields of `list`, stamping `actor` as the updater.
    fn update(&self, list: &List, actor: &str) -> RepoResult<u64>;
    fn delete(&self, id: ListId) -> RepoResult<u64>;
    fn delete_all(&self) -> RepoResult<u64>;
}

/// Persistence contract for items. Mirrors `ListStore`.
pub trait ItemStore {
    fn create(&self, owner: &str, item: &NewItem) -> RepoResult<Item>;
    fn find_by_owner_and_id(&self, id: ItemId, owner: &str) -> RepoResult<Option<Item>>;
    fn find_by_owner_and_ids(&self, ids: &BTreeSet<ItemId>, owner: &str)
        -> RepoResult<Vec<Item>>;
    fn find_all_by_owner(&self, owner: &str) -> RepoResult<Vec<Item>>;
    fn ids_not_found(&self, ids: &BTreeSet<ItemId>, owner: &str) -> RepoResult<BTreeSet<ItemId>>;
    fn update(&self, item: &Item, actor: &str) -> RepoResult<u64>;
    fn delete(&self, id: ItemId) -> RepoResult<u64>;
    fn delete_all(&self) -> RepoResult<u64>;
}

/// Persistence contract for list/item associations.
pub trait AssociationStore {
    /// Inserts every pair in one statement.
    ///
    /// Returns one record per inserted row. A result shorter than `pairs`
    /// means storage dropped rows; callers must treat that as a defect.
    fn create_many(&self, pairs: &BTreeSet<AssociationKey>) -> RepoResult<Vec<Association>>;
    /// Deletes one pair. Expected result is 0 or 1.
    fn delete_one(&self, list_id: ListId, item_id: ItemId) -> RepoResult<u64>;
    fn delete_all_for_list(&self, list_id: ListId) -> RepoResult<u64>;
    fn delete_all_for_item(&self, item_id: ItemId) -> RepoResult<u64>;
    /// Deletes every association regardless of owner.
    fn delete_all(&self) -> RepoResult<u64>;
    fn find_one(&self, list_id: ListId, item_id: ItemId) -> RepoResult<Option<Association>>;
    fn find_all_for_list(&self, list_id: ListId) -> RepoResult<Vec<Association>>;
    fn find_all_for_item(&self, item_id: ItemId) -> RepoResult<Vec<Association>>;
    /// Re-points one association from `from_list_id` to `to_list_id`.
    fn update_list_id(
        &self,
        item_id: ItemId,
        from_list_id: ListId,
        to_list_id: ListId,
    ) -> RepoResult<u64>;
    /// Writes quantity and visibility of an existing association.
    fn update_settings(&self, association: &Association) -> RepoResult<u64>;
    fn count_for_list(&self, list_id: ListId) -> RepoResult<u64>;
    fn count_for_item(&self, item_id: ItemId) -> RepoResult<u64>;
}

/// Store handles valid for the duration of one transaction.
#[derive(Clone, Copy)]
pub struct Stores<'s> {
    pub lists: &'s dyn ListStore,
    pub items: &'s dyn ItemStore,
    pub associations: &'s dyn AssociationStore,
}

/// Transaction boundary for service-level operations.
pub trait Storage {
    /// Runs `work` inside one storage transaction.
    ///
    /// `Ok` commits, `Err` rolls back. Failures to begin or commit are
    /// converted through `From<RepoError>`.
    fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        E: From<RepoError>,
        F: FnOnce(Stores<'_>) -> Result<T, E>;
}
