//! Association use-case service.
//!
//! # Responsibility
//! - Wrap each association engine operation in one storage transaction.
//!
//! # Invariants
//! - No retries: failures are reported to the caller as they happen.
//! - All operations are scoped to the `owner` argument.

use crate::engine::{
    AssociationEngine, BulkRemoval, CreatedAssociations, EngineResult, ListEntry, MovedItem,
    Outcome, RemovedAssociation,
};
use crate::model::association::{Association, AssociationPatch};
use crate::model::component::Succinct;
use crate::model::item::ItemId;
use crate::model::list::ListId;
use crate::repo::ports::Storage;

/// Association service facade over a transactional storage.
pub struct AssociationService<S: Storage> {
    storage: S,
}

impl<S: Storage> AssociationService<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Assigns one item to one or more lists.
    pub fn create_for_item(
        &self,
        item_id: ItemId,
        owner: &str,
        list_ids: &[ListId],
    ) -> EngineResult<Outcome<CreatedAssociations>> {
        self.storage.transaction(|stores| {
            AssociationEngine::new(stores).create_for_item(item_id, owner, list_ids)
        })
    }

    /// Assigns one or more items to one list.
    pub fn create_for_list(
        &self,
        list_id: ListId,
        owner: &str,
        item_ids: &[ItemId],
    ) -> EngineResult<Outcome<CreatedAssociations>> {
        self.storage.transaction(|stores| {
            AssociationEngine::new(stores).create_for_list(list_id, owner, item_ids)
        })
    }

    pub fn delete_one(
        &self,
        item_id: ItemId,
        list_id: ListId,
        owner: &str,
    ) -> EngineResult<Outcome<RemovedAssociation>> {
        self.storage
            .transaction(|stores| AssociationEngine::new(stores).delete_one(item_id, list_id, owner))
    }

    pub fn delete_all_for_item(
        &self,
        item_id: ItemId,
        owner: &str,
    ) -> EngineResult<Outcome<BulkRemoval>> {
        self.storage
            .transaction(|stores| AssociationEngine::new(stores).delete_all_for_item(item_id, owner))
    }

    pub fn delete_all_for_list(
        &self,
        list_id: ListId,
        owner: &str,
    ) -> EngineResult<Outcome<BulkRemoval>> {
        self.storage
            .transaction(|stores| AssociationEngine::new(stores).delete_all_for_list(list_id, owner))
    }

    pub fn move_item(
        &self,
        item_id: ItemId,
        current_list_id: ListId,
        destination_list_id: ListId,
        owner: &str,
    ) -> EngineResult<Outcome<MovedItem>> {
        self.storage.transaction(|stores| {
            AssociationEngine::new(stores).move_item(
                item_id,
                current_list_id,
                destination_list_id,
                owner,
            )
        })
    }

    pub fn count_for_item(&self, item_id: ItemId, owner: &str) -> EngineResult<u64> {
        self.storage
            .transaction(|stores| AssociationEngine::new(stores).count_for_item(item_id, owner))
    }

    pub fn count_for_list(&self, list_id: ListId, owner: &str) -> EngineResult<u64> {
        self.storage
            .transaction(|stores| AssociationEngine::new(stores).count_for_list(list_id, owner))
    }

    /// Applies quantity/visibility changes to one association.
    pub fn update_association(
        &self,
        item_id: ItemId,
        list_id: ListId,
        owner: &str,
        patch: AssociationPatch,
    ) -> EngineResult<Outcome<Association>> {
        self.storage.transaction(|stores| {
            AssociationEngine::new(stores).update_association(item_id, list_id, owner, &patch)
        })
    }

    pub fn set_quantity(
        &self,
        item_id: ItemId,
        list_id: ListId,
        owner: &str,
        quantity: u32,
    ) -> EngineResult<Outcome<Association>> {
        self.update_association(
            item_id,
            list_id,
            owner,
            AssociationPatch {
                quantity: Some(quantity),
                ..AssociationPatch::default()
            },
        )
    }

    pub fn set_suppressed(
        &self,
        item_id: ItemId,
        list_id: ListId,
        owner: &str,
        suppressed: bool,
    ) -> EngineResult<Outcome<Association>> {
        self.update_association(
            item_id,
            list_id,
            owner,
            AssociationPatch {
                is_suppressed: Some(suppressed),
                ..AssociationPatch::default()
            },
        )
    }

    /// Items of one list with per-list quantity and visibility.
    pub fn list_contents(&self, list_id: ListId, owner: &str) -> EngineResult<Vec<ListEntry>> {
        self.storage
            .transaction(|stores| AssociationEngine::new(stores).list_contents(list_id, owner))
    }

    pub fn lists_for_item(&self, item_id: ItemId, owner: &str) -> EngineResult<Vec<Succinct>> {
        self.storage
            .transaction(|stores| AssociationEngine::new(stores).lists_for_item(item_id, owner))
    }
}
