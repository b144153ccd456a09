//! Association engine.
//!
//! # Responsibility
//! - Create, delete, move and count list/item associations over the ports.
//! - Enforce owner scoping and the ownership-consistency invariant.
//! - Translate storage failures into `AssociationError`.
//!
//! # Invariants
//! - Every operation resolves the entities it touches, under the caller's
//!   owner, before it mutates anything.
//! - Row counts reported by storage are checked, never assumed.
//! - The engine holds no state between calls and opens no transactions;
//!   the service facade supplies the transaction the stores run in.

mod contents;
mod count;
mod create;
mod delete;
pub mod error;
pub mod outcome;
mod relocate;

pub use error::{AssociationError, EngineResult, ErrorKind};
pub use outcome::{
    BulkRemoval, CreatedAssociations, ListEntry, MovedItem, Outcome, RemovedAssociation,
};

use crate::model::item::{Item, ItemId};
use crate::model::list::{List, ListId};
use crate::repo::ports::Stores;
use log::warn;

/// Association operations over one set of store handles.
pub struct AssociationEngine<'s> {
    stores: Stores<'s>,
}

impl<'s> AssociationEngine<'s> {
    pub fn new(stores: Stores<'s>) -> Self {
        Self { stores }
    }

    fn require_item(&self, item_id: ItemId, owner: &str) -> EngineResult<Item> {
        match self.stores.items.find_by_owner_and_id(item_id, owner)? {
            Some(item) => Ok(item),
            None => {
                warn!("event=entity_lookup module=engine status=not_found kind=item item_id={item_id}");
                Err(AssociationError::ItemNotFound(item_id))
            }
        }
    }

    fn require_list(&self, list_id: ListId, owner: &str) -> EngineResult<List> {
        match self.stores.lists.find_by_owner_and_id(list_id, owner)? {
            Some(list) => Ok(list),
            None => {
                warn!("event=entity_lookup module=engine status=not_found kind=list list_id={list_id}");
                Err(AssociationError::ListNotFound(list_id))
            }
        }
    }
}
