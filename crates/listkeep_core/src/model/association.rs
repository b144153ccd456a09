//! List/item association record.
//!
//! # Invariants
//! - `(list_id, item_id)` is unique in storage.
//! - Both ends share one owner; storage and engine both enforce this.

use crate::model::item::ItemId;
use crate::model::list::ListId;
use serde::{Deserialize, Serialize};

/// Composite key addressing one association row.
///
/// Ordered by list first so bulk inserts are deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssociationKey {
    pub list_id: ListId,
    pub item_id: ItemId,
}

impl AssociationKey {
    pub fn new(list_id: ListId, item_id: ItemId) -> Self {
        Self { list_id, item_id }
    }
}

/// Persisted association with its per-pair settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    pub list_id: ListId,
    pub item_id: ItemId,
    pub quantity: u32,
    /// Hidden from the list's default view, still counted.
    #[serde(rename = "suppressed")]
    pub is_suppressed: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Association {
    pub fn key(&self) -> AssociationKey {
        AssociationKey::new(self.list_id, self.item_id)
    }

    /// Applies per-pair setting changes in place.
    pub fn apply(&mut self, patch: &AssociationPatch) {
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(is_suppressed) = patch.is_suppressed {
            self.is_suppressed = is_suppressed;
        }
    }
}

/// Typed partial update for association settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssociationPatch {
    pub quantity: Option<u32>,
    pub is_suppressed: Option<bool>,
}

impl AssociationPatch {
    pub fn is_empty(&self) -> bool {
        self.quantity.is_none() && self.is_suppressed.is_none()
    }
}
