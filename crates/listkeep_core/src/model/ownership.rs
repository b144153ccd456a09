//! Ownership consistency checks.
//!
//! Predicates only: callers decide how a mismatch is reported.

use crate::model::association::{Association, AssociationKey};
use crate::model::item::Item;
use crate::model::list::List;

/// Anything scoped to a single owning principal.
pub trait Owned {
    fn owner(&self) -> &str;
}

impl Owned for List {
    fn owner(&self) -> &str {
        &self.owner
    }
}

impl Owned for Item {
    fn owner(&self) -> &str {
        &self.owner
    }
}

/// Returns whether both entities belong to the same principal.
pub fn same_owner(left: &impl Owned, right: &impl Owned) -> bool {
    left.owner() == right.owner()
}

/// Returns whether `association` links exactly `list` and `item` and both
/// ends share one owner.
pub fn association_consistent(list: &List, item: &Item, association: &Association) -> bool {
    association.key() == AssociationKey::new(list.id, item.id) && same_owner(list, item)
}
