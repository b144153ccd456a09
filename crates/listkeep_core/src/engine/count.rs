use super::{AssociationEngine, EngineResult};
use crate::model::item::ItemId;
use crate::model::list::ListId;

impl AssociationEngine<'_> {
    /// Number of lists the item belongs to.
    pub fn count_for_item(&self, item_id: ItemId, owner: &str) -> EngineResult<u64> {
        self.require_item(item_id, owner)?;
        Ok(self.stores.associations.count_for_item(item_id)?)
    }

    /// Number of items in the list, suppressed ones included.
    pub fn count_for_list(&self, list_id: ListId, owner: &str) -> EngineResult<u64> {
        self.require_list(list_id, owner)?;
        Ok(self.stores.associations.count_for_list(list_id)?)
    }
}
