use super::outcome::{
    bulk_removed_message, removed_message, BulkRemoval, Outcome, RemovedAssociation,
};
use super::{AssociationEngine, AssociationError, EngineResult};
use crate::model::component::Succinct;
use crate::model::item::ItemId;
use crate::model::list::ListId;
use log::{error, info, warn};

impl AssociationEngine<'_> {
    /// Removes one item from one list.
    ///
    /// # Errors
    /// - `ItemNotFound` / `ListNotFound` / `AssociationNotFound` when the
    ///   owner-scoped lookups fail.
    /// - `InconsistentState` when the association was found but the delete
    ///   removed nothing (a concurrent writer got there first).
    /// - `MultipleAssociations` when more than one row was removed; the
    ///   enclosing transaction must roll back.
    pub fn delete_one(
        &self,
        item_id: ItemId,
        list_id: ListId,
        owner: &str,
    ) -> EngineResult<Outcome<RemovedAssociation>> {
        let item = self.require_item(item_id, owner)?;
        let list = self.require_list(list_id, owner)?;

        if self
            .stores
            .associations
            .find_one(list_id, item_id)?
            .is_none()
        {
            warn!(
                "event=association_delete module=engine status=not_found item_id={item_id} list_id={list_id}"
            );
            return Err(AssociationError::AssociationNotFound { item_id, list_id });
        }

        match self.stores.associations.delete_one(list_id, item_id)? {
            1 => {}
            0 => {
                error!(
                    "event=association_delete module=engine status=error error_code=inconsistent_state item_id={item_id} list_id={list_id}"
                );
                return Err(AssociationError::InconsistentState {
                    item_id,
                    list_id,
                    operation: "delete",
                });
            }
            affected => {
                error!(
                    "event=association_delete module=engine status=error error_code=multiple_associations item_id={item_id} list_id={list_id} affected={affected}"
                );
                return Err(AssociationError::MultipleAssociations {
                    item_id,
                    list_id,
                    affected,
                });
            }
        }

        info!("event=association_delete module=engine status=ok item_id={item_id} list_id={list_id}");
        let message = removed_message(&item.name, &list.name);
        Ok(Outcome::new(
            RemovedAssociation {
                item_name: item.name,
                list_name: list.name,
            },
            message,
        ))
    }

    /// Removes an item from every list it belongs to. Zero rows is success.
    pub fn delete_all_for_item(
        &self,
        item_id: ItemId,
        owner: &str,
    ) -> EngineResult<Outcome<BulkRemoval>> {
        let item = self.require_item(item_id, owner)?;
        let deleted_count = self.stores.associations.delete_all_for_item(item_id)?;
        info!(
            "event=association_bulk_delete module=engine status=ok side=item item_id={item_id} deleted={deleted_count}"
        );

        let component = Succinct::from(&item);
        let message = bulk_removed_message(&component, deleted_count);
        Ok(Outcome::new(
            BulkRemoval {
                component,
                deleted_count,
            },
            message,
        ))
    }

    /// Empties a list. Zero rows is success.
    pub fn delete_all_for_list(
        &self,
        list_id: ListId,
        owner: &str,
    ) -> EngineResult<Outcome<BulkRemoval>> {
        let list = self.require_list(list_id, owner)?;
        let deleted_count = self.stores.associations.delete_all_for_list(list_id)?;
        info!(
            "event=association_bulk_delete module=engine status=ok side=list list_id={list_id} deleted={deleted_count}"
        );

        let component = Succinct::from(&list);
        let message = bulk_removed_message(&component, deleted_count);
        Ok(Outcome::new(
            BulkRemoval {
                component,
                deleted_count,
            },
            message,
        ))
    }

    /// Deletes every association of every owner.
    ///
    /// Only `MaintenanceService` calls this.
    pub(crate) fn purge_all(&self) -> EngineResult<u64> {
        let deleted = self.stores.associations.delete_all()?;
        warn!("event=association_purge module=engine status=ok deleted={deleted}");
        Ok(deleted)
    }
}
