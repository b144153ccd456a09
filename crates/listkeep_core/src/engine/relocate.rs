use super::outcome::{moved_message, MovedItem, Outcome};
use super::{AssociationEngine, AssociationError, EngineResult};
use crate::model::item::ItemId;
use crate::model::list::ListId;
use crate::model::ownership::same_owner;
use log::{debug, error, info, warn};

impl AssociationEngine<'_> {
    /// Moves an item from `current_list_id` to `destination_list_id`.
    ///
    /// Moving to the list the item is already in succeeds without changing
    /// anything but `updated_at`.
    ///
    /// # Errors
    /// - Lookup failures keep their not-found class and happen before any
    ///   write.
    /// - Failures of the write itself come back as `MoveFailed` wrapping the
    ///   translated cause.
    pub fn move_item(
        &self,
        item_id: ItemId,
        current_list_id: ListId,
        destination_list_id: ListId,
        owner: &str,
    ) -> EngineResult<Outcome<MovedItem>> {
        let item = self.require_item(item_id, owner)?;
        let current = self.require_list(current_list_id, owner)?;
        let destination = self.require_list(destination_list_id, owner)?;
        if !same_owner(&item, &destination) {
            return Err(AssociationError::ListNotFound(destination_list_id));
        }

        if self
            .stores
            .associations
            .find_one(current_list_id, item_id)?
            .is_none()
        {
            warn!(
                "event=association_move module=engine status=not_found item_id={item_id} list_id={current_list_id}"
            );
            return Err(AssociationError::AssociationNotFound {
                item_id,
                list_id: current_list_id,
            });
        }

        if current_list_id == destination_list_id {
            debug!("event=association_move module=engine status=noop item_id={item_id} list_id={current_list_id}");
        }

        self.relocate(item_id, current_list_id, destination_list_id)
            .map_err(|source| {
                error!(
                    "event=association_move module=engine status=error error_kind={:?} item_id={item_id} from={current_list_id} to={destination_list_id}",
                    source.kind()
                );
                AssociationError::MoveFailed {
                    item_id,
                    current_list_id,
                    destination_list_id,
                    source: Box::new(source),
                }
            })?;

        info!(
            "event=association_move module=engine status=ok item_id={item_id} from={current_list_id} to={destination_list_id}"
        );
        let moved = MovedItem {
            item_name: item.name,
            current_list_name: current.name,
            destination_list_name: destination.name,
        };
        let message = moved_message(&moved);
        Ok(Outcome::new(moved, message))
    }

    fn relocate(
        &self,
        item_id: ItemId,
        current_list_id: ListId,
        destination_list_id: ListId,
    ) -> EngineResult<()> {
        let affected = self
            .stores
            .associations
            .update_list_id(item_id, current_list_id, destination_list_id)
            .map_err(AssociationError::from_write)?;
        match affected {
            1 => Ok(()),
            0 => Err(AssociationError::InconsistentState {
                item_id,
                list_id: current_list_id,
                operation: "move",
            }),
            affected => Err(AssociationError::MultipleAssociations {
                item_id,
                list_id: current_list_id,
                affected,
            }),
        }
    }
}
