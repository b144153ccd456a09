use super::outcome::{ListEntry, Outcome};
use super::{AssociationEngine, AssociationError, EngineResult};
use crate::model::association::{Association, AssociationPatch};
use crate::model::component::{by_display_name, Succinct};
use crate::model::item::ItemId;
use crate::model::list::ListId;
use crate::model::ownership::association_consistent;
use log::{error, info};
use std::collections::{BTreeSet, HashMap};

impl AssociationEngine<'_> {
    /// Changes quantity and/or visibility of one association.
    pub fn update_association(
        &self,
        item_id: ItemId,
        list_id: ListId,
        owner: &str,
        patch: &AssociationPatch,
    ) -> EngineResult<Outcome<Association>> {
        let item = self.require_item(item_id, owner)?;
        let list = self.require_list(list_id, owner)?;
        let mut association = self
            .stores
            .associations
            .find_one(list_id, item_id)?
            .ok_or(AssociationError::AssociationNotFound { item_id, list_id })?;
        if !association_consistent(&list, &item, &association) {
            return Err(AssociationError::AssociationNotFound { item_id, list_id });
        }

        if patch.is_empty() {
            return Ok(Outcome::new(
                association,
                format!("No changes for item '{}' in list '{}'", item.name, list.name),
            ));
        }

        association.apply(patch);
        match self.stores.associations.update_settings(&association)? {
            1 => {}
            0 => {
                error!(
                    "event=association_update module=engine status=error error_code=inconsistent_state item_id={item_id} list_id={list_id}"
                );
                return Err(AssociationError::InconsistentState {
                    item_id,
                    list_id,
                    operation: "update",
                });
            }
            affected => {
                return Err(AssociationError::MultipleAssociations {
                    item_id,
                    list_id,
                    affected,
                });
            }
        }

        let updated = self
            .stores
            .associations
            .find_one(list_id, item_id)?
            .ok_or(AssociationError::InconsistentState {
                item_id,
                list_id,
                operation: "update read-back",
            })?;
        info!("event=association_update module=engine status=ok item_id={item_id} list_id={list_id}");
        Ok(Outcome::new(
            updated,
            format!("Updated item '{}' in list '{}'", item.name, list.name),
        ))
    }

    /// Items of a list with their per-list settings, sorted by item name.
    pub fn list_contents(&self, list_id: ListId, owner: &str) -> EngineResult<Vec<ListEntry>> {
        self.require_list(list_id, owner)?;
        let associations = self.stores.associations.find_all_for_list(list_id)?;
        let ids: BTreeSet<ItemId> = associations.iter().map(|a| a.item_id).collect();
        let items: HashMap<ItemId, Succinct> = self
            .stores
            .items
            .find_by_owner_and_ids(&ids, owner)?
            .iter()
            .map(|item| (item.id, Succinct::from(item)))
            .collect();

        let mut entries = Vec::with_capacity(associations.len());
        for association in associations {
            let item = items.get(&association.item_id).cloned().ok_or(
                AssociationError::InconsistentState {
                    item_id: association.item_id,
                    list_id,
                    operation: "contents lookup",
                },
            )?;
            entries.push(ListEntry {
                item,
                quantity: association.quantity,
                suppressed: association.is_suppressed,
            });
        }
        entries.sort_by(|left, right| by_display_name(&left.item, &right.item));
        Ok(entries)
    }

    /// Lists an item belongs to, sorted by list name.
    pub fn lists_for_item(&self, item_id: ItemId, owner: &str) -> EngineResult<Vec<Succinct>> {
        self.require_item(item_id, owner)?;
        let ids: BTreeSet<ListId> = self
            .stores
            .associations
            .find_all_for_item(item_id)?
            .iter()
            .map(|a| a.list_id)
            .collect();
        let lists = self.stores.lists.find_by_owner_and_ids(&ids, owner)?;
        let found: BTreeSet<ListId> = lists.iter().map(|list| list.id).collect();
        if let Some(list_id) = ids.difference(&found).next().copied() {
            error!(
                "event=lists_for_item module=engine status=error error_code=inconsistent_state item_id={item_id} list_id={list_id}"
            );
            return Err(AssociationError::InconsistentState {
                item_id,
                list_id,
                operation: "lists lookup",
            });
        }

        let mut lists: Vec<Succinct> = lists.iter().map(Succinct::from).collect();
        lists.sort_by(by_display_name);
        Ok(lists)
    }
}
