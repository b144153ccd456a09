use super::outcome::{assigned_message, CreatedAssociations, Outcome};
use super::{AssociationEngine, AssociationError, EngineResult};
use crate::model::association::{Association, AssociationKey};
use crate::model::component::{by_display_name, Succinct};
use crate::model::item::ItemId;
use crate::model::list::ListId;
use crate::model::ownership::same_owner;
use log::{error, info, warn};
use std::collections::BTreeSet;

impl AssociationEngine<'_> {
    /// Associates one item with every list in `list_ids`.
    ///
    /// All-or-nothing: either one row per distinct list id is created or the
    /// call fails and nothing is written.
    pub fn create_for_item(
        &self,
        item_id: ItemId,
        owner: &str,
        list_ids: &[ListId],
    ) -> EngineResult<Outcome<CreatedAssociations>> {
        let requested: BTreeSet<ListId> = list_ids.iter().copied().collect();
        if requested.is_empty() {
            return Err(AssociationError::EmptySelection);
        }

        let item = self.require_item(item_id, owner)?;

        let missing = self.stores.lists.ids_not_found(&requested, owner)?;
        if !missing.is_empty() {
            warn!(
                "event=association_create module=engine status=not_found side=item item_id={item_id} missing={}",
                missing.len()
            );
            return Err(AssociationError::ListsNotFound(missing.into_iter().collect()));
        }

        let lists = self.stores.lists.find_by_owner_and_ids(&requested, owner)?;
        let unusable: Vec<ListId> = requested
            .iter()
            .copied()
            .filter(|id| {
                !lists
                    .iter()
                    .any(|list| list.id == *id && same_owner(list, &item))
            })
            .collect();
        if !unusable.is_empty() {
            return Err(AssociationError::ListsNotFound(unusable));
        }

        let pairs: BTreeSet<AssociationKey> = lists
            .iter()
            .map(|list| AssociationKey::new(list.id, item.id))
            .collect();
        self.insert_pairs(&pairs)?;

        let component = Succinct::from(&item);
        let mut associated: Vec<Succinct> = lists.iter().map(Succinct::from).collect();
        associated.sort_by(by_display_name);
        info!(
            "event=association_create module=engine status=ok side=item item_id={item_id} created={}",
            pairs.len()
        );

        let message = assigned_message(&component, &associated);
        Ok(Outcome::new(
            CreatedAssociations {
                component,
                associated,
            },
            message,
        ))
    }

    /// Associates one list with every item in `item_ids`. Mirror of
    /// `create_for_item`.
    pub fn create_for_list(
        &self,
        list_id: ListId,
        owner: &str,
        item_ids: &[ItemId],
    ) -> EngineResult<Outcome<CreatedAssociations>> {
        let requested: BTreeSet<ItemId> = item_ids.iter().copied().collect();
        if requested.is_empty() {
            return Err(AssociationError::EmptySelection);
        }

        let list = self.require_list(list_id, owner)?;

        let missing = self.stores.items.ids_not_found(&requested, owner)?;
        if !missing.is_empty() {
            warn!(
                "event=association_create module=engine status=not_found side=list list_id={list_id} missing={}",
                missing.len()
            );
            return Err(AssociationError::ItemsNotFound(missing.into_iter().collect()));
        }

        let items = self.stores.items.find_by_owner_and_ids(&requested, owner)?;
        let unusable: Vec<ItemId> = requested
            .iter()
            .copied()
            .filter(|id| {
                !items
                    .iter()
                    .any(|item| item.id == *id && same_owner(item, &list))
            })
            .collect();
        if !unusable.is_empty() {
            return Err(AssociationError::ItemsNotFound(unusable));
        }

        let pairs: BTreeSet<AssociationKey> = items
            .iter()
            .map(|item| AssociationKey::new(list.id, item.id))
            .collect();
        self.insert_pairs(&pairs)?;

        let component = Succinct::from(&list);
        let mut associated: Vec<Succinct> = items.iter().map(Succinct::from).collect();
        associated.sort_by(by_display_name);
        info!(
            "event=association_create module=engine status=ok side=list list_id={list_id} created={}",
            pairs.len()
        );

        let message = assigned_message(&component, &associated);
        Ok(Outcome::new(
            CreatedAssociations {
                component,
                associated,
            },
            message,
        ))
    }

    fn insert_pairs(&self, pairs: &BTreeSet<AssociationKey>) -> EngineResult<Vec<Association>> {
        let created = self
            .stores
            .associations
            .create_many(pairs)
            .map_err(|err| {
                let err = AssociationError::from_write(err);
                warn!(
                    "event=association_create module=engine status=error error_kind={:?} requested={}",
                    err.kind(),
                    pairs.len()
                );
                err
            })?;

        if created.len() != pairs.len() {
            error!(
                "event=association_create module=engine status=error error_code=count_mismatch expected={} actual={}",
                pairs.len(),
                created.len()
            );
            return Err(AssociationError::Mismatch {
                expected: pairs.len(),
                actual: created.len(),
            });
        }

        Ok(created)
    }
}
