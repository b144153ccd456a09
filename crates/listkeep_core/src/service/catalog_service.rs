//! List and item catalog use-case services.
//!
//! # Responsibility
//! - Create, read, patch and delete lists and items for one owner.
//! - Remove an entity's associations together with the entity.
//!
//! # Invariants
//! - Lookups are owner-scoped; a foreign entity is reported as not found.
//! - Patches are typed and validated before anything is written.
//! - Entity deletion removes associations first, then the entity, in one
//!   transaction.

use crate::engine::{ErrorKind, Outcome};
use crate::model::component::Succinct;
use crate::model::item::{Item, ItemId, ItemPatch, NewItem};
use crate::model::list::{List, ListId, ListPatch, NewList};
use crate::model::validation::{ensure_owner, ModelValidationError};
use crate::repo::error::RepoError;
use crate::repo::ports::Storage;
use log::info;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from catalog service operations.
#[derive(Debug)]
pub enum CatalogError {
    Validation(ModelValidationError),
    ListNotFound(ListId),
    ItemNotFound(ItemId),
    Repo(RepoError),
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::InvalidInput,
            Self::ListNotFound(_) | Self::ItemNotFound(_) => ErrorKind::NotFound,
            Self::Repo(_) => ErrorKind::UnanticipatedStorage,
        }
    }
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ListNotFound(id) => write!(f, "list not found: {id}"),
            Self::ItemNotFound(id) => write!(f, "item not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CatalogError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<ModelValidationError> for CatalogError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Result of deleting a list or item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityRemoval {
    pub component: Succinct,
    /// Associations removed along with the entity.
    pub associations_removed: u64,
}

/// List catalog service.
pub struct ListService<S: Storage> {
    storage: S,
}

impl<S: Storage> ListService<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn create_list(&self, owner: &str, list: &NewList) -> CatalogResult<List> {
        ensure_owner(owner)?;
        let list = list.normalized()?;
        let created = self
            .storage
            .transaction(|stores| Ok::<_, CatalogError>(stores.lists.create(owner, &list)?))?;
        info!("event=list_create module=service status=ok list_id={}", created.id);
        Ok(created)
    }

    pub fn get_list(&self, list_id: ListId, owner: &str) -> CatalogResult<List> {
        self.storage.transaction(|stores| {
            stores
                .lists
                .find_by_owner_and_id(list_id, owner)?
                .ok_or(CatalogError::ListNotFound(list_id))
        })
    }

    /// All lists of `owner`, sorted by name.
    pub fn lists_for_owner(&self, owner: &str) -> CatalogResult<Vec<List>> {
        self.storage
            .transaction(|stores| Ok(stores.lists.find_all_by_owner(owner)?))
    }

    /// Applies a typed partial update and returns the stored result.
    pub fn update_list(
        &self,
        list_id: ListId,
        owner: &str,
        patch: &ListPatch,
    ) -> CatalogResult<List> {
        self.storage.transaction(|stores| {
            let mut list = stores
                .lists
                .find_by_owner_and_id(list_id, owner)?
                .ok_or(CatalogError::ListNotFound(list_id))?;
            if patch.is_empty() {
                return Ok(list);
            }

            list.apply(patch)?;
            if stores.lists.update(&list, owner)? == 0 {
                return Err(CatalogError::ListNotFound(list_id));
            }
            stores
                .lists
                .find_by_owner_and_id(list_id, owner)?
                .ok_or(CatalogError::ListNotFound(list_id))
        })
    }

    pub fn rename_list(
        &self,
        list_id: ListId,
        owner: &str,
        name: impl Into<String>,
    ) -> CatalogResult<List> {
        let patch = ListPatch {
            name: Some(name.into()),
            ..ListPatch::default()
        };
        self.update_list(list_id, owner, &patch)
    }

    /// Replaces or clears (`None`) the description.
    pub fn redescribe_list(
        &self,
        list_id: ListId,
        owner: &str,
        description: Option<String>,
    ) -> CatalogResult<List> {
        let patch = ListPatch {
            description: Some(description),
            ..ListPatch::default()
        };
        self.update_list(list_id, owner, &patch)
    }

    pub fn set_list_public(
        &self,
        list_id: ListId,
        owner: &str,
        is_public: bool,
    ) -> CatalogResult<List> {
        let patch = ListPatch {
            is_public: Some(is_public),
            ..ListPatch::default()
        };
        self.update_list(list_id, owner, &patch)
    }

    /// Deletes a list and every association it holds.
    pub fn delete_list(&self, list_id: ListId, owner: &str) -> CatalogResult<Outcome<EntityRemoval>> {
        let removal = self.storage.transaction(|stores| {
            let list = stores
                .lists
                .find_by_owner_and_id(list_id, owner)?
                .ok_or(CatalogError::ListNotFound(list_id))?;
            let associations_removed = stores.associations.delete_all_for_list(list_id)?;
            if stores.lists.delete(list_id)? == 0 {
                return Err(CatalogError::ListNotFound(list_id));
            }
            Ok(EntityRemoval {
                component: Succinct::from(&list),
                associations_removed,
            })
        })?;

        info!(
            "event=list_delete module=service status=ok list_id={list_id} associations_removed={}",
            removal.associations_removed
        );
        let message = format!(
            "Deleted list '{}' and removed {} associations.",
            removal.component.name, removal.associations_removed
        );
        Ok(Outcome::new(removal, message))
    }
}

/// Item catalog service. Mirrors `ListService`.
pub struct ItemService<S: Storage> {
    storage: S,
}

impl<S: Storage> ItemService<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn create_item(&self, owner: &str, item: &NewItem) -> CatalogResult<Item> {
        ensure_owner(owner)?;
        let item = item.normalized()?;
        let created = self
            .storage
            .transaction(|stores| Ok::<_, CatalogError>(stores.items.create(owner, &item)?))?;
        info!("event=item_create module=service status=ok item_id={}", created.id);
        Ok(created)
    }

    pub fn get_item(&self, item_id: ItemId, owner: &str) -> CatalogResult<Item> {
        self.storage.transaction(|stores| {
            stores
                .items
                .find_by_owner_and_id(item_id, owner)?
                .ok_or(CatalogError::ItemNotFound(item_id))
        })
    }

    pub fn items_for_owner(&self, owner: &str) -> CatalogResult<Vec<Item>> {
        self.storage
            .transaction(|stores| Ok(stores.items.find_all_by_owner(owner)?))
    }

    pub fn update_item(
        &self,
        item_id: ItemId,
        owner: &str,
        patch: &ItemPatch,
    ) -> CatalogResult<Item> {
        self.storage.transaction(|stores| {
            let mut item = stores
                .items
                .find_by_owner_and_id(item_id, owner)?
                .ok_or(CatalogError::ItemNotFound(item_id))?;
            if patch.is_empty() {
                return Ok(item);
            }

            item.apply(patch)?;
            if stores.items.update(&item, owner)? == 0 {
                return Err(CatalogError::ItemNotFound(item_id));
            }
            stores
                .items
                .find_by_owner_and_id(item_id, owner)?
                .ok_or(CatalogError::ItemNotFound(item_id))
        })
    }

    pub fn rename_item(
        &self,
        item_id: ItemId,
        owner: &str,
        name: impl Into<String>,
    ) -> CatalogResult<Item> {
        let patch = ItemPatch {
            name: Some(name.into()),
            ..ItemPatch::default()
        };
        self.update_item(item_id, owner, &patch)
    }

    pub fn redescribe_item(
        &self,
        item_id: ItemId,
        owner: &str,
        description: Option<String>,
    ) -> CatalogResult<Item> {
        let patch = ItemPatch {
            description: Some(description),
            ..ItemPatch::default()
        };
        self.update_item(item_id, owner, &patch)
    }

    /// Deletes an item and removes it from every list.
    pub fn delete_item(&self, item_id: ItemId, owner: &str) -> CatalogResult<Outcome<EntityRemoval>> {
        let removal = self.storage.transaction(|stores| {
            let item = stores
                .items
                .find_by_owner_and_id(item_id, owner)?
                .ok_or(CatalogError::ItemNotFound(item_id))?;
            let associations_removed = stores.associations.delete_all_for_item(item_id)?;
            if stores.items.delete(item_id)? == 0 {
                return Err(CatalogError::ItemNotFound(item_id));
            }
            Ok(EntityRemoval {
                component: Succinct::from(&item),
                associations_removed,
            })
        })?;

        info!(
            "event=item_delete module=service status=ok item_id={item_id} associations_removed={}",
            removal.associations_removed
        );
        let message = format!(
            "Deleted item '{}' and removed it from {} lists.",
            removal.component.name, removal.associations_removed
        );
        Ok(Outcome::new(removal, message))
    }
}
