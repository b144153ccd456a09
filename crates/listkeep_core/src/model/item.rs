//! Item domain record.
//!
//! Quantity and visibility are per-list and therefore live on
//! `Association`, not here.

use crate::model::validation::{
    ensure_owner, normalize_description, normalize_name, ModelValidationError,
};
use crate::model::AuditStamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable item identifier.
pub type ItemId = Uuid;

/// Persisted item record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: Option<String>,
    pub owner: String,
    pub audit: AuditStamp,
}

impl Item {
    /// Re-checks field constraints on a record about to be written.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        ensure_owner(&self.owner)?;
        normalize_name(&self.name)?;
        normalize_description(self.description.as_deref())?;
        Ok(())
    }

    /// Applies a typed partial update in place; all-or-nothing.
    pub fn apply(&mut self, patch: &ItemPatch) -> Result<(), ModelValidationError> {
        let name = patch.name.as_deref().map(normalize_name).transpose()?;
        let description = match patch.description.as_ref() {
            Some(value) => Some(normalize_description(value.as_deref())?),
            None => None,
        };

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = description {
            self.description = description;
        }
        Ok(())
    }
}

/// Input for creating an item. The owner is passed separately.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub description: Option<String>,
}

impl NewItem {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Returns a normalized copy ready for persistence.
    pub fn normalized(&self) -> Result<Self, ModelValidationError> {
        Ok(Self {
            name: normalize_name(&self.name)?,
            description: normalize_description(self.description.as_deref())?,
        })
    }
}

/// Typed partial update for an item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}
