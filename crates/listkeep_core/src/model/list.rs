//! List domain record.
//!
//! # Invariants
//! - `name` and `description` satisfy `model::validation` rules.
//! - A list never embeds its items; membership lives in `list_items`.

use crate::model::validation::{
    ensure_owner, normalize_description, normalize_name, ModelValidationError,
};
use crate::model::AuditStamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable list identifier.
pub type ListId = Uuid;

/// Persisted list record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub id: ListId,
    pub name: String,
    pub description: Option<String>,
    /// Serialized as `public` to match external schema naming.
    #[serde(rename = "public")]
    pub is_public: bool,
    pub owner: String,
    pub audit: AuditStamp,
}

impl List {
    /// Re-checks field constraints on a record about to be written.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        ensure_owner(&self.owner)?;
        normalize_name(&self.name)?;
        normalize_description(self.description.as_deref())?;
        Ok(())
    }

    /// Applies a typed partial update in place.
    ///
    /// Only fields set on `patch` change. Values are normalized before they
    /// are assigned, so a failing patch leaves `self` untouched.
    pub fn apply(&mut self, patch: &ListPatch) -> Result<(), ModelValidationError> {
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
        if let Some(is_public) = patch.is_public {
            self.is_public = is_public;
        }
        Ok(())
    }
}

/// Input for creating a list. The owner is passed separately.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewList {
    pub name: String,
    pub description: Option<String>,
    #[serde(default, rename = "public")]
    pub is_public: bool,
}

impl NewList {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns a normalized copy ready for persistence.
    pub fn normalized(&self) -> Result<Self, ModelValidationError> {
        Ok(Self {
            name: normalize_name(&self.name)?,
            description: normalize_description(self.description.as_deref())?,
            is_public: self.is_public,
        })
    }
}

/// Typed partial update for a list.
///
/// `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub is_public: Option<bool>,
}

impl ListPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.is_public.is_none()
    }
}
