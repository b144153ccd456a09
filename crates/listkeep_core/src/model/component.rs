//! Succinct projections of lists and items used in association payloads.

use crate::model::item::Item;
use crate::model::list::List;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

/// Which side of an association a component is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    List,
    Item,
}

impl ComponentKind {
    /// Lowercase noun used in user-facing messages.
    pub fn noun(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Item => "item",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            Self::List => "lists",
            Self::Item => "items",
        }
    }
}

/// Minimal `(kind, id, name)` view of a list or item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Succinct {
    pub kind: ComponentKind,
    pub id: Uuid,
    pub name: String,
}

impl From<&List> for Succinct {
    fn from(value: &List) -> Self {
        Self {
            kind: ComponentKind::List,
            id: value.id,
            name: value.name.clone(),
        }
    }
}

impl From<&Item> for Succinct {
    fn from(value: &Item) -> Self {
        Self {
            kind: ComponentKind::Item,
            id: value.id,
            name: value.name.clone(),
        }
    }
}

/// Display order: name, then id so equal names stay deterministic.
pub fn by_display_name(left: &Succinct, right: &Succinct) -> Ordering {
    left.name
        .cmp(&right.name)
        .then_with(|| left.id.cmp(&right.id))
}
