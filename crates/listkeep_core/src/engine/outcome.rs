//! Result payloads and user-facing message composition.

use crate::model::component::{ComponentKind, Succinct};
use serde::Serialize;

/// Operation content plus the human-readable message describing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome<T> {
    pub content: T,
    pub message: String,
}

impl<T> Outcome<T> {
    pub fn new(content: T, message: impl Into<String>) -> Self {
        Self {
            content,
            message: message.into(),
        }
    }
}

/// Result of a one-to-many association create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedAssociations {
    /// The single entity on the "one" side.
    pub component: Succinct,
    /// Entities on the "many" side, sorted by display name.
    pub associated: Vec<Succinct>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovedAssociation {
    pub item_name: String,
    pub list_name: String,
}

/// Result of removing every association of one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkRemoval {
    pub component: Succinct,
    pub deleted_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovedItem {
    pub item_name: String,
    pub current_list_name: String,
    pub destination_list_name: String,
}

/// One row of a list's contents view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListEntry {
    pub item: Succinct,
    pub quantity: u32,
    pub suppressed: bool,
}

pub(crate) fn assigned_message(component: &Succinct, associated: &[Succinct]) -> String {
    let other = other_kind(component.kind);
    match associated {
        [single] => format!(
            "Assigned {} '{}' to {} '{}'",
            component.kind.noun(),
            component.name,
            other.noun(),
            single.name
        ),
        many => format!(
            "Assigned {} '{}' to {} {}.",
            component.kind.noun(),
            component.name,
            many.len(),
            other.plural()
        ),
    }
}

pub(crate) fn removed_message(item_name: &str, list_name: &str) -> String {
    format!("Removed item '{item_name}' from list '{list_name}'")
}

pub(crate) fn bulk_removed_message(component: &Succinct, deleted_count: u64) -> String {
    let other = other_kind(component.kind);
    let noun = if deleted_count == 1 {
        other.noun()
    } else {
        other.plural()
    };
    match component.kind {
        ComponentKind::Item => format!(
            "Removed item '{}' from {deleted_count} {noun}.",
            component.name
        ),
        ComponentKind::List => format!(
            "Removed {deleted_count} {noun} from list '{}'.",
            component.name
        ),
    }
}

pub(crate) fn moved_message(moved: &MovedItem) -> String {
    format!(
        "Moved item '{}' from list '{}' to list '{}'",
        moved.item_name, moved.current_list_name, moved.destination_list_name
    )
}

fn other_kind(kind: ComponentKind) -> ComponentKind {
    match kind {
        ComponentKind::List => ComponentKind::Item,
        ComponentKind::Item => ComponentKind::List,
    }
}
