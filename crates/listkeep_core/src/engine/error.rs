//! Association engine errors and their stable classification.

use crate::model::item::ItemId;
use crate::model::list::ListId;
use crate::model::validation::ModelValidationError;
use crate::repo::error::RepoError;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type EngineResult<T> = Result<T, AssociationError>;

/// Transport-agnostic error class for callers that render responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Entity or association absent, or owned by another principal.
    NotFound,
    /// Association already present.
    AlreadyExists,
    /// Storage created a different number of rows than requested.
    CountMismatch,
    /// A mutation affected no rows right after validation saw the row.
    InconsistentState,
    /// A single-pair mutation affected several rows.
    MultipleAssociations,
    /// Any other storage failure.
    UnanticipatedStorage,
    /// Caller input rejected before touching storage.
    InvalidInput,
}

impl ErrorKind {
    /// Whether a caller can fix the request and try again.
    pub fn is_recoverable(self) -> bool {
        matches!(self, Self::NotFound | Self::AlreadyExists | Self::InvalidInput)
    }
}

/// Errors from association engine and service operations.
#[derive(Debug)]
pub enum AssociationError {
    /// Selection of ids to associate was empty.
    EmptySelection,
    /// Field validation failed.
    Validation(ModelValidationError),
    ItemNotFound(ItemId),
    ListNotFound(ListId),
    /// Ids from a bulk request that are absent or foreign, sorted.
    ItemsNotFound(Vec<ItemId>),
    ListsNotFound(Vec<ListId>),
    AssociationNotFound { item_id: ItemId, list_id: ListId },
    /// Storage rejected the insert on the pair's uniqueness constraint.
    AlreadyAssociated { source: RepoError },
    /// Requested `expected` rows, storage reported `actual`.
    Mismatch { expected: usize, actual: usize },
    /// Row seen during validation but the mutation affected none.
    InconsistentState {
        item_id: ItemId,
        list_id: ListId,
        operation: &'static str,
    },
    /// A single-pair mutation affected `affected` rows.
    MultipleAssociations {
        item_id: ItemId,
        list_id: ListId,
        affected: u64,
    },
    /// Move failed after every entity was resolved.
    MoveFailed {
        item_id: ItemId,
        current_list_id: ListId,
        destination_list_id: ListId,
        source: Box<AssociationError>,
    },
    /// Unanticipated storage failure.
    Storage(RepoError),
}

impl AssociationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptySelection | Self::Validation(_) => ErrorKind::InvalidInput,
            Self::ItemNotFound(_)
            | Self::ListNotFound(_)
            | Self::ItemsNotFound(_)
            | Self::ListsNotFound(_)
            | Self::AssociationNotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyAssociated { .. } => ErrorKind::AlreadyExists,
            Self::Mismatch { .. } => ErrorKind::CountMismatch,
            Self::InconsistentState { .. } => ErrorKind::InconsistentState,
            Self::MultipleAssociations { .. } => ErrorKind::MultipleAssociations,
            Self::MoveFailed { source, .. } => source.kind(),
            Self::Storage(_) => ErrorKind::UnanticipatedStorage,
        }
    }

    /// Translates a storage failure raised while writing association rows.
    pub(crate) fn from_write(err: RepoError) -> Self {
        if err.is_conflict() {
            Self::AlreadyAssociated { source: err }
        } else {
            Self::Storage(err)
        }
    }
}

impl Display for AssociationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySelection => write!(f, "at least one id must be selected"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::ItemNotFound(id) => write!(f, "item not found: {id}"),
            Self::ListNotFound(id) => write!(f, "list not found: {id}"),
            Self::ItemsNotFound(ids) => write!(f, "items not found: {}", join_ids(ids)),
            Self::ListsNotFound(ids) => write!(f, "lists not found: {}", join_ids(ids)),
            Self::AssociationNotFound { item_id, list_id } => {
                write!(f, "item {item_id} is not associated with list {list_id}")
            }
            Self::AlreadyAssociated { .. } => write!(f, "association already exists"),
            Self::Mismatch { expected, actual } => write!(
                f,
                "expected to create {expected} associations but storage created {actual}"
            ),
            Self::InconsistentState {
                item_id,
                list_id,
                operation,
            } => write!(
                f,
                "{operation} of item {item_id} in list {list_id} affected no rows after it was found"
            ),
            Self::MultipleAssociations {
                item_id,
                list_id,
                affected,
            } => write!(
                f,
                "item {item_id} in list {list_id} matched {affected} associations"
            ),
            Self::MoveFailed {
                item_id,
                current_list_id,
                destination_list_id,
                source,
            } => write!(
                f,
                "failed to move item {item_id} from list {current_list_id} to list {destination_list_id}: {source}"
            ),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AssociationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::AlreadyAssociated { source } => Some(source),
            Self::MoveFailed { source, .. } => Some(source.as_ref()),
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AssociationError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Storage(other),
        }
    }
}

impl From<ModelValidationError> for AssociationError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

fn join_ids<T: Display>(ids: &[T]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
