//! Field validation shared by list and item records.
//!
//! # Invariants
//! - Names are trimmed, non-blank and at most `NAME_MAX_CHARS` characters.
//! - Descriptions are optional; when present they are trimmed, non-blank and
//!   at most `DESCRIPTION_MAX_CHARS` characters.
//! - Owner strings are non-blank.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub const NAME_MAX_CHARS: usize = 64;
pub const DESCRIPTION_MAX_CHARS: usize = 2048;

/// Validation failure for list/item fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    BlankName,
    NameTooLong { max: usize, actual: usize },
    BlankDescription,
    DescriptionTooLong { max: usize, actual: usize },
    BlankOwner,
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "name must not be blank"),
            Self::NameTooLong { max, actual } => {
                write!(f, "name must be at most {max} characters, got {actual}")
            }
            Self::BlankDescription => write!(f, "description must not be blank when present"),
            Self::DescriptionTooLong { max, actual } => write!(
                f,
                "description must be at most {max} characters, got {actual}"
            ),
            Self::BlankOwner => write!(f, "owner must not be blank"),
        }
    }
}

impl Error for ModelValidationError {}

/// Trims and checks one name value.
pub fn normalize_name(value: &str) -> Result<String, ModelValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ModelValidationError::BlankName);
    }
    let actual = trimmed.chars().count();
    if actual > NAME_MAX_CHARS {
        return Err(ModelValidationError::NameTooLong {
            max: NAME_MAX_CHARS,
            actual,
        });
    }
    Ok(trimmed.to_string())
}

/// Trims and checks an optional description value.
pub fn normalize_description(
    value: Option<&str>,
) -> Result<Option<String>, ModelValidationError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ModelValidationError::BlankDescription);
    }
    let actual = trimmed.chars().count();
    if actual > DESCRIPTION_MAX_CHARS {
        return Err(ModelValidationError::DescriptionTooLong {
            max: DESCRIPTION_MAX_CHARS,
            actual,
        });
    }
    Ok(Some(trimmed.to_string()))
}

/// Checks that an owner principal is usable as a scope key.
pub fn ensure_owner(owner: &str) -> Result<(), ModelValidationError> {
    if owner.trim().is_empty() {
        return Err(ModelValidationError::BlankOwner);
    }
    Ok(())
}
