//! Domain model for lists, items and the associations between them.
//!
//! # Responsibility
//! - Define the canonical records used by core business logic.
//! - Keep List and Item acyclic: cross references are ids, never objects.
//!
//! # Invariants
//! - Every entity is identified by a stable UUID that is never reused.
//! - Per-list quantity and visibility live on `Association`, not on `Item`.
//! - Associations never cross ownership boundaries.

pub mod association;
pub mod component;
pub mod item;
pub mod list;
pub mod ownership;
pub mod validation;

use serde::{Deserialize, Serialize};

/// Creation/update metadata shared by lists and items.
///
/// Timestamps are epoch milliseconds assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStamp {
    pub created_at: i64,
    pub created_by: String,
    pub updated_at: i64,
    pub updated_by: String,
}
