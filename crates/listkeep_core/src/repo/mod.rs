//! Persistence ports and their SQLite implementation.
//!
//! # Responsibility
//! - Define the store contracts the association engine depends on.
//! - Isolate SQLite query details from engine/service orchestration.
//!
//! # Invariants
//! - Port calls are individually atomic; callers compose them inside one
//!   `Storage::transaction`.
//! - Uniqueness violations surface as `RepoError::Conflict`, never as a raw
//!   driver error.

pub mod error;
pub mod ports;
pub mod sqlite;

pub use error::{RepoError, RepoResult};
pub use ports::{AssociationStore, ItemStore, ListStore, Storage, Stores};
