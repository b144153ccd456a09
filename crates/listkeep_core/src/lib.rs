//! Core domain logic for listkeep: owner-scoped lists, items and the
//! associations between them.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use engine::{
    AssociationEngine, AssociationError, BulkRemoval, CreatedAssociations, EngineResult,
    ErrorKind, ListEntry, MovedItem, Outcome, RemovedAssociation,
};
pub use logging::{default_log_level, init_logging, LoggingError};
pub use model::association::{Association, AssociationKey, AssociationPatch};
pub use model::component::{ComponentKind, Succinct};
pub use model::item::{Item, ItemId, ItemPatch, NewItem};
pub use model::list::{List, ListId, ListPatch, NewList};
pub use model::validation::ModelValidationError;
pub use repo::sqlite::SqliteStorage;
pub use repo::{AssociationStore, ItemStore, ListStore, RepoError, RepoResult, Storage, Stores};
pub use service::association_service::AssociationService;
pub use service::catalog_service::{
    CatalogError, CatalogResult, EntityRemoval, ItemService, ListService,
};
pub use service::maintenance_service::{MaintenanceService, ResetSummary};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
