//! Core use-case services.
//!
//! # Responsibility
//! - Expose named operations to outer layers, each in one transaction.
//! - Keep outer layers decoupled from storage details.
//!
//! # Invariants
//! - Every public operation runs inside exactly one `Storage::transaction`;
//!   an error return rolls back every write it made.
//! - Global purge is only reachable through `MaintenanceService`.

pub mod association_service;
pub mod catalog_service;
pub mod maintenance_service;
