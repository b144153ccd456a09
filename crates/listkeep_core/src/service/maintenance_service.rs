//! Cross-owner maintenance operations.
//!
//! These bypass owner scoping and are meant for operator tooling only.

use crate::engine::{AssociationEngine, AssociationError, EngineResult, Outcome};
use crate::repo::ports::Storage;
use log::warn;
use serde::Serialize;

/// Row counts removed by [`MaintenanceService::reset`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResetSummary {
    pub associations: u64,
    pub items: u64,
    pub lists: u64,
}

pub struct MaintenanceService<S: Storage> {
    storage: S,
}

impl<S: Storage> MaintenanceService<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Deletes every association of every owner. Lists and items stay.
    pub fn purge_all(&self) -> EngineResult<Outcome<u64>> {
        let deleted = self
            .storage
            .transaction(|stores| AssociationEngine::new(stores).purge_all())?;
        Ok(Outcome::new(deleted, format!("Deleted {deleted} associations.")))
    }

    /// Deletes all associations, then all items, then all lists.
    pub fn reset(&self) -> EngineResult<Outcome<ResetSummary>> {
        let summary = self.storage.transaction(|stores| {
            let associations = AssociationEngine::new(stores).purge_all()?;
            let items = stores.items.delete_all()?;
            let lists = stores.lists.delete_all()?;
            Ok::<_, AssociationError>(ResetSummary {
                associations,
                items,
                lists,
            })
        })?;

        warn!(
            "event=store_reset module=service status=ok associations={} items={} lists={}",
            summary.associations, summary.items, summary.lists
        );
        let message = format!(
            "Deleted {} associations, {} items and {} lists.",
            summary.associations, summary.items, summary.lists
        );
        Ok(Outcome::new(summary, message))
    }
}
