//! SQLite implementation of the persistence ports.
//!
//! # Invariants
//! - Stores borrow a connection (or a transaction deref'd to one) and never
//!   open transactions themselves; `SqliteStorage` owns that boundary.
//! - Row decoding rejects malformed persisted values instead of masking them.

mod association_store;
mod item_store;
mod list_store;
mod schema;
mod storage;

pub use association_store::SqliteAssociationStore;
pub use item_store::SqliteItemStore;
pub use list_store::SqliteListStore;
pub use storage::SqliteStorage;
