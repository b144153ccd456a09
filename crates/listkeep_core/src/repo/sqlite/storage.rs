use super::schema::ensure_connection_ready;
use super::{SqliteAssociationStore, SqliteItemStore, SqliteListStore};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::ports::{Storage, Stores};
use log::warn;
use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Transaction boundary over one migrated SQLite connection.
///
/// Each `transaction` call opens `BEGIN IMMEDIATE`, so the write lock is
/// taken before the first read and concurrent writers queue behind it for
/// up to the connection busy timeout.
#[derive(Clone, Copy)]
pub struct SqliteStorage<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStorage<'conn> {
    /// Creates storage from a connection returned by `db::open_db*`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl Storage for SqliteStorage<'_> {
    fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        E: From<RepoError>,
        F: FnOnce(Stores<'_>) -> Result<T, E>,
    {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)
            .map_err(RepoError::from)?;

        let outcome = {
            let lists = SqliteListStore::new(&tx);
            let items = SqliteItemStore::new(&tx);
            let associations = SqliteAssociationStore::new(&tx);
            work(Stores {
                lists: &lists,
                items: &items,
                associations: &associations,
            })
        };

        match outcome {
            Ok(value) => {
                tx.commit().map_err(RepoError::from)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    warn!("event=tx_rollback module=repo status=error error={rollback_err}");
                }
                Err(err)
            }
        }
    }
}
