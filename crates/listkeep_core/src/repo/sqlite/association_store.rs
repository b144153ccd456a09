use super::schema::{
    affected, count_to_u64, flag_to_int, parse_flag, parse_uuid, IDS_PER_STATEMENT,
};
use crate::model::association::{Association, AssociationKey};
use crate::model::item::ItemId;
use crate::model::list::ListId;
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::ports::AssociationStore;
use log::warn;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::collections::BTreeSet;

/// Pairs per multi-row insert; each binds two variables.
const PAIRS_PER_INSERT: usize = IDS_PER_STATEMENT;

const ASSOCIATION_COLUMNS: &str =
    "list_id, item_id, quantity, is_suppressed, created_at, updated_at";

/// SQLite-backed association store over the `list_items` table.
pub struct SqliteAssociationStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAssociationStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn insert_chunks(&self, pairs: &BTreeSet<AssociationKey>) -> RepoResult<Vec<Association>> {
        let pairs: Vec<&AssociationKey> = pairs.iter().collect();
        let mut created = Vec::with_capacity(pairs.len());
        for chunk in pairs.chunks(PAIRS_PER_INSERT) {
            let values = vec!["(?, ?)"; chunk.len()].join(", ");
            let mut bind_values = Vec::with_capacity(chunk.len() * 2);
            for pair in chunk {
                bind_values.push(Value::Text(pair.list_id.to_string()));
                bind_values.push(Value::Text(pair.item_id.to_string()));
            }

            let mut stmt = self.conn.prepare_cached(&format!(
                "INSERT INTO list_items (list_id, item_id)
                 VALUES {values}
                 RETURNING {ASSOCIATION_COLUMNS};"
            ))?;
            let mut rows = stmt.query(params_from_iter(bind_values))?;
            while let Some(row) = rows.next()? {
                created.push(parse_association_row(row)?);
            }
        }
        Ok(created)
    }

    fn query_associations(&self, sql: &str, key: &str) -> RepoResult<Vec<Association>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([key])?;
        let mut associations = Vec::new();
        while let Some(row) = rows.next()? {
            associations.push(parse_association_row(row)?);
        }
        Ok(associations)
    }
}

impl AssociationStore for SqliteAssociationStore<'_> {
    fn create_many(&self, pairs: &BTreeSet<AssociationKey>) -> RepoResult<Vec<Association>> {
        if pairs.is_empty() {
            return Ok(Vec::new());
        }

        // Every chunk lands or none does, with or without an outer transaction.
        self.conn.execute_batch("SAVEPOINT list_items_create_many;")?;
        match self.insert_chunks(pairs) {
            Ok(created) => {
                self.conn.execute_batch("RELEASE list_items_create_many;")?;
                Ok(created)
            }
            Err(err) => {
                if let Err(rollback_err) = self.conn.execute_batch(
                    "ROLLBACK TO list_items_create_many; RELEASE list_items_create_many;",
                ) {
                    warn!("event=insert_rollback module=repo status=error error={rollback_err}");
                }
                Err(err)
            }
        }
    }

    fn delete_one(&self, list_id: ListId, item_id: ItemId) -> RepoResult<u64> {
        let changed = self.conn.execute(
            "DELETE FROM list_items WHERE list_id = ?1 AND item_id = ?2;",
            params![list_id.to_string(), item_id.to_string()],
        )?;
        affected(changed)
    }

    fn delete_all_for_list(&self, list_id: ListId) -> RepoResult<u64> {
        let changed = self.conn.execute(
            "DELETE FROM list_items WHERE list_id = ?1;",
            [list_id.to_string()],
        )?;
        affected(changed)
    }

    fn delete_all_for_item(&self, item_id: ItemId) -> RepoResult<u64> {
        let changed = self.conn.execute(
            "DELETE FROM list_items WHERE item_id = ?1;",
            [item_id.to_string()],
        )?;
        affected(changed)
    }

    fn delete_all(&self) -> RepoResult<u64> {
        let changed = self.conn.execute("DELETE FROM list_items;", [])?;
        affected(changed)
    }

    fn find_one(&self, list_id: ListId, item_id: ItemId) -> RepoResult<Option<Association>> {
        let association = self
            .conn
            .query_row(
                &format!(
                    "SELECT {ASSOCIATION_COLUMNS}
                     FROM list_items
                     WHERE list_id = ?1 AND item_id = ?2;"
                ),
                params![list_id.to_string(), item_id.to_string()],
                |row| Ok(parse_association_row(row)),
            )
            .optional()?;
        association.transpose()
    }

    fn find_all_for_list(&self, list_id: ListId) -> RepoResult<Vec<Association>> {
        self.query_associations(
            &format!(
                "SELECT {ASSOCIATION_COLUMNS}
                 FROM list_items
                 WHERE list_id = ?1
                 ORDER BY created_at ASC, item_id ASC;"
            ),
            &list_id.to_string(),
        )
    }

    fn find_all_for_item(&self, item_id: ItemId) -> RepoResult<Vec<Association>> {
        self.query_associations(
            &format!(
                "SELECT {ASSOCIATION_COLUMNS}
                 FROM list_items
                 WHERE item_id = ?1
                 ORDER BY created_at ASC, list_id ASC;"
            ),
            &item_id.to_string(),
        )
    }

    fn update_list_id(
        &self,
        item_id: ItemId,
        from_list_id: ListId,
        to_list_id: ListId,
    ) -> RepoResult<u64> {
        let changed = self.conn.execute(
            "UPDATE list_items
             SET
                list_id = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE item_id = ?1
               AND list_id = ?2;",
            params![
                item_id.to_string(),
                from_list_id.to_string(),
                to_list_id.to_string(),
            ],
        )?;
        affected(changed)
    }

    fn update_settings(&self, association: &Association) -> RepoResult<u64> {
        let changed = self.conn.execute(
            "UPDATE list_items
             SET
                quantity = ?3,
                is_suppressed = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE list_id = ?1
               AND item_id = ?2;",
            params![
                association.list_id.to_string(),
                association.item_id.to_string(),
                i64::from(association.quantity),
                flag_to_int(association.is_suppressed),
            ],
        )?;
        affected(changed)
    }

    fn count_for_list(&self, list_id: ListId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM list_items WHERE list_id = ?1;",
            [list_id.to_string()],
            |row| row.get(0),
        )?;
        count_to_u64(count, "list_items.list_id")
    }

    fn count_for_item(&self, item_id: ItemId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM list_items WHERE item_id = ?1;",
            [item_id.to_string()],
            |row| row.get(0),
        )?;
        count_to_u64(count, "list_items.item_id")
    }
}

fn parse_association_row(row: &Row<'_>) -> RepoResult<Association> {
    let quantity: i64 = row.get("quantity")?;
    let quantity = u32::try_from(quantity).map_err(|_| {
        RepoError::InvalidData(format!("invalid quantity `{quantity}` in list_items.quantity"))
    })?;

    Ok(Association {
        list_id: parse_uuid(row, "list_id")?,
        item_id: parse_uuid(row, "item_id")?,
        quantity,
        is_suppressed: parse_flag(row, "is_suppressed")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
