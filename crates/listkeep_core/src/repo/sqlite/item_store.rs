use super::schema::{affected, owner_and_id_chunks, parse_audit, parse_uuid};
use crate::model::item::{Item, ItemId, NewItem};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::ports::ItemStore;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::collections::BTreeSet;
use uuid::Uuid;

const ITEM_SELECT_SQL: &str = "SELECT
    id,
    name,
    description,
    owner,
    created_at,
    created_by,
    updated_at,
    updated_by
FROM items";

/// SQLite-backed item store.
pub struct SqliteItemStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_items(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Item>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }
        Ok(items)
    }
}

impl ItemStore for SqliteItemStore<'_> {
    fn create(&self, owner: &str, item: &NewItem) -> RepoResult<Item> {
        let item = item.normalized()?;
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO items (
                id,
                name,
                description,
                owner,
                created_by,
                updated_by
            ) VALUES (?1, ?2, ?3, ?4, ?4, ?4);",
            params![
                id.to_string(),
                item.name.as_str(),
                item.description.as_deref(),
                owner,
            ],
        )?;

        self.find_by_owner_and_id(id, owner)?
            .ok_or_else(|| RepoError::InvalidData(format!("item {id} missing in read-back")))
    }

    fn find_by_owner_and_id(&self, id: ItemId, owner: &str) -> RepoResult<Option<Item>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} WHERE id = ?1 AND owner = ?2;"))?;
        let item = stmt
            .query_row(params![id.to_string(), owner], |row| {
                Ok(parse_item_row(row))
            })
            .optional()?;
        item.transpose()
    }

    fn find_by_owner_and_ids(
        &self,
        ids: &BTreeSet<ItemId>,
        owner: &str,
    ) -> RepoResult<Vec<Item>> {
        let mut items = Vec::with_capacity(ids.len());
        for (filter, bind_values) in owner_and_id_chunks(owner, ids) {
            items.extend(
                self.query_items(&format!("{ITEM_SELECT_SQL} WHERE {filter};"), bind_values)?,
            );
        }
        items.sort_by(|left, right| left.name.cmp(&right.name).then(left.id.cmp(&right.id)));
        Ok(items)
    }

    fn find_all_by_owner(&self, owner: &str) -> RepoResult<Vec<Item>> {
        self.query_items(
            &format!("{ITEM_SELECT_SQL} WHERE owner = ? ORDER BY name ASC, id ASC;"),
            vec![Value::Text(owner.to_string())],
        )
    }

    fn ids_not_found(
        &self,
        ids: &BTreeSet<ItemId>,
        owner: &str,
    ) -> RepoResult<BTreeSet<ItemId>> {
        let found: BTreeSet<ItemId> = self
            .find_by_owner_and_ids(ids, owner)?
            .into_iter()
            .map(|item| item.id)
            .collect();
        Ok(ids.difference(&found).copied().collect())
    }

    fn update(&self, item: &Item, actor: &str) -> RepoResult<u64> {
        item.validate()?;
        let changed = self.conn.execute(
            "UPDATE items
             SET
                name = ?3,
                description = ?4,
                updated_at = (strftime('%s', 'now') * 1000),
                updated_by = ?5
             WHERE id = ?1
               AND owner = ?2;",
            params![
                item.id.to_string(),
                item.owner.as_str(),
                item.name.as_str(),
                item.description.as_deref(),
                actor,
            ],
        )?;
        affected(changed)
    }

    fn delete(&self, id: ItemId) -> RepoResult<u64> {
        let changed = self
            .conn
            .execute("DELETE FROM items WHERE id = ?1;", [id.to_string()])?;
        affected(changed)
    }

    fn delete_all(&self) -> RepoResult<u64> {
        let changed = self.conn.execute("DELETE FROM items;", [])?;
        affected(changed)
    }
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<Item> {
    let item = Item {
        id: parse_uuid(row, "id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        owner: row.get("owner")?,
        audit: parse_audit(row)?,
    };
    item.validate()?;
    Ok(item)
}
