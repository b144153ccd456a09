use super::schema::{
    affected, flag_to_int, owner_and_id_chunks, parse_audit, parse_flag, parse_uuid,
};
use crate::model::list::{List, ListId, NewList};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::ports::ListStore;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::BTreeSet;
use uuid::Uuid;

const LIST_SELECT_SQL: &str = "SELECT
    id,
    name,
    description,
    is_public,
    owner,
    created_at,
    created_by,
    updated_at,
    updated_by
FROM lists";

/// SQLite-backed list store.
pub struct SqliteListStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteListStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn load_required(&self, id: ListId) -> RepoResult<List> {
        let mut stmt = self
            .conn
            .prepare(&format!("{LIST_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => parse_list_row(row),
            None => Err(RepoError::InvalidData(format!(
                "list {id} missing in read-back"
            ))),
        }
    }

    fn query_lists(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<List>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut lists = Vec::new();
        while let Some(row) = rows.next()? {
            lists.push(parse_list_row(row)?);
        }
        Ok(lists)
    }
}

impl ListStore for SqliteListStore<'_> {
    fn create(&self, owner: &str, list: &NewList) -> RepoResult<List> {
        let list = list.normalized()?;
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO lists (
                id,
                name,
                description,
                is_public,
                owner,
                created_by,
                updated_by
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?5, ?5);",
            params![
                id.to_string(),
                list.name.as_str(),
                list.description.as_deref(),
                flag_to_int(list.is_public),
                owner,
            ],
        )?;
        self.load_required(id)
    }

    fn find_by_owner_and_id(&self, id: ListId, owner: &str) -> RepoResult<Option<List>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{LIST_SELECT_SQL} WHERE id = ?1 AND owner = ?2;"))?;
        let mut rows = stmt.query(params![id.to_string(), owner])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_list_row(row)?));
        }
        Ok(None)
    }

    fn find_by_owner_and_ids(
        &self,
        ids: &BTreeSet<ListId>,
        owner: &str,
    ) -> RepoResult<Vec<List>> {
        let mut lists = Vec::with_capacity(ids.len());
        for (filter, bind_values) in owner_and_id_chunks(owner, ids) {
            lists.extend(
                self.query_lists(&format!("{LIST_SELECT_SQL} WHERE {filter};"), bind_values)?,
            );
        }
        lists.sort_by(|left, right| left.name.cmp(&right.name).then(left.id.cmp(&right.id)));
        Ok(lists)
    }

    fn find_all_by_owner(&self, owner: &str) -> RepoResult<Vec<List>> {
        self.query_lists(
            &format!("{LIST_SELECT_SQL} WHERE owner = ? ORDER BY name ASC, id ASC;"),
            vec![Value::Text(owner.to_string())],
        )
    }

    fn ids_not_found(
        &self,
        ids: &BTreeSet<ListId>,
        owner: &str,
    ) -> RepoResult<BTreeSet<ListId>> {
        let mut missing = ids.clone();
        for (filter, bind_values) in owner_and_id_chunks(owner, ids) {
            let mut stmt = self
                .conn
                .prepare_cached(&format!("SELECT id FROM lists WHERE {filter};"))?;
            let mut rows = stmt.query(params_from_iter(bind_values))?;
            while let Some(row) = rows.next()? {
                missing.remove(&parse_uuid(row, "id")?);
            }
        }
        Ok(missing)
    }

    fn update(&self, list: &List, actor: &str) -> RepoResult<u64> {
        list.validate()?;
        let changed = self.conn.execute(
            "UPDATE lists
             SET
                name = ?3,
                description = ?4,
                is_public = ?5,
                updated_at = (strftime('%s', 'now') * 1000),
                updated_by = ?6
             WHERE id = ?1
               AND owner = ?2;",
            params![
                list.id.to_string(),
                list.owner.as_str(),
                list.name.as_str(),
                list.description.as_deref(),
                flag_to_int(list.is_public),
                actor,
            ],
        )?;
        affected(changed)
    }

    fn delete(&self, id: ListId) -> RepoResult<u64> {
        let changed = self
            .conn
            .execute("DELETE FROM lists WHERE id = ?1;", [id.to_string()])?;
        affected(changed)
    }

    fn delete_all(&self) -> RepoResult<u64> {
        let changed = self.conn.execute("DELETE FROM lists;", [])?;
        affected(changed)
    }
}

fn parse_list_row(row: &Row<'_>) -> RepoResult<List> {
    let list = List {
        id: parse_uuid(row, "id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        is_public: parse_flag(row, "is_public")?,
        owner: row.get("owner")?,
        audit: parse_audit(row)?,
    };
    list.validate()?;
    Ok(list)
}
