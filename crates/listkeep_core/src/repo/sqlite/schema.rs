//! Schema readiness checks and row decoding helpers.

use crate::db::migrations::latest_version;
use crate::model::AuditStamp;
use crate::repo::error::{RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{Connection, Row};
use std::collections::BTreeSet;
use uuid::Uuid;

const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    (
        "lists",
        &[
            "id",
            "name",
            "description",
            "is_public",
            "owner",
            "created_at",
            "created_by",
            "updated_at",
            "updated_by",
        ],
    ),
    (
        "items",
        &[
            "id",
            "name",
            "description",
            "owner",
            "created_at",
            "created_by",
            "updated_at",
            "updated_by",
        ],
    ),
    (
        "list_items",
        &[
            "list_id",
            "item_id",
            "quantity",
            "is_suppressed",
            "created_at",
            "updated_at",
        ],
    ),
];

/// Verifies that `conn` is migrated and exposes every table the stores use.
pub(super) fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &(table, columns) in REQUIRED_COLUMNS {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

pub(super) fn parse_uuid(row: &Row<'_>, column: &'static str) -> RepoResult<Uuid> {
    let value: String = row.get(column)?;
    Uuid::parse_str(&value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

pub(super) fn parse_flag(row: &Row<'_>, column: &'static str) -> RepoResult<bool> {
    match row.get::<_, i64>(column)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid flag value `{other}` in {column}"
        ))),
    }
}

pub(super) fn parse_audit(row: &Row<'_>) -> RepoResult<AuditStamp> {
    Ok(AuditStamp {
        created_at: row.get("created_at")?,
        created_by: row.get("created_by")?,
        updated_at: row.get("updated_at")?,
        updated_by: row.get("updated_by")?,
    })
}

pub(super) fn flag_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(super) fn affected(changed: usize) -> RepoResult<u64> {
    u64::try_from(changed).map_err(|_| {
        RepoError::InvalidData(format!("affected row count `{changed}` overflows u64"))
    })
}

pub(super) fn count_to_u64(value: i64, context: &'static str) -> RepoResult<u64> {
    u64::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("negative count `{value}` for {context}")))
}

/// Ids bound into one `IN (...)` filter. SQLite rejects statements with
/// more than 32766 variables.
pub(super) const IDS_PER_STATEMENT: usize = 500;

/// Splits an id set into `owner = ? AND id IN (?, ...)` filters, each with
/// at most `IDS_PER_STATEMENT` ids. An empty set yields no filters.
pub(super) fn owner_and_id_chunks(
    owner: &str,
    ids: &BTreeSet<Uuid>,
) -> Vec<(String, Vec<Value>)> {
    let ids: Vec<&Uuid> = ids.iter().collect();
    ids.chunks(IDS_PER_STATEMENT)
        .map(|chunk| {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let mut bind_values = Vec::with_capacity(chunk.len() + 1);
            bind_values.push(Value::Text(owner.to_string()));
            bind_values.extend(chunk.iter().map(|id| Value::Text(id.to_string())));
            (
                format!("owner = ? AND id IN ({placeholders})"),
                bind_values,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{owner_and_id_chunks, IDS_PER_STATEMENT};
    use std::collections::BTreeSet;
    use uuid::Uuid;

    #[test]
    fn id_chunks_stay_under_the_bind_limit_and_keep_every_id() {
        let ids: BTreeSet<Uuid> = (0..1_001u128).map(Uuid::from_u128).collect();

        let chunks = owner_and_id_chunks("alice", &ids);

        assert_eq!(chunks.len(), 3);
        assert!(chunks
            .iter()
            .all(|(_, values)| values.len() <= IDS_PER_STATEMENT + 1));
        let bound: usize = chunks.iter().map(|(_, values)| values.len() - 1).sum();
        assert_eq!(bound, ids.len());
        assert_eq!(chunks[2].0, "owner = ? AND id IN (?)");
    }

    #[test]
    fn empty_id_set_yields_no_filters() {
        assert!(owner_and_id_chunks("alice", &BTreeSet::new()).is_empty());
    }
}
