//! SQLite-backed content store.

use super::migrations::migrate;
use super::query::{Query, Row};
use super::schema::{quoted, Table};
use super::value::{decode_row, label, to_sql};
use super::{DataStore, Procedure, StoreError};
use crate::utils::{new_row_id, now_iso};
use async_trait::async_trait;
use rusqlite::{ffi, params, params_from_iter, Connection, OptionalExtension, Transaction};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info, trace};

/// Content tables in one SQLite database.
///
/// A single connection sits behind an async lock; every trait call takes the
/// lock once, so each call is one transaction.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and migrate it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        migrate(&conn)?;
        info!(path = %path.display(), "Opened store database");
        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// A private, empty database that lives as long as the store.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// Database file, or `None` for an in-memory store.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of rows in `table`.
    pub async fn count(&self, table: Table) -> Result<usize, StoreError> {
        let conn = self.conn.lock().await;
        let sql = format!("SELECT COUNT(*) FROM {}", quoted(table.name()));
        let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

fn row_id(row: &Row) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

/// Map constraint failures onto the store's own variants.
fn constraint_error(table: Table, row: Option<&Row>, err: rusqlite::Error) -> StoreError {
    if let rusqlite::Error::SqliteFailure(failure, Some(message)) = &err {
        match failure.extended_code {
            ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                // "UNIQUE constraint failed: <table>.<column>"
                let column = message.rsplit('.').next().unwrap_or_default().to_string();
                let value = row
                    .and_then(|r| r.get(&column))
                    .map_or_else(String::new, label);
                return StoreError::UniqueViolation {
                    table,
                    column,
                    value,
                };
            }
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                return StoreError::ForeignKeyViolation {
                    table,
                    reason: message.clone(),
                };
            }
            ffi::SQLITE_CONSTRAINT_NOTNULL => return StoreError::invalid_row(table, message.clone()),
            _ => {}
        }
    }
    StoreError::Sqlite(err)
}

fn select_rows(conn: &Connection, table: Table, query: &Query) -> Result<Vec<Row>, StoreError> {
    let (clause, values) = query.select_sql(table)?;
    let sql = format!(
        "SELECT {} FROM {}{clause}",
        table.select_list(),
        quoted(table.name())
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(values), |row| decode_row(table, row))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn fetch_by_id(conn: &Connection, table: Table, id: &str) -> Result<Row, StoreError> {
    select_rows(conn, table, &Query::by_id(id))?
        .into_iter()
        .next()
        .ok_or_else(|| StoreError::NotFound {
            table,
            id: id.to_string(),
        })
}

/// Fill in `id` and the audit timestamps.
fn with_audit_columns(table: Table, mut row: Row) -> Result<Row, StoreError> {
    match row.get("id") {
        None | Some(Value::Null) => {
            row.insert("id".to_string(), Value::String(new_row_id()));
        }
        Some(Value::String(_)) => {}
        Some(_) => return Err(StoreError::invalid_row(table, "id must be a string")),
    }
    let now = now_iso();
    if !matches!(row.get("created_at"), Some(Value::String(_))) {
        row.insert("created_at".to_string(), Value::String(now.clone()));
    }
    row.insert("updated_at".to_string(), Value::String(now));
    Ok(row)
}

/// Null values are left out so column defaults apply.
fn insert_one(conn: &Connection, table: Table, row: Row) -> Result<Row, StoreError> {
    let row = with_audit_columns(table, row)?;
    let id = row_id(&row)
        .map(str::to_string)
        .ok_or_else(|| StoreError::invalid_row(table, "id must be a string"))?;

    let mut columns = Vec::with_capacity(row.len());
    let mut values = Vec::with_capacity(row.len());
    for (name, value) in row.iter().filter(|(_, value)| !value.is_null()) {
        columns.push(quoted(table.column(name)?.name));
        values.push(to_sql(table, name, value)?);
    }
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quoted(table.name()),
        columns.join(", "),
        vec!["?"; columns.len()].join(", ")
    );
    conn.execute(&sql, params_from_iter(values))
        .map_err(|e| constraint_error(table, Some(&row), e))?;

    trace!(table = %table, id = %id, "Inserted row");
    fetch_by_id(conn, table, &id)
}

fn update_one(conn: &Connection, table: Table, id: &str, mut patch: Row) -> Result<Row, StoreError> {
    if let Some(new_id) = patch.remove("id") {
        if new_id.as_str() != Some(id) {
            return Err(StoreError::invalid_row(table, "id cannot be changed"));
        }
    }
    if !patch.contains_key("updated_at") {
        patch.insert("updated_at".to_string(), Value::String(now_iso()));
    }

    let mut assignments = Vec::with_capacity(patch.len());
    let mut values = Vec::with_capacity(patch.len().saturating_add(1));
    for (name, value) in &patch {
        assignments.push(format!("{} = ?", quoted(table.column(name)?.name)));
        values.push(to_sql(table, name, value)?);
    }
    values.push(rusqlite::types::Value::Text(id.to_string()));

    let sql = format!(
        "UPDATE {} SET {} WHERE \"id\" = ?",
        quoted(table.name()),
        assignments.join(", ")
    );
    let changed = conn
        .execute(&sql, params_from_iter(values))
        .map_err(|e| constraint_error(table, Some(&patch), e))?;
    if changed == 0 {
        return Err(StoreError::NotFound {
            table,
            id: id.to_string(),
        });
    }
    fetch_by_id(conn, table, id)
}

/// Dependent rows go with their parents through `ON DELETE CASCADE`.
fn delete_matching(conn: &Connection, table: Table, query: &Query) -> Result<usize, StoreError> {
    let (clause, values) = query.select_sql(table)?;
    let name = quoted(table.name());
    let sql = format!("DELETE FROM {name} WHERE \"id\" IN (SELECT \"id\" FROM {name}{clause})");
    let removed = conn
        .execute(&sql, params_from_iter(values))
        .map_err(|e| constraint_error(table, None, e))?;
    if removed > 0 {
        debug!(table = %table, count = removed, "Deleted rows");
    }
    Ok(removed)
}

const SET_ITEM_ORDER: &str =
    "UPDATE playlist_items SET order_index = ?1, updated_at = ?2 WHERE id = ?3";

fn swap_items_order(
    tx: &Transaction<'_>,
    name: &'static str,
    item1_id: &str,
    item2_id: &str,
    playlist_id: &str,
) -> Result<Value, StoreError> {
    if item1_id == item2_id {
        return Err(StoreError::procedure(name, "cannot swap an item with itself"));
    }
    let order_of = |id: &str| {
        tx.query_row(
            "SELECT order_index FROM playlist_items WHERE id = ?1 AND playlist_id = ?2",
            params![id, playlist_id],
            |row| row.get::<_, i64>(0),
        )
        .optional()
    };
    let (Some(first), Some(second)) = (order_of(item1_id)?, order_of(item2_id)?) else {
        return Err(StoreError::procedure(
            name,
            format!("items {item1_id} and {item2_id} are not both in playlist {playlist_id}"),
        ));
    };

    let now = now_iso();
    tx.execute(SET_ITEM_ORDER, params![second, now, item1_id])?;
    tx.execute(SET_ITEM_ORDER, params![first, now, item2_id])?;
    debug!(item1_id, item2_id, playlist_id, "Swapped playlist item order");
    Ok(json!({
        "item1_order_index": second,
        "item2_order_index": first,
    }))
}

fn compact_items_order(tx: &Transaction<'_>, playlist_id: &str) -> Result<Value, StoreError> {
    let mut stmt = tx.prepare(
        "SELECT id, order_index FROM playlist_items WHERE playlist_id = ?1 \
         ORDER BY order_index, created_at, rowid",
    )?;
    let items = stmt
        .query_map(params![playlist_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;
    drop(stmt);

    let now = now_iso();
    let mut renumbered: i64 = 0;
    for (dense, (id, current)) in (0_i64..).zip(items) {
        if current != dense {
            tx.execute(SET_ITEM_ORDER, params![dense, now, id])?;
            renumbered = renumbered.saturating_add(1);
        }
    }
    debug!(playlist_id, renumbered, "Compacted playlist item order");
    Ok(json!({ "renumbered": renumbered }))
}

#[async_trait]
impl DataStore for SqliteStore {
    async fn select(&self, table: Table, query: &Query) -> Result<Vec<Row>, StoreError> {
        let conn = self.conn.lock().await;
        select_rows(&conn, table, query)
    }

    async fn insert(&self, table: Table, row: Row) -> Result<Row, StoreError> {
        let conn = self.conn.lock().await;
        insert_one(&conn, table, row)
    }

    async fn insert_many(&self, table: Table, rows: Vec<Row>) -> Result<Vec<Row>, StoreError> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        let mut inserted = Vec::with_capacity(rows.len());
        for row in rows {
            inserted.push(insert_one(&tx, table, row)?);
        }
        tx.commit()?;
        Ok(inserted)
    }

    async fn update(&self, table: Table, id: &str, patch: Row) -> Result<Row, StoreError> {
        let conn = self.conn.lock().await;
        update_one(&conn, table, id, patch)
    }

    async fn delete(&self, table: Table, query: &Query) -> Result<usize, StoreError> {
        let conn = self.conn.lock().await;
        delete_matching(&conn, table, query)
    }

    async fn call(&self, procedure: Procedure) -> Result<Value, StoreError> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        let result = match &procedure {
            Procedure::SwapPlaylistItemsOrder {
                item1_id,
                item2_id,
                playlist_id,
            } => swap_items_order(&tx, procedure.name(), item1_id, item2_id, playlist_id)?,
            Procedure::CompactPlaylistItemsOrder { playlist_id } => {
                compact_items_order(&tx, playlist_id)?
            }
        };
        tx.commit()?;
        Ok(result)
    }
}

#[cfg(test)]
#[path = "sqlite_tests.rs"]
mod tests;
