//! Typed access on top of the row-level [`DataStore`] API.

use super::query::{Query, Row};
use super::schema::Table;
use super::{DataStore, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A row type bound to one table.
pub trait Record: Serialize + DeserializeOwned + Send {
    const TABLE: Table;
}

/// Serialize `value` into a row. Fails unless it is a JSON object.
pub fn to_row<T: Serialize + ?Sized>(table: Table, value: &T) -> Result<Row, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(row) => Ok(row),
        other => Err(StoreError::invalid_row(
            table,
            format!("expected an object, got {other}"),
        )),
    }
}

fn from_row<T: Record>(row: Row) -> Result<T, StoreError> {
    Ok(serde_json::from_value(Value::Object(row))?)
}

pub async fn select_rows<T: Record>(store: &dyn DataStore, query: &Query) -> Result<Vec<T>, StoreError> {
    store
        .select(T::TABLE, query)
        .await?
        .into_iter()
        .map(from_row)
        .collect()
}

/// Select at most one row (`maybeSingle`).
pub async fn select_maybe_single<T: Record>(
    store: &dyn DataStore,
    query: &Query,
) -> Result<Option<T>, StoreError> {
    let limited = query.clone().limit(1);
    let mut rows = store.select(T::TABLE, &limited).await?;
    rows.pop().map(from_row).transpose()
}

/// Select exactly one row by id.
pub async fn select_single<T: Record>(store: &dyn DataStore, id: &str) -> Result<T, StoreError> {
    select_maybe_single(store, &Query::by_id(id))
        .await?
        .ok_or_else(|| StoreError::NotFound {
            table: T::TABLE,
            id: id.to_string(),
        })
}

pub async fn insert_row<T: Record, D: Serialize + Sync + ?Sized>(
    store: &dyn DataStore,
    draft: &D,
) -> Result<T, StoreError> {
    let row = to_row(T::TABLE, draft)?;
    from_row(store.insert(T::TABLE, row).await?)
}

pub async fn insert_rows<T: Record, D: Serialize + Sync>(
    store: &dyn DataStore,
    drafts: &[D],
) -> Result<Vec<T>, StoreError> {
    let rows = drafts
        .iter()
        .map(|draft| to_row(T::TABLE, draft))
        .collect::<Result<Vec<_>, _>>()?;
    store
        .insert_many(T::TABLE, rows)
        .await?
        .into_iter()
        .map(from_row)
        .collect()
}

pub async fn update_row<T: Record, P: Serialize + Sync + ?Sized>(
    store: &dyn DataStore,
    id: &str,
    patch: &P,
) -> Result<T, StoreError> {
    let row = to_row(T::TABLE, patch)?;
    from_row(store.update(T::TABLE, id, row).await?)
}

pub async fn delete_where<T: Record>(store: &dyn DataStore, query: &Query) -> Result<usize, StoreError> {
    store.delete(T::TABLE, query).await
}
