//! Sibling positions (`order_index`) under a parent row.

use super::query::Query;
use super::schema::Table;
use super::{DataStore, StoreError};
use serde_json::Value;

/// Position after the last sibling under `parent_column = parent_id`, or 0
/// when there are none.
pub async fn next_position(
    store: &dyn DataStore,
    table: Table,
    parent_column: &str,
    parent_id: &str,
) -> Result<i32, StoreError> {
    let query = Query::new()
        .eq(parent_column, parent_id)
        .order("order_index", false)
        .limit(1);
    let last = store
        .select(table, &query)
        .await?
        .into_iter()
        .next()
        .and_then(|row| row.get("order_index").and_then(Value::as_i64));

    match last {
        None => Ok(0),
        Some(max) => i32::try_from(max)
            .ok()
            .and_then(|max| max.checked_add(1))
            .ok_or_else(|| StoreError::invalid_row(table, format!("order_index {max} out of range"))),
    }
}
