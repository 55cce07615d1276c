//! Conversion between JSON row values and SQLite values.

use super::query::Row;
use super::schema::{ColumnKind, Table};
use super::StoreError;
use rusqlite::types::{Value as SqlValue, ValueRef};
use serde_json::{Number, Value};

/// Bind form of a JSON scalar. Booleans become 0/1.
pub(crate) fn to_sql(table: Table, column: &str, value: &Value) -> Result<SqlValue, StoreError> {
    match value {
        Value::Null => Ok(SqlValue::Null),
        Value::Bool(flag) => Ok(SqlValue::Integer(i64::from(*flag))),
        Value::String(text) => Ok(SqlValue::Text(text.clone())),
        Value::Number(number) => match (number.as_i64(), number.as_f64()) {
            (Some(integer), _) => Ok(SqlValue::Integer(integer)),
            (None, Some(real)) => Ok(SqlValue::Real(real)),
            (None, None) => Err(StoreError::invalid_row(
                table,
                format!("{column}: number {number} is out of range"),
            )),
        },
        Value::Array(_) | Value::Object(_) => Err(StoreError::invalid_row(
            table,
            format!("{column}: nested values are not stored"),
        )),
    }
}

/// JSON form of a stored value, or `None` for SQL NULL so the column is
/// left out of the row.
pub(crate) fn from_sql(kind: ColumnKind, value: ValueRef<'_>) -> Option<Value> {
    match value {
        ValueRef::Null | ValueRef::Blob(_) => None,
        ValueRef::Integer(integer) => Some(match kind {
            ColumnKind::Bool => Value::Bool(integer != 0),
            ColumnKind::Integer | ColumnKind::Text => Value::from(integer),
        }),
        ValueRef::Real(real) => Number::from_f64(real).map(Value::Number),
        ValueRef::Text(text) => Some(Value::String(String::from_utf8_lossy(text).into_owned())),
    }
}

/// Read one result row in the table's column order.
pub(crate) fn decode_row(table: Table, row: &rusqlite::Row<'_>) -> rusqlite::Result<Row> {
    let mut decoded = Row::new();
    for (index, column) in table.columns().iter().enumerate() {
        if let Some(value) = from_sql(column.kind, row.get_ref(index)?) {
            decoded.insert(column.name.to_string(), value);
        }
    }
    Ok(decoded)
}

/// Row value rendered for error messages.
pub(crate) fn label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
