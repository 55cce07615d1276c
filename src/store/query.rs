//! Filtered, ordered row selection in the style of a hosted table API,
//! rendered to parameterized SQL.

use super::schema::{quoted, Table};
use super::value::to_sql;
use super::StoreError;
use rusqlite::types::Value as SqlValue;
use serde_json::Value;

/// A single stored row: column name to JSON value.
pub type Row = serde_json::Map<String, Value>;

/// A column predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(String, Value),
    Neq(String, Value),
    Lt(String, Value),
    Gt(String, Value),
    In(String, Vec<Value>),
}

impl Filter {
    /// SQL condition with `?` placeholders, pushing its parameters.
    ///
    /// Equality uses `IS` so that comparing against null matches missing
    /// values, the way the hosted backend treats `eq(column, null)`.
    fn to_sql(&self, table: Table, params: &mut Vec<SqlValue>) -> Result<String, StoreError> {
        let (column, operator, value) = match self {
            Filter::Eq(column, value) => (column, "IS", value),
            Filter::Neq(column, value) => (column, "IS NOT", value),
            Filter::Lt(column, value) => (column, "<", value),
            Filter::Gt(column, value) => (column, ">", value),
            Filter::In(column, candidates) => {
                let name = table.column(column)?.name;
                if candidates.is_empty() {
                    return Ok("0".to_string());
                }
                for candidate in candidates {
                    params.push(to_sql(table, name, candidate)?);
                }
                let placeholders = vec!["?"; candidates.len()].join(", ");
                return Ok(format!("{} IN ({placeholders})", quoted(name)));
            }
        };
        let name = table.column(column)?.name;
        params.push(to_sql(table, name, value)?);
        Ok(format!("{} {operator} ?", quoted(name)))
    }
}

/// Sort key for a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub ascending: bool,
}

/// Builder for a select/delete over one table.
///
/// Filters are combined with AND. Ordering follows the hosted backend:
/// nulls sort last when ascending and first when descending. Column names
/// are checked against the table catalogue before any SQL is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    filters: Vec<Filter>,
    order: Vec<OrderBy>,
    limit: Option<usize>,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for `Query::new().eq("id", id)`.
    #[must_use]
    pub fn by_id(id: &str) -> Self {
        Self::new().eq("id", id)
    }

    #[must_use]
    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq(column.to_string(), value.into()));
        self
    }

    #[must_use]
    pub fn neq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Neq(column.to_string(), value.into()));
        self
    }

    #[must_use]
    pub fn lt(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Lt(column.to_string(), value.into()));
        self
    }

    #[must_use]
    pub fn gt(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Gt(column.to_string(), value.into()));
        self
    }

    #[must_use]
    pub fn is_in<V: Into<Value>>(mut self, column: &str, values: impl IntoIterator<Item = V>) -> Self {
        self.filters.push(Filter::In(
            column.to_string(),
            values.into_iter().map(Into::into).collect(),
        ));
        self
    }

    #[must_use]
    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        self.order.push(OrderBy {
            column: column.to_string(),
            ascending,
        });
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Render the filters as a ` WHERE ...` clause (empty without filters).
    pub(crate) fn where_sql(&self, table: Table) -> Result<(String, Vec<SqlValue>), StoreError> {
        let mut params = Vec::new();
        let conditions = self
            .filters
            .iter()
            .map(|filter| filter.to_sql(table, &mut params))
            .collect::<Result<Vec<_>, _>>()?;
        let clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };
        Ok((clause, params))
    }

    /// Render filters, ordering and limit as the tail of a `SELECT`.
    pub(crate) fn select_sql(&self, table: Table) -> Result<(String, Vec<SqlValue>), StoreError> {
        let (filters, params) = self.where_sql(table)?;
        let order = self
            .order
            .iter()
            .map(|key| -> Result<String, StoreError> {
                let name = quoted(table.column(&key.column)?.name);
                Ok(if key.ascending {
                    format!("{name} ASC NULLS LAST")
                } else {
                    format!("{name} DESC NULLS FIRST")
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let order = if order.is_empty() {
            String::new()
        } else {
            format!(" ORDER BY {}", order.join(", "))
        };
        let limit = self
            .limit
            .map_or_else(String::new, |limit| format!(" LIMIT {limit}"));
        Ok((format!("{filters}{order}{limit}"), params))
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
