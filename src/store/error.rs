use super::schema::Table;
use thiserror::Error;

/// Errors reported by a [`DataStore`](super::DataStore).
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("No row with id '{id}' in {table}")]
    NotFound { table: Table, id: String },

    #[error("Duplicate value '{value}' for {table}.{column}")]
    UniqueViolation {
        table: Table,
        column: String,
        value: String,
    },

    #[error("Row in {table} references a missing row: {reason}")]
    ForeignKeyViolation { table: Table, reason: String },

    #[error("Invalid row for {table}: {reason}")]
    InvalidRow { table: Table, reason: String },

    #[error("Procedure {procedure} failed: {reason}")]
    ProcedureFailed {
        procedure: &'static str,
        reason: String,
    },

    #[error("Unsupported database schema version {0}")]
    UnsupportedSchema(u32),
}

impl StoreError {
    /// Whether this error is a unique-constraint violation.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::UniqueViolation { .. })
    }

    pub(crate) fn invalid_row(table: Table, reason: impl Into<String>) -> Self {
        StoreError::InvalidRow {
            table,
            reason: reason.into(),
        }
    }

    pub(crate) fn procedure(procedure: &'static str, reason: impl Into<String>) -> Self {
        StoreError::ProcedureFailed {
            procedure,
            reason: reason.into(),
        }
    }
}
