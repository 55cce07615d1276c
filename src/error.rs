use crate::store::{StoreError, Table};
use thiserror::Error;

/// Errors returned by the content services.
#[derive(Error, Debug)]
pub enum AdminError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{table} row '{id}' not found")]
    NotFound { table: Table, id: String },

    #[error("Not signed in. Sign in before changing content.")]
    AuthRequired,

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl AdminError {
    pub(crate) fn not_found(table: Table, id: &str) -> Self {
        AdminError::NotFound {
            table,
            id: id.to_string(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        AdminError::Validation(message.into())
    }
}
