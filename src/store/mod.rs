//! Content store: the relational tables behind the admin dashboard.
//!
//! The [`DataStore`] trait mirrors what the hosted backend offers: filtered
//! selects, inserts, partial updates, deletes and a small set of atomic
//! server-side procedures. Every call is one transaction.
//!
//! [`SqliteStore`] keeps the tables in a SQLite database, either a file or a
//! private in-memory database. Foreign keys, uniqueness and cascading deletes
//! are enforced by the schema.

mod error;
mod migrations;
mod position;
mod query;
mod record;
mod schema;
mod sqlite;
mod value;

pub use error::StoreError;
pub use migrations::SCHEMA_VERSION;
pub use position::next_position;
pub use query::{Filter, OrderBy, Query, Row};
pub use record::{
    delete_where, insert_row, insert_rows, select_maybe_single, select_rows, select_single,
    to_row, update_row, Record,
};
pub use schema::{Column, ColumnKind, Table};
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use serde_json::Value;

/// A server-side procedure executed atomically by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Procedure {
    /// Exchange the `order_index` of two items of the same playlist.
    SwapPlaylistItemsOrder {
        item1_id: String,
        item2_id: String,
        playlist_id: String,
    },
    /// Renumber a playlist's items to `0..n` keeping their relative order.
    CompactPlaylistItemsOrder { playlist_id: String },
}

impl Procedure {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Procedure::SwapPlaylistItemsOrder { .. } => "swap_playlist_items_order",
            Procedure::CompactPlaylistItemsOrder { .. } => "compact_playlist_items_order",
        }
    }
}

/// Access to the content tables.
///
/// Inserted rows get `id` (unless supplied), `created_at` and `updated_at`.
/// Updates refresh `updated_at`. Hard deletes cascade to dependent rows.
#[async_trait]
pub trait DataStore: Send + Sync + std::fmt::Debug {
    /// Select rows matching `query`.
    async fn select(&self, table: Table, query: &Query) -> Result<Vec<Row>, StoreError>;

    /// Insert one row and return it as stored.
    async fn insert(&self, table: Table, row: Row) -> Result<Row, StoreError>;

    /// Insert several rows; either all are stored or none.
    async fn insert_many(&self, table: Table, rows: Vec<Row>) -> Result<Vec<Row>, StoreError>;

    /// Merge `patch` into the row with the given id and return the result.
    async fn update(&self, table: Table, id: &str, patch: Row) -> Result<Row, StoreError>;

    /// Delete rows matching `query`. Returns the number of rows removed from
    /// `table` itself (cascaded rows are not counted).
    async fn delete(&self, table: Table, query: &Query) -> Result<usize, StoreError>;

    /// Run a server-side procedure.
    async fn call(&self, procedure: Procedure) -> Result<Value, StoreError>;
}
