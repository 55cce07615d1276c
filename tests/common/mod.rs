//! Common test utilities

use async_trait::async_trait;
use gamifier_admin::playlist::{create_playlist, CreatePlaylistOptions};
use gamifier_admin::playlist_item::{create_playlist_item, CreatePlaylistItemOptions, PlaylistItem};
use gamifier_admin::session::{LocalSessionProvider, Session};
use gamifier_admin::store::{DataStore, Procedure, Query, Row, SqliteStore, StoreError, Table};
use gamifier_admin::world::{create_world, CreateWorldOptions};
use gamifier_admin::{AdminContext, ContentDefaults};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const TEST_USER: &str = "admin-1";

/// Context over `store` with [`TEST_USER`] signed in.
#[allow(dead_code)]
pub fn context_with(store: Arc<dyn DataStore>) -> AdminContext {
    let session = Session::new(TEST_USER, Some("admin@example.com".into()));
    let sessions = Arc::new(LocalSessionProvider::new(Some(session)));
    AdminContext::new(store, sessions, ContentDefaults::default())
}

/// Signed-in context over a fresh in-memory store.
#[allow(dead_code)]
pub fn memory_context() -> (AdminContext, Arc<SqliteStore>) {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    (context_with(store.clone()), store)
}

/// Create a world with one playlist and return the playlist id.
#[allow(dead_code)]
pub async fn create_test_playlist(ctx: &AdminContext) -> String {
    let world = create_world(
        ctx,
        CreateWorldOptions {
            name: "Mundo".into(),
            ..Default::default()
        },
    )
    .await
    .expect("Should create world");
    create_playlist(
        ctx,
        CreatePlaylistOptions {
            mundo_id: world.id,
            name: "Lista".into(),
            description: None,
        },
    )
    .await
    .expect("Should create playlist")
    .id
}

#[allow(dead_code)]
pub async fn create_test_item(ctx: &AdminContext, playlist_id: &str, title: &str) -> PlaylistItem {
    create_playlist_item(
        ctx,
        CreatePlaylistItemOptions {
            playlist_id: playlist_id.to_string(),
            content: format!("https://video.example/{title}"),
            title: Some(title.to_string()),
            ..Default::default()
        },
    )
    .await
    .expect("Should create item")
}

/// Store that fails every write once a budget of successful writes is spent.
#[derive(Debug)]
#[allow(dead_code)] // Not every integration test fails writes
pub struct FailingStore {
    inner: SqliteStore,
    writes_left: AtomicUsize,
}

#[allow(dead_code)]
impl FailingStore {
    pub fn new(inner: SqliteStore) -> Self {
        Self {
            inner,
            writes_left: AtomicUsize::new(usize::MAX),
        }
    }

    /// Allow `count` more writes, then fail.
    pub fn fail_after(&self, count: usize) {
        self.writes_left.store(count, Ordering::SeqCst);
    }

    pub fn inner(&self) -> &SqliteStore {
        &self.inner
    }

    fn take_write(&self, table: Table) -> Result<(), StoreError> {
        let allowed = self
            .writes_left
            .try_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if allowed {
            Ok(())
        } else {
            Err(StoreError::ProcedureFailed {
                procedure: "write",
                reason: format!("injected failure on {table}"),
            })
        }
    }
}

#[async_trait]
impl DataStore for FailingStore {
    async fn select(&self, table: Table, query: &Query) -> Result<Vec<Row>, StoreError> {
        self.inner.select(table, query).await
    }

    async fn insert(&self, table: Table, row: Row) -> Result<Row, StoreError> {
        self.take_write(table)?;
        self.inner.insert(table, row).await
    }

    async fn insert_many(&self, table: Table, rows: Vec<Row>) -> Result<Vec<Row>, StoreError> {
        self.take_write(table)?;
        self.inner.insert_many(table, rows).await
    }

    async fn update(&self, table: Table, id: &str, patch: Row) -> Result<Row, StoreError> {
        self.take_write(table)?;
        self.inner.update(table, id, patch).await
    }

    async fn delete(&self, table: Table, query: &Query) -> Result<usize, StoreError> {
        self.take_write(table)?;
        self.inner.delete(table, query).await
    }

    async fn call(&self, procedure: Procedure) -> Result<Value, StoreError> {
        self.inner.call(procedure).await
    }
}
