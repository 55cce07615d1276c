//! Keyed cache of fetched entities.
//!
//! Reads go through [`QueryCache::get_or_fetch`]; writes invalidate the keys
//! they affect so the next read refetches from the store.

use lru::LruCache;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::num::NonZeroUsize;
use tokio::sync::Mutex;
use tracing::{debug, trace};

/// Identifies one cached query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Worlds,
    /// Folders of a world.
    Folders(String),
    Playlists,
    /// Playlists of a world.
    WorldPlaylists(String),
    Playlist(String),
    /// Items of a playlist.
    PlaylistItems(String),
    PlaylistItem(String),
    /// Questions of a playlist item.
    ItemQuestions(String),
    /// Cycles of a question.
    QuestionCycles(String),
    QuestionDetails(String),
    /// Answers of a cycle.
    CycleAnswers(String),
    Categories,
    /// Category ids linked to an item.
    ItemCategories(String),
}

/// A family of keys, ignoring their ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryScope {
    Worlds,
    Folders,
    Playlists,
    WorldPlaylists,
    Playlist,
    PlaylistItems,
    PlaylistItem,
    ItemQuestions,
    QuestionCycles,
    QuestionDetails,
    CycleAnswers,
    Categories,
    ItemCategories,
}

impl QueryKey {
    #[must_use]
    pub fn scope(&self) -> QueryScope {
        match self {
            QueryKey::Worlds => QueryScope::Worlds,
            QueryKey::Folders(_) => QueryScope::Folders,
            QueryKey::Playlists => QueryScope::Playlists,
            QueryKey::WorldPlaylists(_) => QueryScope::WorldPlaylists,
            QueryKey::Playlist(_) => QueryScope::Playlist,
            QueryKey::PlaylistItems(_) => QueryScope::PlaylistItems,
            QueryKey::PlaylistItem(_) => QueryScope::PlaylistItem,
            QueryKey::ItemQuestions(_) => QueryScope::ItemQuestions,
            QueryKey::QuestionCycles(_) => QueryScope::QuestionCycles,
            QueryKey::QuestionDetails(_) => QueryScope::QuestionDetails,
            QueryKey::CycleAnswers(_) => QueryScope::CycleAnswers,
            QueryKey::Categories => QueryScope::Categories,
            QueryKey::ItemCategories(_) => QueryScope::ItemCategories,
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::Worlds => write!(f, "worlds"),
            QueryKey::Folders(id) => write!(f, "folders/{id}"),
            QueryKey::Playlists => write!(f, "playlists"),
            QueryKey::WorldPlaylists(id) => write!(f, "world-playlists/{id}"),
            QueryKey::Playlist(id) => write!(f, "playlist/{id}"),
            QueryKey::PlaylistItems(id) => write!(f, "playlist-items/{id}"),
            QueryKey::PlaylistItem(id) => write!(f, "playlist-item/{id}"),
            QueryKey::ItemQuestions(id) => write!(f, "item-questions/{id}"),
            QueryKey::QuestionCycles(id) => write!(f, "question-cycles/{id}"),
            QueryKey::QuestionDetails(id) => write!(f, "question-details/{id}"),
            QueryKey::CycleAnswers(id) => write!(f, "cycle-answers/{id}"),
            QueryKey::Categories => write!(f, "categories"),
            QueryKey::ItemCategories(id) => write!(f, "item-categories/{id}"),
        }
    }
}

/// Entries kept before the least recently used one is evicted.
pub const DEFAULT_CAPACITY: NonZeroUsize = NonZeroUsize::MIN.saturating_add(511);

#[derive(Debug)]
struct Entries {
    lru: LruCache<QueryKey, Value>,
    /// Bumped by every invalidation, whether or not the key was cached.
    epoch: u64,
}

impl Entries {
    fn bump(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
    }
}

/// Cached query results stored as JSON values.
///
/// The cache is bounded: past its capacity the least recently read entry
/// is evicted. A fetch that overlaps any invalidation is returned to its
/// caller but not cached.
#[derive(Debug)]
pub struct QueryCache {
    entries: Mutex<Entries>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl QueryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(Entries {
                lru: LruCache::new(capacity),
                epoch: 0,
            }),
        }
    }

    /// Return the cached value for `key`, or run `fetch` and cache its result.
    ///
    /// An entry that no longer deserializes as `T` is treated as a miss.
    /// Failed fetches are not cached.
    pub async fn get_or_fetch<T, E, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<serde_json::Error>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let (cached, epoch) = {
            let mut entries = self.entries.lock().await;
            (entries.lru.get(&key).cloned(), entries.epoch)
        };
        if let Some(value) = cached {
            match serde_json::from_value(value) {
                Ok(hit) => {
                    trace!(key = %key, "Cache hit");
                    return Ok(hit);
                }
                Err(e) => debug!(key = %key, error = %e, "Discarding stale cache entry"),
            }
        }

        let fresh = fetch().await?;
        let value = serde_json::to_value(&fresh)?;
        let mut entries = self.entries.lock().await;
        if entries.epoch == epoch {
            entries.lru.put(key, value);
        } else {
            debug!(key = %key, "Invalidated during fetch; not caching");
        }
        Ok(fresh)
    }

    /// Drop one entry.
    pub async fn invalidate(&self, key: &QueryKey) {
        let mut entries = self.entries.lock().await;
        entries.bump();
        if entries.lru.pop(key).is_some() {
            debug!(key = %key, "Invalidated cache entry");
        }
    }

    /// Drop several entries under one lock.
    pub async fn invalidate_all<'a>(&self, keys: impl IntoIterator<Item = &'a QueryKey>) {
        let mut entries = self.entries.lock().await;
        entries.bump();
        for key in keys {
            if entries.lru.pop(key).is_some() {
                debug!(key = %key, "Invalidated cache entry");
            }
        }
    }

    /// Drop every entry in `scope`.
    pub async fn invalidate_scope(&self, scope: QueryScope) {
        let mut entries = self.entries.lock().await;
        entries.bump();
        let doomed: Vec<QueryKey> = entries
            .lru
            .iter()
            .filter(|(key, _)| key.scope() == scope)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &doomed {
            entries.lru.pop(key);
        }
        if !doomed.is_empty() {
            debug!(scope = ?scope, count = doomed.len(), "Invalidated cache scope");
        }
    }

    pub async fn contains(&self, key: &QueryKey) -> bool {
        self.entries.lock().await.lru.contains(key)
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.lru.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.lru.is_empty()
    }

    pub async fn clear(&self) {
        let mut entries = self.entries.lock().await;
        entries.bump();
        entries.lru.clear();
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
