//! Application context shared by every service call.

use crate::cache::QueryCache;
use crate::error::AdminError;
use crate::session::{Session, SessionRepository};
use crate::store::DataStore;
use std::sync::Arc;
use std::time::Duration;

/// Defaults applied to newly created content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDefaults {
    /// Language of new questions.
    pub language: String,
    /// Duration of new cycles, in seconds.
    pub cycle_duration_seconds: u32,
    /// How long a soft-deleted folder is kept before it may be purged.
    pub folder_grace_period: Duration,
}

pub const DEFAULT_LANGUAGE: &str = "es";
pub const DEFAULT_CYCLE_DURATION_SECONDS: u32 = 30;
pub const DEFAULT_FOLDER_GRACE_PERIOD: Duration = Duration::from_secs(30 * 24 * 60 * 60);

impl Default for ContentDefaults {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            cycle_duration_seconds: DEFAULT_CYCLE_DURATION_SECONDS,
            folder_grace_period: DEFAULT_FOLDER_GRACE_PERIOD,
        }
    }
}

/// Store, cache and session handles for one admin process.
#[derive(Debug)]
pub struct AdminContext {
    store: Arc<dyn DataStore>,
    cache: QueryCache,
    sessions: Arc<dyn SessionRepository>,
    defaults: ContentDefaults,
}

impl AdminContext {
    #[must_use]
    pub fn new(
        store: Arc<dyn DataStore>,
        sessions: Arc<dyn SessionRepository>,
        defaults: ContentDefaults,
    ) -> Self {
        Self {
            store,
            cache: QueryCache::new(),
            sessions,
            defaults,
        }
    }

    #[must_use]
    pub fn store(&self) -> &dyn DataStore {
        self.store.as_ref()
    }

    #[must_use]
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    #[must_use]
    pub fn sessions(&self) -> &dyn SessionRepository {
        self.sessions.as_ref()
    }

    #[must_use]
    pub fn defaults(&self) -> &ContentDefaults {
        &self.defaults
    }

    #[must_use]
    pub fn current_session(&self) -> Option<Session> {
        self.sessions.current()
    }

    /// Id of the signed-in user, recorded as `created_by` on new rows.
    pub fn require_author(&self) -> Result<String, AdminError> {
        self.current_session()
            .map(|session| session.user_id)
            .ok_or(AdminError::AuthRequired)
    }
}
