//! Authentication state and admin profile provisioning.

mod initializer;
mod profile;
mod provider;

pub use initializer::{AuthInitializer, ProvisionOutcome};
pub use profile::{ensure_admin_profile, AdminProfile, ProfileStatus, ADMIN_ROLE};
pub use provider::LocalSessionProvider;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub email: Option<String>,
}

impl Session {
    #[must_use]
    pub fn new(user_id: impl Into<String>, email: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email,
        }
    }
}

/// Why the session last changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    InitialSession,
    SignedIn,
    SignedOut,
}

/// The latest auth event together with the session it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub event: AuthEvent,
    pub session: Option<Session>,
}

/// Source of the current session and of auth change notifications.
pub trait SessionRepository: Send + Sync + std::fmt::Debug {
    fn current(&self) -> Option<Session>;

    /// Receiver that observes every later auth change. The value seen on
    /// subscription is the latest snapshot.
    fn subscribe(&self) -> watch::Receiver<SessionSnapshot>;
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
