use super::{AuthEvent, Session, SessionRepository, SessionSnapshot};
use tokio::sync::watch;
use tracing::info;

/// In-process session provider driven by explicit sign-in / sign-out calls.
#[derive(Debug)]
pub struct LocalSessionProvider {
    tx: watch::Sender<SessionSnapshot>,
}

impl LocalSessionProvider {
    /// Start with `initial` as the initial session (possibly none).
    #[must_use]
    pub fn new(initial: Option<Session>) -> Self {
        let (tx, _rx) = watch::channel(SessionSnapshot {
            event: AuthEvent::InitialSession,
            session: initial,
        });
        Self { tx }
    }

    pub fn sign_in(&self, session: Session) {
        info!(user_id = %session.user_id, "Signed in");
        self.tx.send_replace(SessionSnapshot {
            event: AuthEvent::SignedIn,
            session: Some(session),
        });
    }

    pub fn sign_out(&self) {
        info!("Signed out");
        self.tx.send_replace(SessionSnapshot {
            event: AuthEvent::SignedOut,
            session: None,
        });
    }
}

impl Default for LocalSessionProvider {
    fn default() -> Self {
        Self::new(None)
    }
}

impl SessionRepository for LocalSessionProvider {
    fn current(&self) -> Option<Session> {
        self.tx.borrow().session.clone()
    }

    fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }
}
