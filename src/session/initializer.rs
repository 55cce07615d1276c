use super::{ensure_admin_profile, AuthEvent, ProfileStatus, SessionSnapshot};
use crate::context::AdminContext;
use crate::error::AdminError;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Result of provisioning one user's profile.
#[derive(Debug)]
pub struct ProvisionOutcome {
    pub user_id: String,
    pub result: Result<ProfileStatus, AdminError>,
}

/// Background task that provisions an admin profile for each signed-in user.
///
/// The initial session is handled first; afterwards every `SignedIn` event
/// is handled once per user id until that user signs out.
#[derive(Debug)]
pub struct AuthInitializer {
    handle: JoinHandle<()>,
    outcomes: mpsc::UnboundedReceiver<ProvisionOutcome>,
}

impl AuthInitializer {
    #[must_use]
    pub fn spawn(ctx: Arc<AdminContext>) -> Self {
        let (tx, outcomes) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run(ctx, tx));
        Self { handle, outcomes }
    }

    /// Wait for the next provisioning result. `None` once the task stopped.
    pub async fn next_outcome(&mut self) -> Option<ProvisionOutcome> {
        self.outcomes.recv().await
    }

    pub fn shutdown(self) {
        self.handle.abort();
    }
}

async fn run(ctx: Arc<AdminContext>, tx: mpsc::UnboundedSender<ProvisionOutcome>) {
    let mut rx = ctx.sessions().subscribe();
    let mut provisioned_for: Option<String> = None;

    let initial = rx.borrow_and_update().clone();
    handle_snapshot(&ctx, &tx, &mut provisioned_for, initial).await;

    while rx.changed().await.is_ok() {
        let snapshot = rx.borrow_and_update().clone();
        handle_snapshot(&ctx, &tx, &mut provisioned_for, snapshot).await;
    }
    debug!("Session provider closed; stopping auth initializer");
}

async fn handle_snapshot(
    ctx: &AdminContext,
    tx: &mpsc::UnboundedSender<ProvisionOutcome>,
    provisioned_for: &mut Option<String>,
    snapshot: SessionSnapshot,
) {
    match (snapshot.event, snapshot.session) {
        (AuthEvent::SignedOut, _) => *provisioned_for = None,
        (AuthEvent::InitialSession | AuthEvent::SignedIn, Some(session)) => {
            if provisioned_for.as_deref() == Some(session.user_id.as_str()) {
                return;
            }
            let result = ensure_admin_profile(ctx.store(), &session).await;
            if let Err(e) = &result {
                warn!(user_id = %session.user_id, "Failed to provision admin profile: {}", e);
            } else {
                *provisioned_for = Some(session.user_id.clone());
            }
            let outcome = ProvisionOutcome {
                user_id: session.user_id,
                result,
            };
            if tx.send(outcome).is_err() {
                debug!("No listener for provisioning outcomes");
            }
        }
        (AuthEvent::InitialSession | AuthEvent::SignedIn, None) => {}
    }
}
