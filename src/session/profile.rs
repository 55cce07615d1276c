use super::Session;
use crate::error::AdminError;
use crate::store::{insert_row, select_maybe_single, DataStore, Query, Record, Table};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Role written for every provisioned profile.
pub const ADMIN_ROLE: &str = "admin";

/// Row in `admin_profiles`. The id is the user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminProfile {
    pub id: String,
    pub role: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl Record for AdminProfile {
    const TABLE: Table = Table::AdminProfiles;
}

/// Outcome of [`ensure_admin_profile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileStatus {
    /// A profile for the user was already present.
    Existing,
    Created,
    /// The insert raced with another one and lost on the unique key.
    AlreadySatisfied,
}

/// Make sure the signed-in user has an admin profile row.
pub async fn ensure_admin_profile(
    store: &dyn DataStore,
    session: &Session,
) -> Result<ProfileStatus, AdminError> {
    let existing: Option<AdminProfile> =
        select_maybe_single(store, &Query::by_id(&session.user_id)).await?;
    if existing.is_some() {
        debug!(user_id = %session.user_id, "Admin profile already exists");
        return Ok(ProfileStatus::Existing);
    }

    let profile = AdminProfile {
        id: session.user_id.clone(),
        role: ADMIN_ROLE.to_string(),
        email: session.email.clone(),
    };
    match insert_row::<AdminProfile, _>(store, &profile).await {
        Ok(_) => {
            info!(user_id = %session.user_id, "Created admin profile");
            Ok(ProfileStatus::Created)
        }
        Err(e) if e.is_unique_violation() => {
            warn!(user_id = %session.user_id, "Admin profile created concurrently: {}", e);
            Ok(ProfileStatus::AlreadySatisfied)
        }
        Err(e) => Err(e.into()),
    }
}
