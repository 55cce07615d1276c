//! Fixtures shared by unit tests.

use crate::context::{AdminContext, ContentDefaults};
use crate::session::{LocalSessionProvider, Session};
use crate::store::SqliteStore;
use std::sync::Arc;

pub(crate) const TEST_USER: &str = "admin-1";

pub(crate) struct TestEnv {
    pub ctx: AdminContext,
    pub store: Arc<SqliteStore>,
    pub sessions: Arc<LocalSessionProvider>,
}

pub(crate) fn signed_in() -> TestEnv {
    env(Some(Session::new(TEST_USER, Some("admin@example.com".into()))))
}

pub(crate) fn signed_out() -> TestEnv {
    env(None)
}

fn env(session: Option<Session>) -> TestEnv {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let sessions = Arc::new(LocalSessionProvider::new(session));
    let ctx = AdminContext::new(store.clone(), sessions.clone(), ContentDefaults::default());
    TestEnv {
        ctx,
        store,
        sessions,
    }
}

/// Create a world with one playlist and return the playlist id.
pub(crate) async fn playlist(env: &TestEnv) -> String {
    let world = crate::world::create_world(
        &env.ctx,
        crate::world::CreateWorldOptions {
            name: "Mundo".into(),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    crate::playlist::create_playlist(
        &env.ctx,
        crate::playlist::CreatePlaylistOptions {
            mundo_id: world.id,
            name: "Lista".into(),
            description: None,
        },
    )
    .await
    .unwrap()
    .id
}

/// Append a titled video item to `playlist_id`.
pub(crate) async fn item(
    env: &TestEnv,
    playlist_id: &str,
    title: &str,
) -> crate::playlist_item::PlaylistItem {
    crate::playlist_item::create_playlist_item(
        &env.ctx,
        crate::playlist_item::CreatePlaylistItemOptions {
            playlist_id: playlist_id.to_string(),
            content: format!("https://video.example/{title}"),
            title: Some(title.to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
}
