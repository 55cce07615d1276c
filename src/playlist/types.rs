use crate::store::{Record, Table};
use serde::{Deserialize, Serialize};

/// Row in `playlists`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub mundo_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub order_index: i32,
    pub is_active: bool,
    #[serde(default)]
    pub created_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Record for Playlist {
    const TABLE: Table = Table::Playlists;
}

#[derive(Debug, Clone, Default)]
pub struct CreatePlaylistOptions {
    pub mundo_id: String,
    pub name: String,
    pub description: Option<String>,
}

/// Editable playlist details.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdatePlaylistOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
