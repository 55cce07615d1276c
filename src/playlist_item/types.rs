use crate::store::{Record, Table};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ITEM_TYPE: &str = "video_embed";
pub const DEFAULT_ITEM_TITLE: &str = "Untitled video";

fn default_item_type() -> String {
    DEFAULT_ITEM_TYPE.to_string()
}

/// Row in `playlist_items`.
///
/// `order_index` values are dense and unique within one playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub id: String,
    pub playlist_id: String,
    #[serde(default = "default_item_type")]
    pub item_type: String,
    /// Embed URL of the video.
    pub content: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub order_index: i32,
    #[serde(default)]
    pub created_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Record for PlaylistItem {
    const TABLE: Table = Table::PlaylistItems;
}

#[derive(Debug, Clone, Default)]
pub struct CreatePlaylistItemOptions {
    pub playlist_id: String,
    pub content: String,
    /// Defaults to [`DEFAULT_ITEM_TYPE`].
    pub item_type: Option<String>,
    /// Defaults to [`DEFAULT_ITEM_TITLE`].
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateItemDetailsOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
