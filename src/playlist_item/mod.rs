//! Playlist items and their ordering.

mod crud;
mod reorder;
mod types;

pub use crud::{
    create_playlist_item, delete_playlist_item, fetch_playlist_item, fetch_playlist_items,
    update_playlist_item_details,
};
pub use reorder::{update_playlist_item_order, ReorderDirection, ReorderOutcome};
pub use types::{
    CreatePlaylistItemOptions, PlaylistItem, UpdateItemDetailsOptions, DEFAULT_ITEM_TITLE,
    DEFAULT_ITEM_TYPE,
};
