mod crud;
mod types;

pub use crud::{
    create_playlist, delete_playlist, fetch_playlist, fetch_playlists, fetch_world_playlists,
    update_playlist, update_playlist_status,
};
pub use types::{CreatePlaylistOptions, Playlist, UpdatePlaylistOptions};
