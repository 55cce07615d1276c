use super::types::{CreatePlaylistOptions, Playlist, UpdatePlaylistOptions};
use crate::cache::{QueryKey, QueryScope};
use crate::context::AdminContext;
use crate::error::AdminError;
use crate::store::{
    delete_where, insert_row, next_position, select_maybe_single, select_rows, update_row, Query,
    Table,
};
use crate::utils::non_empty;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

#[derive(Serialize)]
struct NewPlaylist<'a> {
    mundo_id: &'a str,
    name: &'a str,
    description: &'a str,
    order_index: i32,
    is_active: bool,
    created_by: &'a str,
}

/// Every playlist, grouped by world and ordered within it.
pub async fn fetch_playlists(ctx: &AdminContext) -> Result<Vec<Playlist>, AdminError> {
    ctx.cache()
        .get_or_fetch(QueryKey::Playlists, || async {
            debug!("Fetching playlists");
            let query = Query::new().order("mundo_id", true).order("order_index", true);
            Ok::<_, AdminError>(select_rows(ctx.store(), &query).await?)
        })
        .await
}

pub async fn fetch_world_playlists(
    ctx: &AdminContext,
    world_id: &str,
) -> Result<Vec<Playlist>, AdminError> {
    ctx.cache()
        .get_or_fetch(QueryKey::WorldPlaylists(world_id.to_string()), || async {
            debug!(world_id, "Fetching world playlists");
            let query = Query::new().eq("mundo_id", world_id).order("order_index", true);
            Ok::<_, AdminError>(select_rows(ctx.store(), &query).await?)
        })
        .await
}

pub async fn fetch_playlist(ctx: &AdminContext, id: &str) -> Result<Playlist, AdminError> {
    ctx.cache()
        .get_or_fetch(QueryKey::Playlist(id.to_string()), || async {
            debug!(playlist_id = id, "Fetching playlist");
            select_maybe_single::<Playlist>(ctx.store(), &Query::by_id(id))
                .await?
                .ok_or_else(|| AdminError::not_found(Table::Playlists, id))
        })
        .await
}

/// Create an active playlist at the end of its world.
pub async fn create_playlist(
    ctx: &AdminContext,
    options: CreatePlaylistOptions,
) -> Result<Playlist, AdminError> {
    let author = ctx.require_author()?;
    let name = non_empty(&options.name)
        .ok_or_else(|| AdminError::validation("Playlist name is required"))?;
    let order_index =
        next_position(ctx.store(), Table::Playlists, "mundo_id", &options.mundo_id).await?;

    let row = NewPlaylist {
        mundo_id: &options.mundo_id,
        name,
        description: options.description.as_deref().unwrap_or_default(),
        order_index,
        is_active: true,
        created_by: &author,
    };
    let playlist: Playlist = insert_row(ctx.store(), &row).await?;

    invalidate_playlist(ctx, &playlist).await;
    info!(playlist_id = %playlist.id, world_id = %playlist.mundo_id, "Created playlist");
    Ok(playlist)
}

pub async fn update_playlist(
    ctx: &AdminContext,
    id: &str,
    mut options: UpdatePlaylistOptions,
) -> Result<Playlist, AdminError> {
    if let Some(name) = options.name.as_deref() {
        let trimmed = non_empty(name)
            .ok_or_else(|| AdminError::validation("Playlist name cannot be empty"))?;
        options.name = Some(trimmed.to_string());
    }
    let playlist: Playlist = update_row(ctx.store(), id, &options).await?;
    invalidate_playlist(ctx, &playlist).await;
    info!(playlist_id = %id, "Updated playlist");
    Ok(playlist)
}

pub async fn update_playlist_status(
    ctx: &AdminContext,
    id: &str,
    is_active: bool,
) -> Result<Playlist, AdminError> {
    let playlist: Playlist = update_row(ctx.store(), id, &json!({ "is_active": is_active })).await?;
    invalidate_playlist(ctx, &playlist).await;
    info!(playlist_id = %id, is_active, "Updated playlist status");
    Ok(playlist)
}

/// Delete a playlist and its items.
pub async fn delete_playlist(ctx: &AdminContext, id: &str) -> Result<(), AdminError> {
    let existing: Option<Playlist> = select_maybe_single(ctx.store(), &Query::by_id(id)).await?;
    let Some(playlist) = existing else {
        debug!(playlist_id = %id, "Playlist already absent");
        return Ok(());
    };

    delete_where::<Playlist>(ctx.store(), &Query::by_id(id)).await?;

    invalidate_playlist(ctx, &playlist).await;
    let cache = ctx.cache();
    cache.invalidate(&QueryKey::PlaylistItems(id.to_string())).await;
    for scope in [
        QueryScope::PlaylistItem,
        QueryScope::ItemQuestions,
        QueryScope::QuestionCycles,
        QueryScope::QuestionDetails,
        QueryScope::CycleAnswers,
        QueryScope::ItemCategories,
    ] {
        cache.invalidate_scope(scope).await;
    }
    info!(playlist_id = %id, "Deleted playlist");
    Ok(())
}

async fn invalidate_playlist(ctx: &AdminContext, playlist: &Playlist) {
    ctx.cache()
        .invalidate_all(&[
            QueryKey::Playlists,
            QueryKey::WorldPlaylists(playlist.mundo_id.clone()),
            QueryKey::Playlist(playlist.id.clone()),
        ])
        .await;
}

#[cfg(test)]
#[path = "crud_tests.rs"]
mod tests;
