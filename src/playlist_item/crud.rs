use super::types::{
    CreatePlaylistItemOptions, PlaylistItem, UpdateItemDetailsOptions, DEFAULT_ITEM_TITLE,
    DEFAULT_ITEM_TYPE,
};
use crate::cache::{QueryKey, QueryScope};
use crate::context::AdminContext;
use crate::error::AdminError;
use crate::store::{
    delete_where, insert_row, next_position, select_maybe_single, select_rows, update_row,
    Procedure, Query, Table,
};
use crate::utils::non_empty;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Serialize)]
struct NewPlaylistItem<'a> {
    playlist_id: &'a str,
    item_type: &'a str,
    content: &'a str,
    title: &'a str,
    description: Option<&'a str>,
    order_index: i32,
    created_by: &'a str,
}

/// Items of a playlist in display order.
pub async fn fetch_playlist_items(
    ctx: &AdminContext,
    playlist_id: &str,
) -> Result<Vec<PlaylistItem>, AdminError> {
    ctx.cache()
        .get_or_fetch(QueryKey::PlaylistItems(playlist_id.to_string()), || async {
            debug!(playlist_id, "Fetching playlist items");
            let query = Query::new()
                .eq("playlist_id", playlist_id)
                .order("order_index", true);
            Ok::<_, AdminError>(select_rows(ctx.store(), &query).await?)
        })
        .await
}

pub async fn fetch_playlist_item(ctx: &AdminContext, id: &str) -> Result<PlaylistItem, AdminError> {
    ctx.cache()
        .get_or_fetch(QueryKey::PlaylistItem(id.to_string()), || async {
            debug!(item_id = id, "Fetching playlist item");
            find_item(ctx, id).await
        })
        .await
}

pub(super) async fn find_item(ctx: &AdminContext, id: &str) -> Result<PlaylistItem, AdminError> {
    select_maybe_single::<PlaylistItem>(ctx.store(), &Query::by_id(id))
        .await?
        .ok_or_else(|| AdminError::not_found(Table::PlaylistItems, id))
}

/// Append an item to the end of its playlist.
pub async fn create_playlist_item(
    ctx: &AdminContext,
    options: CreatePlaylistItemOptions,
) -> Result<PlaylistItem, AdminError> {
    let author = ctx.require_author()?;
    let content = non_empty(&options.content)
        .ok_or_else(|| AdminError::validation("Item content (embed URL) is required"))?;
    let order_index = next_position(
        ctx.store(),
        Table::PlaylistItems,
        "playlist_id",
        &options.playlist_id,
    )
    .await?;

    let row = NewPlaylistItem {
        playlist_id: &options.playlist_id,
        item_type: options
            .item_type
            .as_deref()
            .and_then(non_empty)
            .unwrap_or(DEFAULT_ITEM_TYPE),
        content,
        title: options
            .title
            .as_deref()
            .and_then(non_empty)
            .unwrap_or(DEFAULT_ITEM_TITLE),
        description: options.description.as_deref().and_then(non_empty),
        order_index,
        created_by: &author,
    };
    let item: PlaylistItem = insert_row(ctx.store(), &row).await?;

    ctx.cache()
        .invalidate(&QueryKey::PlaylistItems(item.playlist_id.clone()))
        .await;
    info!(
        item_id = %item.id,
        playlist_id = %item.playlist_id,
        order_index = item.order_index,
        "Created playlist item"
    );
    Ok(item)
}

pub async fn update_playlist_item_details(
    ctx: &AdminContext,
    id: &str,
    options: UpdateItemDetailsOptions,
) -> Result<PlaylistItem, AdminError> {
    let item: PlaylistItem = update_row(ctx.store(), id, &options).await?;
    ctx.cache()
        .invalidate_all(&[
            QueryKey::PlaylistItems(item.playlist_id.clone()),
            QueryKey::PlaylistItem(item.id.clone()),
        ])
        .await;
    info!(item_id = %id, "Updated playlist item details");
    Ok(item)
}

/// Delete an item with its questions, then close the gap it leaves in the
/// playlist order.
pub async fn delete_playlist_item(ctx: &AdminContext, id: &str) -> Result<(), AdminError> {
    let existing: Option<PlaylistItem> =
        select_maybe_single(ctx.store(), &Query::by_id(id)).await?;
    let Some(item) = existing else {
        debug!(item_id = %id, "Playlist item already absent");
        return Ok(());
    };

    delete_where::<PlaylistItem>(ctx.store(), &Query::by_id(id)).await?;
    let compacted = ctx
        .store()
        .call(Procedure::CompactPlaylistItemsOrder {
            playlist_id: item.playlist_id.clone(),
        })
        .await?;

    let cache = ctx.cache();
    cache
        .invalidate_all(&[
            QueryKey::PlaylistItems(item.playlist_id.clone()),
            QueryKey::ItemQuestions(item.id.clone()),
            QueryKey::ItemCategories(item.id.clone()),
        ])
        .await;
    // Compaction may have moved any sibling.
    cache.invalidate_scope(QueryScope::PlaylistItem).await;
    cache.invalidate_scope(QueryScope::QuestionDetails).await;
    info!(item_id = %id, playlist_id = %item.playlist_id, %compacted, "Deleted playlist item");
    Ok(())
}

#[cfg(test)]
#[path = "crud_tests.rs"]
mod tests;
