use super::types::{CreateWorldOptions, UpdateWorldOptions, World};
use crate::cache::{QueryKey, QueryScope};
use crate::context::AdminContext;
use crate::error::AdminError;
use crate::store::{delete_where, insert_row, select_maybe_single, select_rows, update_row, Query, Table};
use crate::utils::non_empty;
use serde::Serialize;
use tracing::{debug, info};

/// Key families whose rows hang below a world and go with it on delete.
const WORLD_DESCENDANT_SCOPES: [QueryScope; 11] = [
    QueryScope::Folders,
    QueryScope::Playlists,
    QueryScope::WorldPlaylists,
    QueryScope::Playlist,
    QueryScope::PlaylistItems,
    QueryScope::PlaylistItem,
    QueryScope::ItemQuestions,
    QueryScope::QuestionCycles,
    QueryScope::QuestionDetails,
    QueryScope::CycleAnswers,
    QueryScope::ItemCategories,
];

#[derive(Serialize)]
struct NewWorld<'a> {
    name: &'a str,
    description: &'a str,
    thumbnail_url: Option<&'a str>,
    is_active: bool,
    created_by: &'a str,
}

/// All worlds, newest first.
pub async fn fetch_worlds(ctx: &AdminContext) -> Result<Vec<World>, AdminError> {
    ctx.cache()
        .get_or_fetch(QueryKey::Worlds, || async {
            debug!("Fetching worlds");
            let query = Query::new().order("created_at", false);
            Ok::<_, AdminError>(select_rows(ctx.store(), &query).await?)
        })
        .await
}

pub async fn fetch_world(ctx: &AdminContext, id: &str) -> Result<World, AdminError> {
    select_maybe_single(ctx.store(), &Query::by_id(id))
        .await?
        .ok_or_else(|| AdminError::not_found(Table::Worlds, id))
}

pub async fn create_world(
    ctx: &AdminContext,
    options: CreateWorldOptions,
) -> Result<World, AdminError> {
    let author = ctx.require_author()?;
    let name = non_empty(&options.name)
        .ok_or_else(|| AdminError::validation("World name is required"))?;

    let row = NewWorld {
        name,
        description: options.description.trim(),
        thumbnail_url: options.thumbnail_url.as_deref(),
        is_active: options.is_active,
        created_by: &author,
    };
    let world: World = insert_row(ctx.store(), &row).await?;

    ctx.cache().invalidate(&QueryKey::Worlds).await;
    info!(world_id = %world.id, name = %world.name, "Created world");
    Ok(world)
}

pub async fn update_world(
    ctx: &AdminContext,
    id: &str,
    mut options: UpdateWorldOptions,
) -> Result<World, AdminError> {
    if let Some(name) = options.name.as_deref() {
        let trimmed = non_empty(name)
            .ok_or_else(|| AdminError::validation("World name cannot be empty"))?;
        options.name = Some(trimmed.to_string());
    }

    let world: World = update_row(ctx.store(), id, &options).await?;

    ctx.cache().invalidate(&QueryKey::Worlds).await;
    info!(world_id = %id, "Updated world");
    Ok(world)
}

/// Delete a world together with its folders, playlists and their content.
pub async fn delete_world(ctx: &AdminContext, id: &str) -> Result<(), AdminError> {
    let removed = delete_where::<World>(ctx.store(), &Query::by_id(id)).await?;

    let cache = ctx.cache();
    cache.invalidate(&QueryKey::Worlds).await;
    for scope in WORLD_DESCENDANT_SCOPES {
        cache.invalidate_scope(scope).await;
    }

    if removed == 0 {
        debug!(world_id = %id, "World already absent");
    } else {
        info!(world_id = %id, "Deleted world");
    }
    Ok(())
}

#[cfg(test)]
#[path = "crud_tests.rs"]
mod tests;
