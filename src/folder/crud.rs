use super::types::{CreateFolderOptions, Folder};
use crate::cache::{QueryKey, QueryScope};
use crate::context::AdminContext;
use crate::error::AdminError;
use crate::store::{delete_where, insert_row, select_rows, update_row, Query};
use crate::utils::{non_empty, now_iso};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Serialize)]
struct NewFolder<'a> {
    mundo_id: &'a str,
    name: &'a str,
    order_index: i32,
    is_pinned: bool,
    is_deleted: bool,
    created_by: &'a str,
}

/// Live folders of a world: pinned first, then by name.
pub async fn fetch_folders(ctx: &AdminContext, world_id: &str) -> Result<Vec<Folder>, AdminError> {
    ctx.cache()
        .get_or_fetch(QueryKey::Folders(world_id.to_string()), || async {
            debug!(world_id, "Fetching folders");
            let query = Query::new()
                .eq("mundo_id", world_id)
                .eq("is_deleted", false)
                .order("is_pinned", false)
                .order("name", true);
            Ok::<_, AdminError>(select_rows(ctx.store(), &query).await?)
        })
        .await
}

/// Soft-deleted folders of a world, most recently deleted first.
pub async fn fetch_deleted_folders(
    ctx: &AdminContext,
    world_id: &str,
) -> Result<Vec<Folder>, AdminError> {
    let query = Query::new()
        .eq("mundo_id", world_id)
        .eq("is_deleted", true)
        .order("deleted_at", false);
    Ok(select_rows(ctx.store(), &query).await?)
}

pub async fn create_folder(
    ctx: &AdminContext,
    options: CreateFolderOptions,
) -> Result<Folder, AdminError> {
    let author = ctx.require_author()?;
    let name = non_empty(&options.name)
        .ok_or_else(|| AdminError::validation("Folder name is required"))?;

    let row = NewFolder {
        mundo_id: &options.mundo_id,
        name,
        order_index: 0,
        is_pinned: false,
        is_deleted: false,
        created_by: &author,
    };
    let folder: Folder = insert_row(ctx.store(), &row).await?;

    invalidate_world_folders(ctx, &folder).await;
    info!(folder_id = %folder.id, world_id = %folder.mundo_id, "Created folder");
    Ok(folder)
}

pub async fn update_folder_pin(
    ctx: &AdminContext,
    id: &str,
    is_pinned: bool,
) -> Result<Folder, AdminError> {
    let folder: Folder = update_row(ctx.store(), id, &json!({ "is_pinned": is_pinned })).await?;
    invalidate_world_folders(ctx, &folder).await;
    info!(folder_id = %id, is_pinned, "Updated folder pin");
    Ok(folder)
}

pub async fn update_folder_name(
    ctx: &AdminContext,
    id: &str,
    name: &str,
) -> Result<Folder, AdminError> {
    let name = non_empty(name).ok_or_else(|| AdminError::validation("Folder name cannot be empty"))?;
    let folder: Folder = update_row(ctx.store(), id, &json!({ "name": name })).await?;
    invalidate_world_folders(ctx, &folder).await;
    info!(folder_id = %id, "Renamed folder");
    Ok(folder)
}

/// Move a folder to the trash. It stays restorable for the grace period.
pub async fn soft_delete_folder(ctx: &AdminContext, id: &str) -> Result<Folder, AdminError> {
    let patch = json!({ "is_deleted": true, "deleted_at": now_iso() });
    let folder: Folder = update_row(ctx.store(), id, &patch).await?;
    invalidate_world_folders(ctx, &folder).await;
    info!(folder_id = %id, "Moved folder to trash");
    Ok(folder)
}

pub async fn restore_folder(ctx: &AdminContext, id: &str) -> Result<Folder, AdminError> {
    let patch = json!({ "is_deleted": false, "deleted_at": Value::Null });
    let folder: Folder = update_row(ctx.store(), id, &patch).await?;
    invalidate_world_folders(ctx, &folder).await;
    info!(folder_id = %id, "Restored folder");
    Ok(folder)
}

/// Hard-delete folders that have been in the trash longer than the
/// configured grace period. Returns how many were removed.
pub async fn purge_deleted_folders(ctx: &AdminContext) -> Result<usize, AdminError> {
    purge_deleted_before(ctx, ctx.defaults().folder_grace_period).await
}

pub(crate) async fn purge_deleted_before(
    ctx: &AdminContext,
    grace_period: Duration,
) -> Result<usize, AdminError> {
    let grace = chrono::Duration::from_std(grace_period)
        .map_err(|e| AdminError::validation(format!("Grace period out of range: {e}")))?;
    let cutoff = Utc::now()
        .checked_sub_signed(grace)
        .ok_or_else(|| AdminError::validation("Grace period reaches before the epoch"))?
        .to_rfc3339_opts(SecondsFormat::Nanos, true);

    let query = Query::new()
        .eq("is_deleted", true)
        .lt("deleted_at", cutoff.as_str());
    let removed = delete_where::<Folder>(ctx.store(), &query).await?;

    if removed > 0 {
        ctx.cache().invalidate_scope(QueryScope::Folders).await;
        info!(count = removed, "Purged deleted folders");
    }
    Ok(removed)
}

async fn invalidate_world_folders(ctx: &AdminContext, folder: &Folder) {
    ctx.cache()
        .invalidate(&QueryKey::Folders(folder.mundo_id.clone()))
        .await;
}

#[cfg(test)]
#[path = "crud_tests.rs"]
mod tests;
