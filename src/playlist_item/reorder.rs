//! Moving an item one position up or down within its playlist.
//!
//! The neighbor is looked up first; the exchange itself is a single atomic
//! store procedure so exactly two rows change.

use super::crud::find_item;
use super::types::PlaylistItem;
use crate::cache::QueryKey;
use crate::context::AdminContext;
use crate::error::AdminError;
use crate::store::{select_maybe_single, Procedure, Query};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderDirection {
    /// Towards order index 0.
    Up,
    Down,
}

impl fmt::Display for ReorderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReorderDirection::Up => write!(f, "up"),
            ReorderDirection::Down => write!(f, "down"),
        }
    }
}

impl FromStr for ReorderDirection {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "up" => Ok(ReorderDirection::Up),
            "down" => Ok(ReorderDirection::Down),
            other => Err(AdminError::validation(format!(
                "Unknown direction '{other}', expected 'up' or 'down'"
            ))),
        }
    }
}

/// Result of a reorder request that reached the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReorderOutcome {
    /// The item and its neighbor exchanged order indices.
    Moved {
        item_id: String,
        neighbor_id: String,
        from: i32,
        to: i32,
    },
    /// Already first (up) or last (down); nothing changed.
    AtBoundary,
}

/// Move `item_id` one step in `direction`.
///
/// On failure nothing is invalidated, so cached lists keep showing the
/// order the store still has.
pub async fn update_playlist_item_order(
    ctx: &AdminContext,
    item_id: &str,
    direction: ReorderDirection,
) -> Result<ReorderOutcome, AdminError> {
    let item = find_item(ctx, item_id).await?;
    debug!(
        item_id,
        order_index = item.order_index,
        playlist_id = %item.playlist_id,
        %direction,
        "Looking up neighbor"
    );

    let base = Query::new().eq("playlist_id", item.playlist_id.as_str());
    let query = match direction {
        ReorderDirection::Up => base
            .lt("order_index", item.order_index)
            .order("order_index", false),
        ReorderDirection::Down => base
            .gt("order_index", item.order_index)
            .order("order_index", true),
    };
    let neighbor: Option<PlaylistItem> = select_maybe_single(ctx.store(), &query).await?;

    let Some(neighbor) = neighbor else {
        info!(item_id, %direction, "Item already at playlist boundary");
        return Ok(ReorderOutcome::AtBoundary);
    };

    ctx.store()
        .call(Procedure::SwapPlaylistItemsOrder {
            item1_id: item.id.clone(),
            item2_id: neighbor.id.clone(),
            playlist_id: item.playlist_id.clone(),
        })
        .await?;

    ctx.cache()
        .invalidate_all(&[
            QueryKey::PlaylistItems(item.playlist_id.clone()),
            QueryKey::PlaylistItem(item.id.clone()),
            QueryKey::PlaylistItem(neighbor.id.clone()),
        ])
        .await;
    info!(
        item_id,
        neighbor_id = %neighbor.id,
        from = item.order_index,
        to = neighbor.order_index,
        "Swapped playlist item order"
    );

    Ok(ReorderOutcome::Moved {
        item_id: item.id,
        neighbor_id: neighbor.id,
        from: item.order_index,
        to: neighbor.order_index,
    })
}

#[cfg(test)]
#[path = "reorder_tests.rs"]
mod tests;
