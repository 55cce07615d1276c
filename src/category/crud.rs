use super::types::{Category, ItemCategoryLink};
use crate::cache::QueryKey;
use crate::context::AdminContext;
use crate::error::AdminError;
use crate::store::{delete_where, insert_row, insert_rows, select_rows, Query};
use crate::utils::non_empty;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info};

#[derive(Serialize)]
struct NewCategory<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct NewLink<'a> {
    item_id: &'a str,
    category_id: &'a str,
}

/// All categories by name.
pub async fn fetch_categories(ctx: &AdminContext) -> Result<Vec<Category>, AdminError> {
    ctx.cache()
        .get_or_fetch(QueryKey::Categories, || async {
            debug!("Fetching categories");
            let query = Query::new().order("name", true);
            Ok::<_, AdminError>(select_rows(ctx.store(), &query).await?)
        })
        .await
}

pub async fn create_category(ctx: &AdminContext, name: &str) -> Result<Category, AdminError> {
    let name = non_empty(name).ok_or_else(|| AdminError::validation("Category name is required"))?;
    let category: Category = insert_row(ctx.store(), &NewCategory { name })
        .await
        .map_err(|e| {
            if e.is_unique_violation() {
                AdminError::validation(format!("Category '{name}' already exists"))
            } else {
                e.into()
            }
        })?;

    ctx.cache().invalidate(&QueryKey::Categories).await;
    info!(category_id = %category.id, name = %category.name, "Created category");
    Ok(category)
}

/// Ids of the categories linked to an item.
pub async fn fetch_item_category_ids(
    ctx: &AdminContext,
    item_id: &str,
) -> Result<Vec<String>, AdminError> {
    ctx.cache()
        .get_or_fetch(QueryKey::ItemCategories(item_id.to_string()), || async {
            debug!(item_id, "Fetching item categories");
            let links: Vec<ItemCategoryLink> =
                select_rows(ctx.store(), &Query::new().eq("item_id", item_id)).await?;
            Ok::<_, AdminError>(links.into_iter().map(|link| link.category_id).collect())
        })
        .await
}

/// Replace an item's categories with `category_ids`.
///
/// Existing links are removed first; the new set is inserted in one call,
/// so an unknown category id leaves the item with no categories.
pub async fn set_item_categories(
    ctx: &AdminContext,
    item_id: &str,
    category_ids: &[String],
) -> Result<(), AdminError> {
    let removed =
        delete_where::<ItemCategoryLink>(ctx.store(), &Query::new().eq("item_id", item_id)).await?;

    let unique: BTreeSet<&str> = category_ids.iter().map(String::as_str).collect();
    let links: Vec<NewLink<'_>> = unique
        .into_iter()
        .map(|category_id| NewLink {
            item_id,
            category_id,
        })
        .collect();

    let result = if links.is_empty() {
        Ok(Vec::new())
    } else {
        insert_rows::<ItemCategoryLink, _>(ctx.store(), &links).await
    };
    ctx.cache()
        .invalidate(&QueryKey::ItemCategories(item_id.to_string()))
        .await;
    let inserted = result?;

    info!(item_id, removed, added = inserted.len(), "Set item categories");
    Ok(())
}

#[cfg(test)]
#[path = "crud_tests.rs"]
mod tests;
