use crate::store::{Record, Table};
use serde::{Deserialize, Serialize};

/// Row in `categories`. Names are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

impl Record for Category {
    const TABLE: Table = Table::Categories;
}

/// Row in `playlist_item_categories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCategoryLink {
    pub id: String,
    pub item_id: String,
    pub category_id: String,
}

impl Record for ItemCategoryLink {
    const TABLE: Table = Table::PlaylistItemCategories;
}
