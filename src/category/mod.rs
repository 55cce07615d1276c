mod crud;
mod types;

pub use crud::{create_category, fetch_categories, fetch_item_category_ids, set_item_categories};
pub use types::{Category, ItemCategoryLink};
