use crate::store::{Record, Table};
use serde::{Deserialize, Serialize};

/// Row in `playlist_folders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub mundo_id: String,
    pub name: String,
    pub order_index: i32,
    pub is_pinned: bool,
    pub is_deleted: bool,
    /// Set while the folder sits in the trash.
    #[serde(default)]
    pub deleted_at: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Record for Folder {
    const TABLE: Table = Table::Folders;
}

#[derive(Debug, Clone, Default)]
pub struct CreateFolderOptions {
    pub mundo_id: String,
    pub name: String,
}
