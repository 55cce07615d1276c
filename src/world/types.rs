use crate::store::{Record, Table};
use serde::{Deserialize, Serialize};

/// Row in `mundos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub created_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Record for World {
    const TABLE: Table = Table::Worlds;
}

#[derive(Debug, Clone)]
pub struct CreateWorldOptions {
    pub name: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub is_active: bool,
}

impl Default for CreateWorldOptions {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            thumbnail_url: None,
            is_active: true,
        }
    }
}

/// Fields to change; `None` leaves a field as it is.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateWorldOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
