//! Table catalogue: names and the columns each table accepts.

use super::StoreError;
use serde::{Deserialize, Serialize};

/// A table in the content store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Table {
    #[serde(rename = "mundos")]
    Worlds,
    #[serde(rename = "playlist_folders")]
    Folders,
    #[serde(rename = "playlists")]
    Playlists,
    #[serde(rename = "playlist_items")]
    PlaylistItems,
    #[serde(rename = "item_questions")]
    ItemQuestions,
    #[serde(rename = "question_cycles")]
    QuestionCycles,
    #[serde(rename = "cycle_answers")]
    CycleAnswers,
    #[serde(rename = "categories")]
    Categories,
    #[serde(rename = "playlist_item_categories")]
    PlaylistItemCategories,
    #[serde(rename = "admin_profiles")]
    AdminProfiles,
}

/// How a column's SQLite value maps back to JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    /// Stored as 0/1.
    Bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

const fn text(name: &'static str) -> Column {
    Column {
        name,
        kind: ColumnKind::Text,
    }
}

const fn int(name: &'static str) -> Column {
    Column {
        name,
        kind: ColumnKind::Integer,
    }
}

const fn flag(name: &'static str) -> Column {
    Column {
        name,
        kind: ColumnKind::Bool,
    }
}

const ID: Column = text("id");
const CREATED_BY: Column = text("created_by");
const CREATED_AT: Column = text("created_at");
const UPDATED_AT: Column = text("updated_at");

static WORLDS: [Column; 8] = [
    ID,
    text("name"),
    text("description"),
    text("thumbnail_url"),
    flag("is_active"),
    CREATED_BY,
    CREATED_AT,
    UPDATED_AT,
];

static FOLDERS: [Column; 10] = [
    ID,
    text("mundo_id"),
    text("name"),
    int("order_index"),
    flag("is_pinned"),
    flag("is_deleted"),
    text("deleted_at"),
    CREATED_BY,
    CREATED_AT,
    UPDATED_AT,
];

static PLAYLISTS: [Column; 9] = [
    ID,
    text("mundo_id"),
    text("name"),
    text("description"),
    int("order_index"),
    flag("is_active"),
    CREATED_BY,
    CREATED_AT,
    UPDATED_AT,
];

static PLAYLIST_ITEMS: [Column; 10] = [
    ID,
    text("playlist_id"),
    text("item_type"),
    text("content"),
    text("title"),
    text("description"),
    int("order_index"),
    CREATED_BY,
    CREATED_AT,
    UPDATED_AT,
];

static ITEM_QUESTIONS: [Column; 12] = [
    ID,
    text("item_id"),
    text("question_text"),
    text("question_type"),
    int("display_timestamp"),
    int("order_index"),
    text("language"),
    flag("show_subtitles"),
    flag("show_question"),
    CREATED_BY,
    CREATED_AT,
    UPDATED_AT,
];

static QUESTION_CYCLES: [Column; 9] = [
    ID,
    text("item_question_id"),
    int("delay_seconds"),
    int("duration_seconds"),
    int("order_index"),
    flag("is_active"),
    CREATED_BY,
    CREATED_AT,
    UPDATED_AT,
];

static CYCLE_ANSWERS: [Column; 8] = [
    ID,
    text("question_cycle_id"),
    text("answer_text"),
    flag("is_correct"),
    int("ondas_reward"),
    int("order_index"),
    CREATED_AT,
    UPDATED_AT,
];

static CATEGORIES: [Column; 4] = [ID, text("name"), CREATED_AT, UPDATED_AT];

static ITEM_CATEGORIES: [Column; 5] = [
    ID,
    text("item_id"),
    text("category_id"),
    CREATED_AT,
    UPDATED_AT,
];

static ADMIN_PROFILES: [Column; 5] = [ID, text("role"), text("email"), CREATED_AT, UPDATED_AT];

impl Table {
    pub const ALL: [Table; 10] = [
        Table::Worlds,
        Table::Folders,
        Table::Playlists,
        Table::PlaylistItems,
        Table::ItemQuestions,
        Table::QuestionCycles,
        Table::CycleAnswers,
        Table::Categories,
        Table::PlaylistItemCategories,
        Table::AdminProfiles,
    ];

    /// The table name as exposed by the hosted backend.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Table::Worlds => "mundos",
            Table::Folders => "playlist_folders",
            Table::Playlists => "playlists",
            Table::PlaylistItems => "playlist_items",
            Table::ItemQuestions => "item_questions",
            Table::QuestionCycles => "question_cycles",
            Table::CycleAnswers => "cycle_answers",
            Table::Categories => "categories",
            Table::PlaylistItemCategories => "playlist_item_categories",
            Table::AdminProfiles => "admin_profiles",
        }
    }

    /// Columns in declaration order.
    #[must_use]
    pub fn columns(self) -> &'static [Column] {
        match self {
            Table::Worlds => &WORLDS,
            Table::Folders => &FOLDERS,
            Table::Playlists => &PLAYLISTS,
            Table::PlaylistItems => &PLAYLIST_ITEMS,
            Table::ItemQuestions => &ITEM_QUESTIONS,
            Table::QuestionCycles => &QUESTION_CYCLES,
            Table::CycleAnswers => &CYCLE_ANSWERS,
            Table::Categories => &CATEGORIES,
            Table::PlaylistItemCategories => &ITEM_CATEGORIES,
            Table::AdminProfiles => &ADMIN_PROFILES,
        }
    }

    /// Look up a column by name. Only catalogued names ever reach SQL text.
    pub fn column(self, name: &str) -> Result<&'static Column, StoreError> {
        self.columns()
            .iter()
            .find(|column| column.name == name)
            .ok_or_else(|| StoreError::invalid_row(self, format!("unknown column '{name}'")))
    }

    /// Comma-separated, quoted column list for `SELECT`.
    pub(crate) fn select_list(self) -> String {
        self.columns()
            .iter()
            .map(|column| quoted(column.name))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub(crate) fn quoted(identifier: &str) -> String {
    format!("\"{identifier}\"")
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
