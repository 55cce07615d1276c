//! Database schema and its migrations, tracked with `PRAGMA user_version`.

use super::StoreError;
use rusqlite::Connection;
use tracing::info;

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = 1;

/// Every referencing column cascades on delete, so removing a world takes
/// its folders, playlists, items and question trees with it.
const SCHEMA_V1: &str = "
CREATE TABLE IF NOT EXISTS mundos (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    thumbnail_url TEXT,
    is_active INTEGER NOT NULL DEFAULT 1,
    created_by TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS playlist_folders (
    id TEXT PRIMARY KEY NOT NULL,
    mundo_id TEXT NOT NULL REFERENCES mundos(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    order_index INTEGER NOT NULL DEFAULT 0,
    is_pinned INTEGER NOT NULL DEFAULT 0,
    is_deleted INTEGER NOT NULL DEFAULT 0,
    deleted_at TEXT,
    created_by TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS playlists (
    id TEXT PRIMARY KEY NOT NULL,
    mundo_id TEXT NOT NULL REFERENCES mundos(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    description TEXT,
    order_index INTEGER NOT NULL DEFAULT 0,
    is_active INTEGER NOT NULL DEFAULT 1,
    created_by TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS playlist_items (
    id TEXT PRIMARY KEY NOT NULL,
    playlist_id TEXT NOT NULL REFERENCES playlists(id) ON DELETE CASCADE,
    item_type TEXT NOT NULL DEFAULT 'video_embed',
    content TEXT NOT NULL,
    title TEXT NOT NULL DEFAULT '',
    description TEXT,
    order_index INTEGER NOT NULL DEFAULT 0,
    created_by TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS item_questions (
    id TEXT PRIMARY KEY NOT NULL,
    item_id TEXT NOT NULL REFERENCES playlist_items(id) ON DELETE CASCADE,
    question_text TEXT NOT NULL,
    question_type TEXT NOT NULL,
    display_timestamp INTEGER NOT NULL DEFAULT 0,
    order_index INTEGER NOT NULL DEFAULT 0,
    language TEXT NOT NULL DEFAULT 'es',
    show_subtitles INTEGER NOT NULL DEFAULT 0,
    show_question INTEGER NOT NULL DEFAULT 1,
    created_by TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS question_cycles (
    id TEXT PRIMARY KEY NOT NULL,
    item_question_id TEXT NOT NULL REFERENCES item_questions(id) ON DELETE CASCADE,
    delay_seconds INTEGER NOT NULL DEFAULT 0,
    duration_seconds INTEGER NOT NULL DEFAULT 30,
    order_index INTEGER NOT NULL DEFAULT 0,
    is_active INTEGER NOT NULL DEFAULT 1,
    created_by TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS cycle_answers (
    id TEXT PRIMARY KEY NOT NULL,
    question_cycle_id TEXT NOT NULL REFERENCES question_cycles(id) ON DELETE CASCADE,
    answer_text TEXT NOT NULL DEFAULT '',
    is_correct INTEGER NOT NULL DEFAULT 0,
    ondas_reward INTEGER NOT NULL DEFAULT 0,
    order_index INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS categories (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS playlist_item_categories (
    id TEXT PRIMARY KEY NOT NULL,
    item_id TEXT NOT NULL REFERENCES playlist_items(id) ON DELETE CASCADE,
    category_id TEXT NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS admin_profiles (
    id TEXT PRIMARY KEY NOT NULL,
    role TEXT NOT NULL,
    email TEXT UNIQUE,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_folders_world ON playlist_folders(mundo_id);
CREATE INDEX IF NOT EXISTS idx_playlists_world ON playlists(mundo_id, order_index);
CREATE INDEX IF NOT EXISTS idx_items_playlist ON playlist_items(playlist_id, order_index);
CREATE INDEX IF NOT EXISTS idx_questions_item ON item_questions(item_id);
CREATE INDEX IF NOT EXISTS idx_cycles_question ON question_cycles(item_question_id);
CREATE INDEX IF NOT EXISTS idx_answers_cycle ON cycle_answers(question_cycle_id);
CREATE INDEX IF NOT EXISTS idx_item_categories_item ON playlist_item_categories(item_id);
";

/// Turn on foreign keys and bring the schema up to [`SCHEMA_VERSION`].
pub(crate) fn migrate(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    let current: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    let current = u32::try_from(current).map_err(|_| StoreError::UnsupportedSchema(u32::MAX))?;
    if current > SCHEMA_VERSION {
        return Err(StoreError::UnsupportedSchema(current));
    }
    if current < 1 {
        conn.execute_batch(SCHEMA_V1)?;
        info!("Created store schema v1");
    }
    if current < SCHEMA_VERSION {
        conn.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    }
    Ok(())
}
