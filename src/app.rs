use clap::{Args as ClapArgs, Parser, Subcommand};
use gamifier_admin::{QuestionType, ReorderDirection};
use std::path::PathBuf;

/// Gamifier Admin - manage worlds, playlists, items and their questions
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Config file (default: ~/.gamifier/config.toml)
    #[arg(long, env = "GAMIFIER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Store database file (overrides the config)
    #[arg(long, env = "GAMIFIER_STORE")]
    pub store: Option<PathBuf>,

    /// Id of the signed-in admin. Writes that record an author need it.
    #[arg(long, env = "GAMIFIER_USER")]
    pub user: Option<String>,

    /// Email stored on the admin profile
    #[arg(long, env = "GAMIFIER_EMAIL")]
    pub email: Option<String>,

    /// Enable JSON log format (for production/log aggregation)
    #[arg(long, env = "GAMIFIER_LOG_JSON", default_value = "false")]
    pub log_json: bool,

    /// Log rotation period: daily, hourly, or never
    #[arg(long, env = "GAMIFIER_LOG_ROTATION")]
    pub log_rotation: Option<String>,

    /// Custom log directory (default: ~/.gamifier/logs)
    #[arg(long, env = "GAMIFIER_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Top-level worlds
    #[command(subcommand)]
    World(WorldCommand),
    /// Playlist folders of a world
    #[command(subcommand)]
    Folder(FolderCommand),
    #[command(subcommand)]
    Playlist(PlaylistCommand),
    /// Items of a playlist
    #[command(subcommand)]
    Item(ItemCommand),
    /// Questions of an item
    #[command(subcommand)]
    Question(QuestionCommand),
    #[command(subcommand)]
    Category(CategoryCommand),
}

#[derive(Subcommand, Debug)]
pub enum WorldCommand {
    List,
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        thumbnail_url: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        thumbnail_url: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum FolderCommand {
    List {
        #[arg(long)]
        world: String,
        /// List the trash instead
        #[arg(long)]
        deleted: bool,
    },
    Create {
        #[arg(long)]
        world: String,
        #[arg(long)]
        name: String,
    },
    Pin {
        id: String,
        #[arg(long)]
        unpin: bool,
    },
    Rename {
        id: String,
        #[arg(long)]
        name: String,
    },
    /// Move to the trash
    #[command(visible_alias = "delete")]
    Trash {
        id: String,
    },
    Restore {
        id: String,
    },
    /// Remove folders trashed longer than the grace period
    Purge,
}

#[derive(Subcommand, Debug)]
pub enum PlaylistCommand {
    List {
        #[arg(long)]
        world: Option<String>,
    },
    Show {
        id: String,
    },
    Create {
        #[arg(long)]
        world: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Status {
        id: String,
        #[arg(long)]
        active: bool,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ItemCommand {
    List {
        #[arg(long)]
        playlist: String,
    },
    Show {
        id: String,
    },
    #[command(visible_alias = "add")]
    Create {
        #[arg(long)]
        playlist: String,
        /// Embed URL
        #[arg(long)]
        content: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        item_type: Option<String>,
    },
    #[command(visible_alias = "details")]
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Delete {
        id: String,
    },
    /// Move one position up or down
    Move {
        id: String,
        direction: ReorderDirection,
    },
}

#[derive(Subcommand, Debug)]
pub enum QuestionCommand {
    List {
        #[arg(long)]
        item: String,
    },
    /// Question with its cycles and answers
    Show {
        id: String,
    },
    Create(CreateQuestionArgs),
    Delete {
        id: String,
    },
}

#[derive(ClapArgs, Debug)]
pub struct CreateQuestionArgs {
    #[arg(long)]
    pub item: String,
    #[arg(long)]
    pub text: String,
    /// multiple_choice, true_false, open_ended, a_b or quiz
    #[arg(long = "type", default_value = "multiple_choice")]
    pub question_type: QuestionType,
    /// Second of the video at which the question shows
    #[arg(long, default_value_t = 0)]
    pub timestamp: u32,
    #[arg(long)]
    pub language: Option<String>,
    /// Answer text, repeatable. A/B questions take exactly two.
    #[arg(long = "answer")]
    pub answers: Vec<String>,
    /// Position of the correct answer
    #[arg(long, default_value_t = 0)]
    pub correct: usize,
    /// Reward granted for the correct answer
    #[arg(long, default_value_t = 0)]
    pub reward: u32,
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    List,
    Create {
        #[arg(long)]
        name: String,
    },
    /// Replace the categories of an item
    Assign {
        #[arg(long)]
        item: String,
        #[arg(long = "category")]
        categories: Vec<String>,
    },
}
