use crate::app::{
    CategoryCommand, Command, CreateQuestionArgs, FolderCommand, ItemCommand, PlaylistCommand,
    QuestionCommand, WorldCommand,
};
use color_eyre::eyre::{bail, Result};
use gamifier_admin::category::{
    create_category, fetch_categories, fetch_item_category_ids, set_item_categories,
};
use gamifier_admin::editor::{EditorDefaults, QuestionEditor};
use gamifier_admin::folder::{
    create_folder, fetch_deleted_folders, fetch_folders, purge_deleted_folders, restore_folder,
    soft_delete_folder, update_folder_name, update_folder_pin, CreateFolderOptions,
};
use gamifier_admin::playlist::{
    create_playlist, delete_playlist, fetch_playlist, fetch_playlists, fetch_world_playlists,
    update_playlist, update_playlist_status, CreatePlaylistOptions, UpdatePlaylistOptions,
};
use gamifier_admin::playlist_item::{
    create_playlist_item, delete_playlist_item, fetch_playlist_item, fetch_playlist_items,
    update_playlist_item_details, update_playlist_item_order, CreatePlaylistItemOptions,
    UpdateItemDetailsOptions,
};
use gamifier_admin::question::{
    delete_item_question, fetch_item_questions, fetch_question_with_details,
};
use gamifier_admin::world::{
    create_world, delete_world, fetch_worlds, update_world, CreateWorldOptions,
    UpdateWorldOptions,
};
use gamifier_admin::AdminContext;
use serde_json::{json, Value};
use tracing::info;

/// Run one command and return what it should print.
pub async fn run(ctx: &AdminContext, command: Command) -> Result<Value> {
    match command {
        Command::World(cmd) => world(ctx, cmd).await,
        Command::Folder(cmd) => folder(ctx, cmd).await,
        Command::Playlist(cmd) => playlist(ctx, cmd).await,
        Command::Item(cmd) => item(ctx, cmd).await,
        Command::Question(cmd) => question(ctx, cmd).await,
        Command::Category(cmd) => category(ctx, cmd).await,
    }
}

fn deleted(id: &str) -> Value {
    json!({ "deleted": id })
}

async fn world(ctx: &AdminContext, cmd: WorldCommand) -> Result<Value> {
    Ok(match cmd {
        WorldCommand::List => serde_json::to_value(fetch_worlds(ctx).await?)?,
        WorldCommand::Create {
            name,
            description,
            thumbnail_url,
        } => {
            let options = CreateWorldOptions {
                name,
                description,
                thumbnail_url,
                ..Default::default()
            };
            serde_json::to_value(create_world(ctx, options).await?)?
        }
        WorldCommand::Update {
            id,
            name,
            description,
            thumbnail_url,
            active,
        } => {
            let options = UpdateWorldOptions {
                name,
                description,
                thumbnail_url,
                is_active: active,
            };
            serde_json::to_value(update_world(ctx, &id, options).await?)?
        }
        WorldCommand::Delete { id } => {
            delete_world(ctx, &id).await?;
            deleted(&id)
        }
    })
}

async fn folder(ctx: &AdminContext, cmd: FolderCommand) -> Result<Value> {
    Ok(match cmd {
        FolderCommand::List { world, deleted } => {
            let folders = if deleted {
                fetch_deleted_folders(ctx, &world).await?
            } else {
                fetch_folders(ctx, &world).await?
            };
            serde_json::to_value(folders)?
        }
        FolderCommand::Create { world, name } => {
            let options = CreateFolderOptions {
                mundo_id: world,
                name,
            };
            serde_json::to_value(create_folder(ctx, options).await?)?
        }
        FolderCommand::Pin { id, unpin } => {
            serde_json::to_value(update_folder_pin(ctx, &id, !unpin).await?)?
        }
        FolderCommand::Rename { id, name } => {
            serde_json::to_value(update_folder_name(ctx, &id, &name).await?)?
        }
        FolderCommand::Trash { id } => serde_json::to_value(soft_delete_folder(ctx, &id).await?)?,
        FolderCommand::Restore { id } => serde_json::to_value(restore_folder(ctx, &id).await?)?,
        FolderCommand::Purge => json!({ "purged": purge_deleted_folders(ctx).await? }),
    })
}

async fn playlist(ctx: &AdminContext, cmd: PlaylistCommand) -> Result<Value> {
    Ok(match cmd {
        PlaylistCommand::List { world: Some(world) } => {
            serde_json::to_value(fetch_world_playlists(ctx, &world).await?)?
        }
        PlaylistCommand::List { world: None } => serde_json::to_value(fetch_playlists(ctx).await?)?,
        PlaylistCommand::Show { id } => serde_json::to_value(fetch_playlist(ctx, &id).await?)?,
        PlaylistCommand::Create {
            world,
            name,
            description,
        } => {
            let options = CreatePlaylistOptions {
                mundo_id: world,
                name,
                description,
            };
            serde_json::to_value(create_playlist(ctx, options).await?)?
        }
        PlaylistCommand::Update {
            id,
            name,
            description,
        } => {
            let options = UpdatePlaylistOptions { name, description };
            serde_json::to_value(update_playlist(ctx, &id, options).await?)?
        }
        PlaylistCommand::Status { id, active } => {
            serde_json::to_value(update_playlist_status(ctx, &id, active).await?)?
        }
        PlaylistCommand::Delete { id } => {
            delete_playlist(ctx, &id).await?;
            deleted(&id)
        }
    })
}

async fn item(ctx: &AdminContext, cmd: ItemCommand) -> Result<Value> {
    Ok(match cmd {
        ItemCommand::List { playlist } => {
            serde_json::to_value(fetch_playlist_items(ctx, &playlist).await?)?
        }
        ItemCommand::Show { id } => serde_json::to_value(fetch_playlist_item(ctx, &id).await?)?,
        ItemCommand::Create {
            playlist,
            content,
            title,
            description,
            item_type,
        } => {
            let options = CreatePlaylistItemOptions {
                playlist_id: playlist,
                content,
                item_type,
                title,
                description,
            };
            serde_json::to_value(create_playlist_item(ctx, options).await?)?
        }
        ItemCommand::Update {
            id,
            title,
            description,
        } => {
            let options = UpdateItemDetailsOptions { title, description };
            serde_json::to_value(update_playlist_item_details(ctx, &id, options).await?)?
        }
        ItemCommand::Delete { id } => {
            delete_playlist_item(ctx, &id).await?;
            deleted(&id)
        }
        ItemCommand::Move { id, direction } => {
            serde_json::to_value(update_playlist_item_order(ctx, &id, direction).await?)?
        }
    })
}

async fn question(ctx: &AdminContext, cmd: QuestionCommand) -> Result<Value> {
    Ok(match cmd {
        QuestionCommand::List { item } => {
            serde_json::to_value(fetch_item_questions(ctx, &item).await?)?
        }
        QuestionCommand::Show { id } => {
            serde_json::to_value(fetch_question_with_details(ctx, &id).await?)?
        }
        QuestionCommand::Create(args) => create_question(ctx, args).await?,
        QuestionCommand::Delete { id } => {
            delete_item_question(ctx, &id).await?;
            deleted(&id)
        }
    })
}

/// Build a question through the editor, the same way the admin UI does.
async fn create_question(ctx: &AdminContext, args: CreateQuestionArgs) -> Result<Value> {
    if args.correct >= args.answers.len().max(1) {
        bail!("--correct {} is out of range", args.correct);
    }
    let defaults = EditorDefaults {
        question_type: args.question_type,
        ..EditorDefaults::from(ctx.defaults())
    };
    let mut editor = QuestionEditor::new();
    editor.open(ctx, &args.item, None, defaults.clone()).await?;
    editor.set_question_text(args.text)?;
    editor.set_display_timestamp(args.timestamp)?;
    if let Some(language) = args.language {
        editor.set_language(language)?;
    }

    if args.question_type.is_ab() {
        let [first, second] = args.answers.as_slice() else {
            bail!("An A/B question takes exactly two --answer values");
        };
        editor.set_ab_answer_text(0, first.as_str())?;
        editor.set_ab_answer_text(1, second.as_str())?;
        editor.set_ab_correct(args.correct)?;
        let saved = editor.save(ctx).await?;
        info!(question_id = %saved.id, "Created A/B question");
        return Ok(serde_json::to_value(fetch_question_with_details(ctx, &saved.id).await?)?);
    }

    if !args.answers.is_empty() {
        editor.create_cycle(ctx).await?;
    }
    let saved = editor.save(ctx).await?;

    // Answers need a stored cycle, which exists only after the first save.
    if !args.answers.is_empty() {
        editor.open(ctx, &args.item, Some(saved.clone()), defaults).await?;
        let key = editor.visible_cycles().next().map(|c| c.key);
        if let Some(key) = key {
            for (position, text) in args.answers.iter().enumerate() {
                let is_correct = position == args.correct;
                let reward = if is_correct { args.reward } else { 0 };
                editor.add_answer(ctx, key, text, is_correct, reward).await?;
            }
        }
        editor.close();
    }
    info!(question_id = %saved.id, question_type = %saved.question_type, "Created question");
    Ok(serde_json::to_value(fetch_question_with_details(ctx, &saved.id).await?)?)
}

async fn category(ctx: &AdminContext, cmd: CategoryCommand) -> Result<Value> {
    Ok(match cmd {
        CategoryCommand::List => serde_json::to_value(fetch_categories(ctx).await?)?,
        CategoryCommand::Create { name } => serde_json::to_value(create_category(ctx, &name).await?)?,
        CategoryCommand::Assign { item, categories } => {
            set_item_categories(ctx, &item, &categories).await?;
            json!({
                "item_id": item,
                "category_ids": fetch_item_category_ids(ctx, &item).await?,
            })
        }
    })
}
