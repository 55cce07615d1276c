use super::*;
use crate::store::Table;
use crate::test_support::signed_in;
use crate::world::{create_world, CreateWorldOptions};

async fn world(env: &crate::test_support::TestEnv) -> String {
    create_world(
        &env.ctx,
        CreateWorldOptions {
            name: "Mundo".into(),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .id
}

async fn folder(env: &crate::test_support::TestEnv, world_id: &str, name: &str) -> Folder {
    create_folder(
        &env.ctx,
        CreateFolderOptions {
            mundo_id: world_id.to_string(),
            name: name.to_string(),
        },
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_folders_list_pinned_first_then_by_name() {
    let env = signed_in();
    let world_id = world(&env).await;
    folder(&env, &world_id, "Zeta").await;
    let beta = folder(&env, &world_id, "Beta").await;
    folder(&env, &world_id, "Alfa").await;
    update_folder_pin(&env.ctx, &beta.id, true).await.unwrap();

    let names: Vec<_> = fetch_folders(&env.ctx, &world_id)
        .await
        .unwrap()
        .into_iter()
        .map(|f| f.name)
        .collect();
    assert_eq!(names, vec!["Beta", "Alfa", "Zeta"]);
}

#[tokio::test]
async fn test_create_folder_defaults() {
    let env = signed_in();
    let world_id = world(&env).await;
    let created = folder(&env, &world_id, "Nueva").await;
    assert_eq!(created.order_index, 0);
    assert!(!created.is_pinned);
    assert!(!created.is_deleted);
    assert!(created.deleted_at.is_none());
}

#[tokio::test]
async fn test_create_folder_in_missing_world_fails() {
    let env = signed_in();
    let err = create_folder(
        &env.ctx,
        CreateFolderOptions {
            mundo_id: "missing".into(),
            name: "Huérfana".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AdminError::Store(_)));
}

#[tokio::test]
async fn test_rename_rejects_blank() {
    let env = signed_in();
    let world_id = world(&env).await;
    let created = folder(&env, &world_id, "Nombre").await;

    let err = update_folder_name(&env.ctx, &created.id, " ").await.unwrap_err();
    assert!(matches!(err, AdminError::Validation(_)));

    let renamed = update_folder_name(&env.ctx, &created.id, "Otro").await.unwrap();
    assert_eq!(renamed.name, "Otro");
}

#[tokio::test]
async fn test_soft_delete_hides_and_restore_returns() {
    let env = signed_in();
    let world_id = world(&env).await;
    let created = folder(&env, &world_id, "Temporal").await;
    assert_eq!(fetch_folders(&env.ctx, &world_id).await.unwrap().len(), 1);

    let trashed = soft_delete_folder(&env.ctx, &created.id).await.unwrap();
    assert!(trashed.is_deleted);
    assert!(trashed.deleted_at.is_some());
    assert!(fetch_folders(&env.ctx, &world_id).await.unwrap().is_empty());
    assert_eq!(fetch_deleted_folders(&env.ctx, &world_id).await.unwrap().len(), 1);

    let restored = restore_folder(&env.ctx, &created.id).await.unwrap();
    assert!(!restored.is_deleted);
    assert!(restored.deleted_at.is_none());
    assert_eq!(fetch_folders(&env.ctx, &world_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_purge_respects_grace_period() {
    let env = signed_in();
    let world_id = world(&env).await;
    let kept = folder(&env, &world_id, "Viva").await;
    let trashed = folder(&env, &world_id, "Borrada").await;
    soft_delete_folder(&env.ctx, &trashed.id).await.unwrap();

    assert_eq!(purge_deleted_folders(&env.ctx).await.unwrap(), 0);
    assert_eq!(env.store.count(Table::Folders).await.unwrap(), 2);

    assert_eq!(purge_deleted_before(&env.ctx, Duration::ZERO).await.unwrap(), 1);
    let remaining = fetch_folders(&env.ctx, &world_id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining.first().map(|f| f.id.as_str()), Some(kept.id.as_str()));
}
