use super::*;
use crate::store::Table;
use crate::test_support::{signed_in, signed_out, TEST_USER};

fn named(name: &str) -> CreateWorldOptions {
    CreateWorldOptions {
        name: name.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_world_records_author() {
    let env = signed_in();
    let world = create_world(&env.ctx, named("  Mundo Uno ")).await.unwrap();

    assert_eq!(world.name, "Mundo Uno");
    assert_eq!(world.created_by.as_deref(), Some(TEST_USER));
    assert!(world.is_active);
}

#[tokio::test]
async fn test_create_world_requires_session() {
    let env = signed_out();
    let err = create_world(&env.ctx, named("Mundo")).await.unwrap_err();

    assert!(matches!(err, AdminError::AuthRequired));
    assert_eq!(env.store.count(Table::Worlds).await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_world_rejects_blank_name() {
    let env = signed_in();
    let err = create_world(&env.ctx, named("   ")).await.unwrap_err();
    assert!(matches!(err, AdminError::Validation(_)));
}

#[tokio::test]
async fn test_fetch_worlds_refetches_after_create() {
    let env = signed_in();
    assert!(fetch_worlds(&env.ctx).await.unwrap().is_empty());

    create_world(&env.ctx, named("Primero")).await.unwrap();
    create_world(&env.ctx, named("Segundo")).await.unwrap();

    let worlds = fetch_worlds(&env.ctx).await.unwrap();
    let names: Vec<_> = worlds.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, vec!["Segundo", "Primero"]);
}

#[tokio::test]
async fn test_update_world_changes_only_given_fields() {
    let env = signed_in();
    let world = create_world(
        &env.ctx,
        CreateWorldOptions {
            name: "Mundo".into(),
            description: "Original".into(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let updated = update_world(
        &env.ctx,
        &world.id,
        UpdateWorldOptions {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert!(!updated.is_active);
    assert_eq!(updated.description, "Original");
    assert_eq!(updated.name, "Mundo");
}

#[tokio::test]
async fn test_delete_world_is_idempotent() {
    let env = signed_in();
    let world = create_world(&env.ctx, named("Mundo")).await.unwrap();

    delete_world(&env.ctx, &world.id).await.unwrap();
    delete_world(&env.ctx, &world.id).await.unwrap();

    assert!(fetch_worlds(&env.ctx).await.unwrap().is_empty());
    assert!(matches!(
        fetch_world(&env.ctx, &world.id).await.unwrap_err(),
        AdminError::NotFound { .. }
    ));
}
