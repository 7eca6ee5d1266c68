//! Category service behaviour over the in-memory repositories.

use std::sync::Arc;

use inkwell_core::DomainError;
use inkwell_core::domain::Post;
use inkwell_core::ports::BaseRepository;
use inkwell_core::services::{CategoryInput, CategoryService};
use inkwell_infra::{InMemoryCategoryRepository, InMemoryPostRepository};
use uuid::Uuid;

fn service() -> (CategoryService, Arc<InMemoryPostRepository>) {
    let posts = Arc::new(InMemoryPostRepository::new());
    let categories = Arc::new(InMemoryCategoryRepository::new());
    (CategoryService::new(categories, posts.clone()), posts)
}

fn input(name: &str) -> CategoryInput {
    CategoryInput {
        name: name.to_string(),
        ..CategoryInput::default()
    }
}

#[tokio::test]
async fn test_create_derives_slug() {
    let (service, _) = service();

    let category = service.create(input("  Rust Tips & Tricks ")).await.unwrap();

    assert_eq!(category.name, "Rust Tips & Tricks");
    assert_eq!(category.slug, "rust-tips-tricks");
    assert!(category.is_active);
}

#[tokio::test]
async fn test_names_collide_case_insensitively() {
    let (service, _) = service();
    service.create(input("Travel")).await.unwrap();

    for name in ["travel", "TRAVEL", "Travel!"] {
        let err = service.create(input(name)).await.unwrap_err();
        assert!(matches!(err, DomainError::Duplicate(_)), "{}", name);
        assert_eq!(err.to_string(), "Category already exists");
    }
}

#[tokio::test]
async fn test_blank_name_is_a_validation_error() {
    let (service, _) = service();

    for name in ["", "   ", "!!!"] {
        let err = service.create(input(name)).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { field: "name", .. }));
    }
}

#[tokio::test]
async fn test_update_renames_and_keeps_active_flag() {
    let (service, _) = service();
    let category = service.create(input("Food")).await.unwrap();

    let updated = service
        .update(
            category.id,
            CategoryInput {
                name: "Street Food".into(),
                description: Some("Cheap eats".into()),
                ..CategoryInput::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.slug, "street-food");
    assert!(updated.is_active);

    let hidden = service
        .update(
            category.id,
            CategoryInput {
                name: "Street Food".into(),
                is_active: Some(false),
                ..CategoryInput::default()
            },
        )
        .await
        .unwrap();
    assert!(!hidden.is_active);
    assert!(service.list_active().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_cannot_take_another_name() {
    let (service, _) = service();
    service.create(input("Food")).await.unwrap();
    let travel = service.create(input("Travel")).await.unwrap();

    let err = service.update(travel.id, input("FOOD")).await.unwrap_err();
    assert!(matches!(err, DomainError::Duplicate(_)));
}

#[tokio::test]
async fn test_list_active_sorted_by_name() {
    let (service, _) = service();
    for name in ["Zeta", "Alpha", "Mid"] {
        service.create(input(name)).await.unwrap();
    }

    let names: Vec<_> = service
        .list_active()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, ["Alpha", "Mid", "Zeta"]);
}

#[tokio::test]
async fn test_delete_refused_while_in_use() {
    let (service, posts) = service();
    let category = service.create(input("Rust")).await.unwrap();
    let post = posts
        .save(Post::new(Uuid::new_v4(), category.id, "t".into(), "c".into()))
        .await
        .unwrap();

    let err = service.delete(category.id).await.unwrap_err();
    assert!(matches!(err, DomainError::InUse(_)));

    posts.delete(post.id).await.unwrap();
    service.delete(category.id).await.unwrap();

    let err = service.get(category.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity_type: "Category", .. }));
}
