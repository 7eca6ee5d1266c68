use std::collections::BTreeMap;

use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
use uuid::Uuid;

use inkwell_core::domain::{Comment, Post, PostFilter};
use inkwell_core::ports::{BaseRepository, CategoryRepository, PostRepository};

use super::entity::{category, post};
use super::postgres_repo::{PostgresCategoryRepository, PostgresPostRepository};

fn post_model(id: Uuid, view_count: i64) -> post::Model {
    let now = Utc::now();
    post::Model {
        id,
        title: "Test Post".to_owned(),
        content: "Content".to_owned(),
        excerpt: None,
        featured_image: None,
        category_id: Uuid::new_v4(),
        author_id: Uuid::new_v4(),
        tags: post::TagList(vec!["rust".to_owned()]),
        is_published: true,
        view_count,
        comments: post::CommentList(vec![Comment::new(Uuid::new_v4(), "Nice".to_owned())]),
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let post_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(post_id, 3)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let post: Post = repo.find_by_id(post_id).await.unwrap().unwrap();

    assert_eq!(post.id, post_id);
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.view_count, 3);
    assert_eq!(post.tags, vec!["rust".to_owned()]);
    assert_eq!(post.comments.len(), 1);
}

#[tokio::test]
async fn test_count_posts() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[BTreeMap::from([("num_items", Value::BigInt(Some(15)))])]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let total = repo
        .count(&PostFilter::published().with_search("blog"))
        .await
        .unwrap();

    assert_eq!(total, 15);
}

#[tokio::test]
async fn test_increment_view_count_returns_new_value() {
    let post_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .append_query_results([vec![post_model(post_id, 8)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    assert_eq!(repo.increment_view_count(post_id).await.unwrap(), Some(8));
}

#[test]
fn test_post_active_model_leaves_view_count_unset() {
    let mut post = Post::new(Uuid::new_v4(), Uuid::new_v4(), "Title".into(), "Body".into());
    post.view_count = 3;

    let active = post::ActiveModel::from(post);

    assert!(active.view_count.is_not_set());
    assert!(active.title.is_set());
}

#[tokio::test]
async fn test_save_returns_stored_view_count() {
    let post_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(post_id, 9)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let mut post = Post::new(Uuid::new_v4(), Uuid::new_v4(), "Test Post".into(), "Content".into());
    post.id = post_id;

    let saved = repo.save(post).await.unwrap();

    assert_eq!(saved.view_count, 9);
}

#[tokio::test]
async fn test_increment_view_count_missing_post() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    assert_eq!(repo.increment_view_count(Uuid::new_v4()).await.unwrap(), None);
}

#[tokio::test]
async fn test_find_category_by_slug() {
    let now = Utc::now();
    let id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![category::Model {
            id,
            name: "Web Dev".to_owned(),
            slug: "web-dev".to_owned(),
            description: Some("Frontend and backend".to_owned()),
            color: None,
            is_active: true,
            created_at: now.into(),
            updated_at: now.into(),
        }]])
        .into_connection();

    let repo = PostgresCategoryRepository::new(db);
    let found = repo.find_by_slug("web-dev").await.unwrap().unwrap();

    assert_eq!(found.id, id);
    assert_eq!(found.name, "Web Dev");
}

#[tokio::test]
async fn test_find_by_ids_skips_query_for_empty_input() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let repo = PostgresCategoryRepository::new(db);

    assert!(repo.find_by_ids(&[]).await.unwrap().is_empty());
}
