//! End-to-end tests driving the full application over in-memory storage.

use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test};
use serde_json::{Value, json};

use api_server::configure_app;
use api_server::observability::RequestIdMiddleware;
use api_server::state::AppState;
use inkwell_core::domain::{User, UserRole};
use inkwell_core::ports::BaseRepository;
use inkwell_core::services::{Actor, CategoryInput, PostInput};
use inkwell_infra::{JwtConfig, JwtTokenService};

macro_rules! app {
    ($state:expr) => {{
        let state = $state.clone();
        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .configure(move |cfg| configure_app(cfg, state)),
        )
        .await
    }};
}

fn state() -> AppState {
    let tokens = JwtTokenService::new(JwtConfig {
        secret: "test-secret".to_string(),
        ..JwtConfig::default()
    });
    AppState::in_memory(Arc::new(tokens))
}

struct Seeded {
    user: User,
    token: String,
}

impl Seeded {
    fn actor(&self) -> Actor {
        Actor::new(self.user.id, self.user.is_admin())
    }

    fn bearer(&self) -> (header::HeaderName, String) {
        (header::AUTHORIZATION, format!("Bearer {}", self.token))
    }
}

async fn seed_user(state: &AppState, name: &str, role: UserRole) -> Seeded {
    let mut user = User::new(
        name.to_string(),
        format!("{}@example.com", name.to_lowercase()),
        "not-a-real-hash".to_string(),
    );
    user.role = role;
    let user = state.users.save(user).await.unwrap();
    let token = state.tokens.generate_token(user.id).unwrap();
    Seeded { user, token }
}

async fn seed_category(state: &AppState, name: &str) -> uuid::Uuid {
    state
        .categories
        .create(CategoryInput {
            name: name.to_string(),
            ..CategoryInput::default()
        })
        .await
        .unwrap()
        .id
}

async fn seed_post(
    state: &AppState,
    author: &Seeded,
    category: uuid::Uuid,
    title: &str,
    published: bool,
) -> uuid::Uuid {
    state
        .posts
        .create(
            author.actor(),
            PostInput {
                title: title.to_string(),
                content: format!("Body of {}", title),
                category: category.to_string(),
                is_published: published,
                ..PostInput::default()
            },
        )
        .await
        .unwrap()
        .id
}

#[actix_web::test]
async fn test_second_page_of_fifteen_posts() {
    let state = state();
    let author = seed_user(&state, "Ada", UserRole::User).await;
    let category = seed_category(&state, "Rust").await;
    for i in 0..15 {
        seed_post(&state, &author, category, &format!("Post {}", i), true).await;
    }
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/posts?page=2&limit=10")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 5);
    assert_eq!(
        body["pagination"],
        json!({"page": 2, "limit": 10, "total": 15, "pages": 2})
    );
}

#[actix_web::test]
async fn test_page_past_the_end_is_empty() {
    let state = state();
    let author = seed_user(&state, "Ada", UserRole::User).await;
    let category = seed_category(&state, "Rust").await;
    for i in 0..3 {
        seed_post(&state, &author, category, &format!("Post {}", i), true).await;
    }
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/posts?page=5&limit=2")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert!(body["data"].as_array().unwrap().is_empty());
    assert_eq!(body["pagination"]["total"], 3);
}

#[actix_web::test]
async fn test_listing_hides_drafts_and_searches_case_insensitively() {
    let state = state();
    let author = seed_user(&state, "Ada", UserRole::User).await;
    let category = seed_category(&state, "Rust").await;
    seed_post(&state, &author, category, "My first blog post", true).await;
    seed_post(&state, &author, category, "Unrelated", true).await;
    seed_post(&state, &author, category, "Draft blog post", false).await;
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/posts?search=BLOG")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let posts = body["data"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["title"], "My first blog post");
    assert_eq!(posts[0]["isPublished"], true);
    assert_eq!(posts[0]["author"], json!({"_id": author.user.id, "name": "Ada"}));
    assert!(posts[0]["author"].get("email").is_none());
    assert!(posts[0].get("comments").is_none());
    assert_eq!(posts[0]["commentCount"], 0);
}

#[actix_web::test]
async fn test_category_slug_filter() {
    let state = state();
    let author = seed_user(&state, "Ada", UserRole::User).await;
    let rust = seed_category(&state, "Rust Tips").await;
    let food = seed_category(&state, "Food").await;
    seed_post(&state, &author, rust, "Borrowing", true).await;
    seed_post(&state, &author, food, "Pasta", true).await;
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/posts?category=rust-tips")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["category"]["slug"], "rust-tips");

    let req = test::TestRequest::get()
        .uri("/api/posts?category=no-such-category")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["pagination"]["total"], 0);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_invalid_paging_is_rejected() {
    let app = app!(state());

    for uri in ["/api/posts?page=0", "/api/posts?limit=0", "/api/posts?page=abc"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(!body["errors"].as_array().unwrap().is_empty());
    }
}

#[actix_web::test]
async fn test_each_retrieval_counts_one_view() {
    let state = state();
    let author = seed_user(&state, "Ada", UserRole::User).await;
    let category = seed_category(&state, "Rust").await;
    let post = seed_post(&state, &author, category, "Counted", true).await;
    let app = app!(state);

    let uri = format!("/api/posts/{}", post);
    let first: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    let second: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri(&uri).to_request()).await;

    assert_eq!(first["data"]["viewCount"], 1);
    assert_eq!(second["data"]["viewCount"], 2);
    assert_eq!(second["data"]["comments"], json!([]));
}

#[actix_web::test]
async fn test_unknown_and_malformed_post_ids_are_not_found() {
    let app = app!(state());

    for id in [uuid::Uuid::new_v4().to_string(), "not-an-id".to_string()] {
        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/{}", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"success": false, "error": "Post not found"}));
    }
}

#[actix_web::test]
async fn test_comments_are_prepended() {
    let state = state();
    let author = seed_user(&state, "Ada", UserRole::User).await;
    let reader = seed_user(&state, "Grace", UserRole::User).await;
    let category = seed_category(&state, "Rust").await;
    let post = seed_post(&state, &author, category, "Discuss", true).await;
    let app = app!(state);

    let uri = format!("/api/posts/{}/comments", post);
    for content in ["c2", "c1", "new"] {
        let req = test::TestRequest::post()
            .uri(&uri)
            .insert_header(reader.bearer())
            .set_json(json!({ "content": content }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["content"], content);
        assert_eq!(body["data"]["user"]["name"], "Grace");
    }

    let body: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    let contents: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, ["new", "c1", "c2"]);
}

#[actix_web::test]
async fn test_create_post_validation_and_invalid_category() {
    let state = state();
    let author = seed_user(&state, "Ada", UserRole::User).await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(author.bearer())
        .set_json(json!({ "content": "text", "category": "x" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"][0]["field"], "title");

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(author.bearer())
        .set_json(json!({
            "title": "Hello",
            "content": "text",
            "category": uuid::Uuid::new_v4().to_string(),
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"success": false, "error": "Invalid category"}));
}

#[actix_web::test]
async fn test_create_post_returns_populated_post() {
    let state = state();
    let author = seed_user(&state, "Ada", UserRole::User).await;
    let category = seed_category(&state, "Rust").await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(author.bearer())
        .set_json(json!({
            "title": "Hello",
            "content": "World",
            "category": category.to_string(),
            "tags": ["intro"],
            "isPublished": true,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["author"]["name"], "Ada");
    assert_eq!(body["data"]["category"]["slug"], "rust");
    assert_eq!(body["data"]["tags"], json!(["intro"]));
    assert_eq!(body["data"]["viewCount"], 0);
}

#[actix_web::test]
async fn test_missing_and_invalid_tokens() {
    let app = app!(state());

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(json!({ "title": "t", "content": "c", "category": "x" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "No token, authorization denied");

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header((header::AUTHORIZATION, "Bearer garbage"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Token is not valid");
}

#[actix_web::test]
async fn test_token_for_deleted_user_is_rejected() {
    let state = state();
    let ghost = seed_user(&state, "Ghost", UserRole::User).await;
    state.users.delete(ghost.user.id).await.unwrap();
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(ghost.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_only_author_or_admin_may_mutate() {
    let state = state();
    let author = seed_user(&state, "Ada", UserRole::User).await;
    let stranger = seed_user(&state, "Mallory", UserRole::User).await;
    let admin = seed_user(&state, "Root", UserRole::Admin).await;
    let category = seed_category(&state, "Rust").await;
    let post = seed_post(&state, &author, category, "Mine", true).await;
    let app = app!(state);
    let uri = format!("/api/posts/{}", post);

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(stranger.bearer())
        .set_json(json!({ "title": "Taken", "content": "c", "category": category.to_string() }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Not authorized");

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(stranger.bearer())
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(author.bearer())
        .set_json(json!({ "title": "Edited", "content": "c", "category": category.to_string() }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["title"], "Edited");

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(admin.bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"success": true, "data": {}}));

    let req = test::TestRequest::get().uri(&uri).to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn test_category_lifecycle() {
    let state = state();
    let user = seed_user(&state, "Ada", UserRole::User).await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/categories")
        .insert_header(user.bearer())
        .set_json(json!({ "name": "Food & Travel", "color": "#ff0000" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["slug"], "food-travel");
    assert_eq!(body["data"]["isActive"], true);
    let id = body["data"]["_id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/categories")
        .insert_header(user.bearer())
        .set_json(json!({ "name": "FOOD & TRAVEL" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Category already exists");

    let req = test::TestRequest::put()
        .uri(&format!("/api/categories/{}", id))
        .insert_header(user.bearer())
        .set_json(json!({ "name": "Travel", "isActive": false }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["slug"], "travel");

    let req = test::TestRequest::get().uri("/api/categories").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let req = test::TestRequest::get()
        .uri(&format!("/api/categories/{}", id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["name"], "Travel");
}

#[actix_web::test]
async fn test_category_in_use_cannot_be_deleted() {
    let state = state();
    let author = seed_user(&state, "Ada", UserRole::User).await;
    let category = seed_category(&state, "Rust").await;
    let post = seed_post(&state, &author, category, "Pinned", true).await;
    let app = app!(state);
    let uri = format!("/api/categories/{}", category);

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(author.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Category is in use");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/posts/{}", post))
        .insert_header(author.bearer())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(author.bearer())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_register_login_and_me() {
    let app = app!(state());

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "name": "Ada", "email": "Ada@Example.com", "password": "secret1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["user"]["email"], "ada@example.com");
    assert_eq!(body["data"]["user"]["role"], "user");

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "name": "Ada", "email": "ada@example.com", "password": "secret1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "User already exists");

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "ada@example.com", "password": "wrong-pass" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid credentials");

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "ada@example.com", "password": "secret1" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let token = body["data"]["token"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["tokenType"], "Bearer");

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["name"], "Ada");
}

#[actix_web::test]
async fn test_register_reports_field_errors() {
    let app = app!(state());

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "name": "", "email": "nope", "password": "123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, ["email", "name", "password"]);
}

#[actix_web::test]
async fn test_health_reports_storage_and_request_id() {
    let app = app!(state());

    let req = test::TestRequest::get()
        .uri("/api/health")
        .insert_header(("x-request-id", "abc-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("x-request-id").unwrap(), "abc-123");

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}
