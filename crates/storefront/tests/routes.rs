//! HTTP-level route tests.
//!
//! Build the real router over an in-memory database and drive it with
//! `tower::ServiceExt::oneshot`.

#![allow(clippy::unwrap_used)]

mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use secrecy::SecretString;
use tower::ServiceExt;

use bookstall_storefront::config::StorefrontConfig;
use bookstall_storefront::middleware::{create_session_layer, create_session_store};
use bookstall_storefront::routes;
use bookstall_storefront::state::AppState;

use common::setup_pool_with_catalog;

fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        database_url: SecretString::from("sqlite::memory:"),
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

async fn test_app() -> Router {
    let pool = setup_pool_with_catalog().await;
    let config = test_config();

    let store = create_session_store(&pool);
    store.migrate().await.expect("migrate session store");
    let session_layer = create_session_layer(store, &config);

    routes::routes()
        .layer(session_layer)
        .with_state(AppState::new(config, pool))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("Location header")
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn test_seeded_cover_urls_are_absolute() {
    // Relative image paths would break on nested pages like /book/{id}
    let pool = setup_pool_with_catalog().await;

    let books = bookstall_storefront::db::BookRepository::new(&pool)
        .list(&bookstall_storefront::db::BookFilter::default())
        .await
        .unwrap();

    assert!(!books.is_empty());
    for book in books {
        assert!(
            book.image_url.starts_with("/static/"),
            "{} has a relative cover path: {}",
            book.title,
            book.image_url
        );
    }
}

#[tokio::test]
async fn test_home_page_renders() {
    let app = test_app().await;

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_catalog_pages_render() {
    let app = test_app().await;

    let response = app.clone().oneshot(get("/books")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get("/books?category=Fiction&search=alche"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get("/book/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/book/9999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_auth_pages_render() {
    let app = test_app().await;

    let response = app.clone().oneshot(get("/login")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/register")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_cart_requires_login_and_preserves_destination() {
    let app = test_app().await;

    let response = app.oneshot(get("/cart")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login?next=%2Fcart");
}

#[tokio::test]
async fn test_my_orders_requires_login() {
    let app = test_app().await;

    let response = app.oneshot(get("/my_orders")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login?next=%2Fmy_orders");
}

#[tokio::test]
async fn test_register_redirects_to_login() {
    let app = test_app().await;

    let response = app
        .oneshot(post_form(
            "/register",
            "username=alice&email=alice%40example.com&password=p1",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login?success=registered");
}

#[tokio::test]
async fn test_register_duplicate_redirects_with_error() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(post_form(
            "/register",
            "username=alice&email=alice%40example.com&password=p1",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app
        .oneshot(post_form(
            "/register",
            "username=alice&email=other%40example.com&password=p1",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/register?error=username_taken");
}

#[tokio::test]
async fn test_login_with_bad_credentials_redirects_with_error() {
    let app = test_app().await;

    let response = app
        .oneshot(post_form("/login", "username=nobody&password=wrong"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login?error=credentials");
}
