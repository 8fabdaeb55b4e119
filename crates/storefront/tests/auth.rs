//! Authentication integration tests against an in-memory database.

#![allow(clippy::unwrap_used)]

mod common;

use bookstall_storefront::services::{AuthError, AuthService};

use common::{register_user, setup_pool};

#[tokio::test]
async fn test_register_and_login() {
    let pool = setup_pool().await;
    let auth = AuthService::new(&pool);

    let user = auth
        .register("alice", "alice@example.com", "p1")
        .await
        .unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(user.email.as_ref(), "alice@example.com");

    let logged_in = auth.login("alice", "p1").await.unwrap();
    assert_eq!(logged_in.id, user.id);
}

#[tokio::test]
async fn test_login_rejects_wrong_password_and_unknown_user() {
    let pool = setup_pool().await;
    let auth = AuthService::new(&pool);
    register_user(&pool, "alice").await;

    let err = auth.login("alice", "not-the-password").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));

    let err = auth.login("nobody", "p1").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn test_duplicate_username_rejected() {
    let pool = setup_pool().await;
    let auth = AuthService::new(&pool);
    register_user(&pool, "alice").await;

    let err = auth
        .register("alice", "other@example.com", "p1")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::UsernameTaken));

    // No second row was created
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let pool = setup_pool().await;
    let auth = AuthService::new(&pool);
    register_user(&pool, "alice").await;

    let err = auth
        .register("alice2", "alice@example.com", "p1")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::EmailTaken));
}

#[tokio::test]
async fn test_register_validates_fields() {
    let pool = setup_pool().await;
    let auth = AuthService::new(&pool);

    let err = auth.register("", "a@example.com", "p1").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidUsername(_)));

    let err = auth.register("alice", "not-an-email", "p1").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidEmail(_)));

    let err = auth.register("alice", "a@example.com", "").await.unwrap_err();
    assert!(matches!(err, AuthError::WeakPassword(_)));
}

#[tokio::test]
async fn test_password_is_stored_hashed() {
    let pool = setup_pool().await;
    register_user(&pool, "alice").await;

    let (hash,): (String,) =
        sqlx::query_as("SELECT password_hash FROM users WHERE username = 'alice'")
            .fetch_one(&pool)
            .await
            .unwrap();

    assert!(hash.starts_with("$argon2"));
    assert_ne!(hash, "p1");
}
