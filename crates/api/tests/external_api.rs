//! HTTP-level integration tests for API key management and the external
//! (X-API-Key authenticated) surface.

mod common;

use axum::http::StatusCode;
use common::{assert_error_code, body_json, get_auth, get_with_header, post_auth, post_json, post_json_auth};
use sqlx::PgPool;

use flueman_api::auth::password::hash_password;
use flueman_core::api_keys::KEY_PREFIX_LENGTH;
use flueman_core::roles::ROLE_USER;
use flueman_db::models::user::CreateUser;
use flueman_db::repositories::UserRepo;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a user and log them in, returning an access token.
async fn login_test_user(pool: &PgPool, username: &str) -> String {
    let password = "correcthorse1";
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@test.com"),
        password_hash: hash_password(password).expect("hashing should succeed"),
        role: ROLE_USER.to_string(),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed");

    let body = serde_json::json!({ "email": format!("{username}@test.com"), "password": password });
    let response = post_json(common::build_test_app(pool.clone()), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Create an API key via the management endpoint, returning the response
/// `data` payload (contains the plaintext key).
async fn create_key(pool: &PgPool, access_token: &str) -> serde_json::Value {
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/api-keys",
        serde_json::json!({ "expires_at": null }),
        access_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Key management
// ---------------------------------------------------------------------------

/// Creation returns the plaintext key once, with a matching prefix.
#[sqlx::test(migrations = "../db/migrations")]
async fn create_key_returns_plaintext_once(pool: PgPool) {
    let token = login_test_user(&pool, "keymaker").await;

    let data = create_key(&pool, &token).await;
    let plaintext = data["plaintext_key"].as_str().unwrap();
    let prefix = data["key_prefix"].as_str().unwrap();

    assert_eq!(prefix.len(), KEY_PREFIX_LENGTH);
    assert!(plaintext.starts_with(prefix));

    // Listing never exposes the plaintext or the hash, only the prefix.
    let response = get_auth(common::build_test_app(pool), "/api/v1/auth/api-keys", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let keys = body_json(response).await["data"].clone();
    assert_eq!(keys.as_array().unwrap().len(), 1);
    assert_eq!(keys[0]["key_prefix"], prefix);
    assert!(keys[0].get("key_hash").is_none());
    assert!(keys[0].get("plaintext_key").is_none());
}

/// Listing only shows the caller's own keys.
#[sqlx::test(migrations = "../db/migrations")]
async fn list_is_scoped_to_owner(pool: PgPool) {
    let alice = login_test_user(&pool, "alice").await;
    let bob = login_test_user(&pool, "bob").await;

    create_key(&pool, &alice).await;

    let response = get_auth(common::build_test_app(pool), "/api/v1/auth/api-keys", &bob).await;
    let keys = body_json(response).await["data"].clone();
    assert_eq!(keys.as_array().unwrap().len(), 0);
}

/// Revoking someone else's key is a 404, not a silent success.
#[sqlx::test(migrations = "../db/migrations")]
async fn revoke_foreign_key_is_not_found(pool: PgPool) {
    let owner = login_test_user(&pool, "owner").await;
    let thief = login_test_user(&pool, "thief").await;

    let data = create_key(&pool, &owner).await;
    let key_id = data["id"].as_str().unwrap();

    let response = post_auth(
        common::build_test_app(pool),
        &format!("/api/v1/auth/api-keys/{key_id}/revoke"),
        &thief,
    )
    .await;
    assert_error_code(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}

// ---------------------------------------------------------------------------
// External surface
// ---------------------------------------------------------------------------

/// A fresh key authenticates /external/me and resolves to its owner.
#[sqlx::test(migrations = "../db/migrations")]
async fn external_me_with_valid_key(pool: PgPool) {
    let token = login_test_user(&pool, "machine").await;
    let data = create_key(&pool, &token).await;
    let plaintext = data["plaintext_key"].as_str().unwrap();

    let response = get_with_header(
        common::build_test_app(pool),
        "/api/v1/external/me",
        ("x-api-key", plaintext),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["username"], "machine");
    assert_eq!(json["email"], "machine@test.com");
}

/// A revoked key stops authenticating immediately.
#[sqlx::test(migrations = "../db/migrations")]
async fn external_me_with_revoked_key(pool: PgPool) {
    let token = login_test_user(&pool, "revoker").await;
    let data = create_key(&pool, &token).await;
    let plaintext = data["plaintext_key"].as_str().unwrap().to_string();
    let key_id = data["id"].as_str().unwrap();

    let response = post_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/auth/api-keys/{key_id}/revoke"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_with_header(
        common::build_test_app(pool),
        "/api/v1/external/me",
        ("x-api-key", &plaintext),
    )
    .await;
    assert_error_code(response, StatusCode::UNAUTHORIZED, "INVALID_API_KEY").await;
}

/// Unknown keys and a missing header are the same 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn external_me_with_bad_or_missing_key(pool: PgPool) {
    let response = get_with_header(
        common::build_test_app(pool.clone()),
        "/api/v1/external/me",
        ("x-api-key", "not-a-real-key"),
    )
    .await;
    assert_error_code(response, StatusCode::UNAUTHORIZED, "INVALID_API_KEY").await;

    let response = common::get(common::build_test_app(pool), "/api/v1/external/me").await;
    assert_error_code(response, StatusCode::UNAUTHORIZED, "INVALID_API_KEY").await;
}
