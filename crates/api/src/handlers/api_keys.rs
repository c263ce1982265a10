//! Handlers for self-service API key management.
//!
//! Keys are scoped to their owner: listing and revocation only ever touch
//! the authenticated user's own keys. The plaintext key is returned
//! **only** on creation; subsequent queries expose only the `key_prefix`
//! for identification.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use flueman_core::api_keys::generate_api_key;
use flueman_core::types::{DbId, Timestamp};
use flueman_db::models::api_key::{ApiKeyCreatedResponse, CreateApiKey};
use flueman_db::repositories::ApiKeyRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /auth/api-keys`.
#[derive(Debug, Deserialize)]
pub struct CreateApiKeyRequest {
    /// Optional expiry; `None` means the key never expires.
    pub expires_at: Option<Timestamp>,
}

/// POST /api/v1/auth/api-keys
///
/// Generate a new API key for the authenticated user. The plaintext key
/// is returned exactly once.
pub async fn create_api_key(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(input): Json<CreateApiKeyRequest>,
) -> AppResult<impl IntoResponse> {
    let generated = generate_api_key();

    let key = ApiKeyRepo::create(
        &state.pool,
        &CreateApiKey {
            user_id: user.id,
            key_hash: generated.hash,
            key_prefix: generated.prefix.clone(),
            expires_at: input.expires_at,
        },
    )
    .await?;

    tracing::info!(
        api_key_id = %key.id,
        key_prefix = %generated.prefix,
        user_id = %user.id,
        "API key created",
    );

    let response = ApiKeyCreatedResponse {
        id: key.id,
        key_prefix: generated.prefix,
        plaintext_key: generated.plaintext,
        expires_at: key.expires_at,
        created_at: key.created_at,
    };

    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}

/// GET /api/v1/auth/api-keys
///
/// List the authenticated user's keys. Shows prefix only, never the hash.
pub async fn list_api_keys(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let keys = ApiKeyRepo::list_for_user(&state.pool, user.id).await?;
    Ok(Json(DataResponse { data: keys }))
}

/// POST /api/v1/auth/api-keys/{id}/revoke
///
/// Revoke one of the authenticated user's keys. 404 when the key does not
/// exist, belongs to someone else, or is already revoked.
pub async fn revoke_api_key(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let key = ApiKeyRepo::revoke(&state.pool, id, user.id)
        .await?
        .ok_or(AppError::NotFound {
            entity: "ApiKey",
            id,
        })?;

    tracing::info!(api_key_id = %key.id, user_id = %user.id, "API key revoked");

    Ok(Json(DataResponse { data: key }))
}
