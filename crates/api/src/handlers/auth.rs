//! Handlers for the `/auth` resource (login, refresh, logout, me).

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use flueman_core::types::DbId;
use flueman_db::models::user::UserResponse;

use crate::auth::service::{AuthService, TokenPair};
use crate::error::AppResult;
use crate::middleware::auth::{BearerToken, CurrentUser};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Successful authentication response returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Always `"Bearer"`.
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: "Bearer",
            expires_in: pair.expires_in,
        }
    }
}

/// Response body for `POST /auth/logout`.
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    /// Always `"ok"`.
    pub status: &'static str,
}

/// Response body for `GET /auth/me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub role: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns access and refresh tokens.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let (ip, ua) = client_metadata(&headers);

    let service = AuthService::new(&state.pool, &state.config.jwt);
    let pair = service.login(&input.email, &input.password, ip, ua).await?;

    Ok(Json(pair.into()))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a refresh token for a new access + refresh pair. The presented
/// token is consumed; reusing it revokes its entire family.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<TokenResponse>> {
    let service = AuthService::new(&state.pool, &state.config.jwt);
    let pair = service.refresh(&input.refresh_token).await?;

    Ok(Json(pair.into()))
}

/// POST /api/v1/auth/logout
///
/// Revoke the session named by the presented access token. Idempotent:
/// always returns `{"status": "ok"}` once a credential is presented, even
/// for expired tokens or already-revoked sessions.
pub async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> AppResult<Json<LogoutResponse>> {
    let service = AuthService::new(&state.pool, &state.config.jwt);
    service.logout(&token).await?;

    Ok(Json(LogoutResponse { status: "ok" }))
}

/// GET /api/v1/auth/me
///
/// Return the authenticated user's public profile.
pub async fn me(CurrentUser(user): CurrentUser) -> AppResult<Json<MeResponse>> {
    let profile = UserResponse::from(&user);
    Ok(Json(MeResponse {
        id: profile.id,
        username: profile.username,
        email: profile.email,
        role: profile.role,
    }))
}

/// Best-effort client ip/ua for session audit fields. The ip comes from
/// `x-forwarded-for` (first hop), which is only trustworthy behind the
/// project's own proxy.
fn client_metadata(headers: &HeaderMap) -> (Option<String>, Option<String>) {
    let ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let ua = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
        .filter(|v| !v.is_empty());

    (ip, ua)
}
