//! API-key authentication extractor for the external surface.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use flueman_core::error::AuthError;
use flueman_db::models::user::User;

use crate::auth::service::AuthService;
use crate::error::AppError;
use crate::state::AppState;

/// User authenticated by an `X-API-Key` header.
///
/// Every failure mode (missing header, unknown key, revoked or expired
/// key, inactive owner) rejects with the same 401 `INVALID_API_KEY` so
/// callers cannot probe which keys exist.
#[derive(Debug, Clone)]
pub struct ApiKeyUser(pub User);

impl FromRequestParts<AppState> for ApiKeyUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw_key = parts
            .headers
            .get("x-api-key")
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or(AuthError::InvalidApiKey)?;

        let service = AuthService::new(&state.pool, &state.config.jwt);
        let user = service.resolve_by_api_key(raw_key).await?;

        Ok(ApiKeyUser(user))
    }
}
