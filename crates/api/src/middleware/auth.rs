//! Bearer-credential extractors for Axum handlers.
//!
//! Credential lookup order is the `Authorization: Bearer` header first,
//! then the `access_token` cookie. The header always wins when both are
//! present.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use flueman_core::error::AuthError;
use flueman_db::models::user::User;

use crate::auth::service::AuthService;
use crate::error::AppError;
use crate::state::AppState;

/// Raw bearer credential pulled from the request, not yet validated.
///
/// Handlers that need the token itself (logout revokes the session the
/// token names) extract this instead of [`CurrentUser`].
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl FromRequestParts<AppState> for BearerToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        extract_bearer(parts)
            .map(BearerToken)
            .ok_or_else(|| AuthError::Unauthenticated("Missing credentials".into()).into())
    }
}

/// Authenticated user resolved from a bearer access token.
///
/// Rejects with 401 for missing or invalid credentials, 404 when the
/// token's subject no longer exists, and 403 for a deactivated account.
///
/// ```ignore
/// async fn my_handler(CurrentUser(user): CurrentUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer(parts)
            .ok_or_else(|| AuthError::Unauthenticated("Missing credentials".into()))?;

        let service = AuthService::new(&state.pool, &state.config.jwt);
        let user = service.resolve_current_user(&token).await?;

        Ok(CurrentUser(user))
    }
}

/// Pull the bearer credential from the `Authorization` header, falling
/// back to the `access_token` cookie.
fn extract_bearer(parts: &Parts) -> Option<String> {
    if let Some(header) = parts.headers.get("authorization").and_then(|v| v.to_str().ok()) {
        if let Some(token) = header.strip_prefix("Bearer ") {
            return Some(token.to_string());
        }
    }

    parts
        .headers
        .get("cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(cookie_value)
}

/// Find the `access_token` value in a `Cookie` header.
fn cookie_value(header: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == "access_token" && !value.is_empty()).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::cookie_value;

    #[test]
    fn finds_access_token_among_other_cookies() {
        let header = "theme=dark; access_token=abc.def.ghi; lang=en";
        assert_eq!(cookie_value(header), Some("abc.def.ghi".to_string()));
    }

    #[test]
    fn ignores_empty_and_missing_values() {
        assert_eq!(cookie_value("access_token="), None);
        assert_eq!(cookie_value("session=xyz"), None);
    }
}
