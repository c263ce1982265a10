use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use flueman_core::error::AuthError;
use flueman_core::types::DbId;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`AuthError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `flueman_core`.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A referenced entity does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- AuthError variants ---
            AppError::Auth(auth) => match auth {
                AuthError::InvalidCredentials => (
                    StatusCode::UNAUTHORIZED,
                    "INVALID_CREDENTIALS",
                    "Invalid email or password".to_string(),
                ),
                AuthError::Unauthenticated(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", msg.clone())
                }
                AuthError::NotARefreshToken => (
                    StatusCode::BAD_REQUEST,
                    "NOT_A_REFRESH_TOKEN",
                    "Token is not a refresh token".to_string(),
                ),
                AuthError::InvalidRefreshToken => (
                    StatusCode::UNAUTHORIZED,
                    "INVALID_REFRESH_TOKEN",
                    "Invalid refresh token".to_string(),
                ),
                AuthError::ReusedOrExpiredToken => (
                    StatusCode::UNAUTHORIZED,
                    "REUSED_OR_EXPIRED_TOKEN",
                    "Refresh token has been used, revoked, or expired".to_string(),
                ),
                AuthError::UserNotFound { id } => (
                    StatusCode::NOT_FOUND,
                    "USER_NOT_FOUND",
                    format!("User with id {id} not found"),
                ),
                AuthError::InactiveUser => (
                    StatusCode::FORBIDDEN,
                    "INACTIVE_USER",
                    "User account is deactivated".to_string(),
                ),
                AuthError::InvalidApiKey => (
                    StatusCode::UNAUTHORIZED,
                    "INVALID_API_KEY",
                    "Invalid API key".to_string(),
                ),
                AuthError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal auth error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::NotFound { entity, id } => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{entity} with id {id} not found"),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_credentials_maps_to_401() {
        let response = AppError::from(AuthError::InvalidCredentials).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn inactive_user_maps_to_403() {
        let response = AppError::from(AuthError::InactiveUser).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn not_a_refresh_token_maps_to_400() {
        let response = AppError::from(AuthError::NotARefreshToken).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_message_is_sanitized() {
        let response = AppError::Internal("connection string leaked".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
