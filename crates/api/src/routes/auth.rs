//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{api_keys, auth};
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /login                 -> login
/// POST /refresh               -> refresh
/// POST /logout                -> logout (requires credential)
/// GET  /me                    -> me (requires auth)
/// GET  /api-keys              -> list_api_keys (requires auth)
/// POST /api-keys              -> create_api_key (requires auth)
/// POST /api-keys/{id}/revoke  -> revoke_api_key (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .route(
            "/api-keys",
            get(api_keys::list_api_keys).post(api_keys::create_api_key),
        )
        .route("/api-keys/{id}/revoke", post(api_keys::revoke_api_key))
}
