pub mod auth;
pub mod external;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                  login (public)
/// /auth/refresh                refresh (public)
/// /auth/logout                 logout (requires credential)
/// /auth/me                     current user profile (requires auth)
/// /auth/api-keys               list, create (requires auth)
/// /auth/api-keys/{id}/revoke   revoke own key (requires auth)
///
/// /external/me                 key owner profile (X-API-Key auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Session authentication (login, refresh, logout, me, api keys).
        .nest("/auth", auth::router())
        // API-key authenticated surface for machine clients.
        .nest("/external", external::router())
}
