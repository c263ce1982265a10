//! Route definitions for the API-key authenticated external surface.

use axum::routing::get;
use axum::Router;

use crate::handlers::external;
use crate::state::AppState;

/// Routes mounted at `/external`.
///
/// ```text
/// GET /me  -> me (X-API-Key auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/me", get(external::me))
}
