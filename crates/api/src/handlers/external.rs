//! Handlers for the external (API-key authenticated) surface.

use axum::Json;

use crate::error::AppResult;
use crate::handlers::auth::MeResponse;
use crate::middleware::api_key::ApiKeyUser;

/// GET /api/v1/external/me
///
/// Return the profile of the user owning the presented API key.
pub async fn me(ApiKeyUser(user): ApiKeyUser) -> AppResult<Json<MeResponse>> {
    Ok(Json(MeResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        role: user.role,
    }))
}
