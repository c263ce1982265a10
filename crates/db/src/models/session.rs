//! Access-session model and DTOs.
//!
//! One row per issued access token, keyed by the token's `jti` claim so a
//! session can be revoked without ever storing the raw token.

use sqlx::FromRow;

use flueman_core::types::{DbId, Timestamp};

/// A row from the `sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct AccessSession {
    pub id: DbId,
    pub user_id: DbId,
    pub jti: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
    /// Redundant with `revoked_at` for cheap active-session filtering.
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new access session.
pub struct CreateSession {
    pub user_id: DbId,
    pub jti: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub expires_at: Timestamp,
}
