//! Refresh-token model and DTOs.
//!
//! One row per issued refresh token. The raw token value is never stored;
//! `token_hash` holds its peppered digest. `family_id` groups every token
//! descending from one original login so an entire rotation lineage can be
//! revoked in a single bulk update when reuse is detected.

use sqlx::FromRow;

use flueman_core::types::{DbId, Timestamp};

/// A row from the `refresh_tokens` table.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshToken {
    pub id: DbId,
    pub user_id: DbId,
    pub family_id: DbId,
    pub jti: String,
    pub token_hash: String,
    pub is_active: bool,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
    pub last_used_at: Option<Timestamp>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl RefreshToken {
    /// Whether the token can still be redeemed: active and not past expiry.
    pub fn is_redeemable(&self, now: Timestamp) -> bool {
        self.is_active && self.expires_at > now
    }
}

/// DTO for creating a new refresh-token row.
pub struct CreateRefreshToken {
    pub user_id: DbId,
    pub family_id: DbId,
    pub jti: String,
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}
