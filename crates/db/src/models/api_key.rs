//! API key model and DTOs.

use serde::Serialize;
use sqlx::FromRow;

use flueman_core::types::{DbId, Timestamp};

/// A row from the `api_keys` table.
///
/// **Note:** `key_hash` is never serialized to responses. The `key_prefix`
/// field is used for human-readable identification.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApiKey {
    pub id: DbId,
    pub user_id: DbId,
    #[serde(skip_serializing)]
    pub key_hash: String,
    pub key_prefix: String,
    pub expires_at: Option<Timestamp>,
    pub is_revoked: bool,
    pub last_used_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Response returned when a new API key is created.
/// Includes the plaintext key (shown exactly once).
#[derive(Debug, Clone, Serialize)]
pub struct ApiKeyCreatedResponse {
    pub id: DbId,
    pub key_prefix: String,
    /// The full plaintext key. Shown **once** and never stored.
    pub plaintext_key: String,
    pub expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for creating a new API key row.
pub struct CreateApiKey {
    pub user_id: DbId,
    pub key_hash: String,
    pub key_prefix: String,
    pub expires_at: Option<Timestamp>,
}
