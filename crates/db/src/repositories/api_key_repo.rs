//! Repository for the `api_keys` table.

use sqlx::PgPool;

use flueman_core::types::DbId;

use crate::models::api_key::{ApiKey, CreateApiKey};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, key_hash, key_prefix, expires_at, is_revoked, \
                        last_used_at, created_at, updated_at";

/// Provides CRUD operations for API keys.
pub struct ApiKeyRepo;

impl ApiKeyRepo {
    /// Insert a new API key row, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateApiKey) -> Result<ApiKey, sqlx::Error> {
        let query = format!(
            "INSERT INTO api_keys (user_id, key_hash, key_prefix, expires_at)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ApiKey>(&query)
            .bind(input.user_id)
            .bind(&input.key_hash)
            .bind(&input.key_prefix)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find a non-revoked, non-expired API key by its SHA-256 hash.
    ///
    /// Used during authentication. Returns the key only if it is valid.
    pub async fn find_active_by_hash(
        pool: &PgPool,
        key_hash: &str,
    ) -> Result<Option<ApiKey>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM api_keys
             WHERE key_hash = $1
               AND is_revoked = false
               AND (expires_at IS NULL OR expires_at > NOW())"
        );
        sqlx::query_as::<_, ApiKey>(&query)
            .bind(key_hash)
            .fetch_optional(pool)
            .await
    }

    /// List all keys owned by a user, newest first. Hashes stay server-side
    /// because [`ApiKey`] skips them during serialization.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<ApiKey>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM api_keys WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ApiKey>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Revoke a key owned by the given user. Returns the updated row, or
    /// `None` when no matching non-revoked key exists.
    pub async fn revoke(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<ApiKey>, sqlx::Error> {
        let query = format!(
            "UPDATE api_keys SET is_revoked = true, updated_at = NOW()
             WHERE id = $1 AND user_id = $2 AND is_revoked = false
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ApiKey>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Update `last_used_at` to the current timestamp.
    pub async fn touch_last_used(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE api_keys SET last_used_at = NOW(), updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
