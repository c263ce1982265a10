//! Repository for the `refresh_tokens` table.
//!
//! The rotation state machine lives in the auth service; this layer
//! supplies the conditional updates it needs. `consume` is the atomic
//! `active -> consumed` transition: two concurrent redemptions of the same
//! token race on it, and the loser observes `false`.

use sqlx::PgPool;

use flueman_core::types::DbId;

use crate::models::refresh_token::{CreateRefreshToken, RefreshToken};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, family_id, jti, token_hash, is_active, expires_at, \
                        revoked_at, last_used_at, ip_address, user_agent, created_at, updated_at";

/// Provides CRUD operations for refresh tokens.
pub struct RefreshTokenRepo;

impl RefreshTokenRepo {
    /// Insert a new refresh-token row, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateRefreshToken,
    ) -> Result<RefreshToken, sqlx::Error> {
        let query = format!(
            "INSERT INTO refresh_tokens
                (user_id, family_id, jti, token_hash, expires_at, ip_address, user_agent)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RefreshToken>(&query)
            .bind(input.user_id)
            .bind(input.family_id)
            .bind(&input.jti)
            .bind(&input.token_hash)
            .bind(input.expires_at)
            .bind(&input.ip_address)
            .bind(&input.user_agent)
            .fetch_one(pool)
            .await
    }

    /// Find a refresh token by its peppered hash, regardless of state.
    ///
    /// State evaluation is the caller's job: a consumed or expired row is
    /// a reuse signal, not a miss.
    pub async fn find_by_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM refresh_tokens WHERE token_hash = $1");
        sqlx::query_as::<_, RefreshToken>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Atomically consume a token: `active -> consumed`, stamping
    /// `last_used_at` and `revoked_at` in the same statement.
    ///
    /// Conditional on `is_active` so exactly one of any set of concurrent
    /// redemptions succeeds. Returns `true` for the winner.
    pub async fn consume(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE refresh_tokens
             SET is_active = false, revoked_at = NOW(), last_used_at = NOW(),
                 updated_at = NOW()
             WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Revoke every still-active token in a family. Returns the count revoked.
    ///
    /// Bulk conditional update scoped by `family_id`; completing it before
    /// the reuse error is surfaced guarantees a subsequent request against
    /// the same family sees it revoked.
    pub async fn revoke_family(pool: &PgPool, family_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE refresh_tokens
             SET is_active = false, revoked_at = NOW(), updated_at = NOW()
             WHERE family_id = $1 AND is_active = true",
        )
        .bind(family_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Revoke all active refresh tokens for a user. Returns the count revoked.
    pub async fn revoke_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE refresh_tokens
             SET is_active = false, revoked_at = NOW(), updated_at = NOW()
             WHERE user_id = $1 AND is_active = true",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Count still-active rows in a family. Goes to zero after a family
    /// revocation.
    pub async fn count_active_in_family(
        pool: &PgPool,
        family_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM refresh_tokens WHERE family_id = $1 AND is_active = true",
        )
        .bind(family_id)
        .fetch_one(pool)
        .await
    }

    /// Delete expired or revoked rows. Returns the count of deleted rows.
    pub async fn cleanup_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM refresh_tokens WHERE expires_at < NOW() OR is_active = false",
        )
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
