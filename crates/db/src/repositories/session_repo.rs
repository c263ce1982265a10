//! Repository for the `sessions` table.

use sqlx::PgPool;

use flueman_core::types::DbId;

use crate::models::session::{AccessSession, CreateSession};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, jti, ip_address, user_agent, expires_at, \
                        revoked_at, is_active, created_at, updated_at";

/// Provides CRUD operations for access sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSession,
    ) -> Result<AccessSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO sessions (user_id, jti, ip_address, user_agent, expires_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AccessSession>(&query)
            .bind(input.user_id)
            .bind(&input.jti)
            .bind(&input.ip_address)
            .bind(&input.user_agent)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find a session by the access token's `jti` claim.
    pub async fn find_by_jti(
        pool: &PgPool,
        jti: &str,
    ) -> Result<Option<AccessSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sessions WHERE jti = $1");
        sqlx::query_as::<_, AccessSession>(&query)
            .bind(jti)
            .fetch_optional(pool)
            .await
    }

    /// Revoke the session matching `jti`, if one exists and is still active.
    ///
    /// Conditional on `is_active` so repeated logouts are no-ops rather than
    /// errors. Returns `true` if a row was flipped.
    pub async fn revoke_by_jti(pool: &PgPool, jti: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sessions
             SET is_active = false, revoked_at = NOW(), updated_at = NOW()
             WHERE jti = $1 AND is_active = true",
        )
        .bind(jti)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Revoke all active sessions for a user. Returns the count revoked.
    pub async fn revoke_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sessions
             SET is_active = false, revoked_at = NOW(), updated_at = NOW()
             WHERE user_id = $1 AND is_active = true",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete expired or revoked sessions. Returns the count of deleted rows.
    pub async fn cleanup_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM sessions WHERE expires_at < NOW() OR is_active = false")
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
