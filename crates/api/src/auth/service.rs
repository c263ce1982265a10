//! The auth service: login, refresh rotation with reuse detection, logout,
//! and principal resolution.
//!
//! All session-store mutations go through this type. Refresh tokens follow
//! a strict single-use state machine: `active -> consumed` on rotation,
//! `active -> revoked` on logout or family kill, and expiry is derived from
//! the stored timestamp rather than held as a distinct state. A token in
//! any terminal state can never produce a new access token again.

use chrono::{Duration, Utc};
use uuid::Uuid;

use flueman_core::api_keys::hash_api_key;
use flueman_core::error::AuthError;
use flueman_core::hashing::hash_refresh_token;
use flueman_core::types::{DbId, Timestamp};
use flueman_db::models::refresh_token::CreateRefreshToken;
use flueman_db::models::session::CreateSession;
use flueman_db::models::user::User;
use flueman_db::repositories::{ApiKeyRepo, RefreshTokenRepo, SessionRepo, UserRepo};
use flueman_db::DbPool;

use super::jwt::{self, Claims, JwtConfig, TokenError, TokenType, ISSUER};
use super::password::verify_password;
use crate::error::{AppError, AppResult};

/// Tokens returned by login and refresh.
#[derive(Debug)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Request-scoped auth orchestrator. Cheap to construct per call; all
/// durable state lives in the session store.
pub struct AuthService<'a> {
    pool: &'a DbPool,
    config: &'a JwtConfig,
}

impl<'a> AuthService<'a> {
    pub fn new(pool: &'a DbPool, config: &'a JwtConfig) -> Self {
        Self { pool, config }
    }

    /// Authenticate with email + password and open a new session.
    ///
    /// Unknown email and wrong password produce the identical
    /// [`AuthError::InvalidCredentials`] so accounts cannot be enumerated.
    /// On success: one access session keyed by the access token's `jti`,
    /// and one refresh token under a fresh family id.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        ip: Option<String>,
        ua: Option<String>,
    ) -> AppResult<TokenPair> {
        let user = UserRepo::find_by_email(self.pool, email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password_valid = verify_password(password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification error: {e}")))?;
        if !password_valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        if !user.is_active {
            return Err(AuthError::InactiveUser.into());
        }

        let now = Utc::now();

        // Access session first: its row id becomes the token's `sid` claim.
        let access_jti = Uuid::new_v4().to_string();
        let access_expires = now + Duration::minutes(self.config.access_token_expiry_mins);
        let session = SessionRepo::create(
            self.pool,
            &CreateSession {
                user_id: user.id,
                jti: access_jti.clone(),
                ip_address: ip.clone(),
                user_agent: ua.clone(),
                expires_at: access_expires,
            },
        )
        .await?;

        let access_token = self.sign(
            user.id,
            access_jti,
            TokenType::Access,
            now,
            access_expires,
            Some(session.id.to_string()),
        )?;

        let family_id = Uuid::new_v4();
        let refresh_token = self.issue_refresh(user.id, family_id, now, ip, ua).await?;

        tracing::info!(user_id = %user.id, %family_id, "Login succeeded");

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.config.access_token_expiry_mins * 60,
        })
    }

    /// Exchange a refresh token for a new access + refresh pair.
    ///
    /// Strict single-use rotation: the presented token is atomically
    /// consumed before new tokens are minted. Presenting a token that is
    /// already consumed, revoked, or expired -- or losing the consume race
    /// to a concurrent request -- is treated as a reuse signal, and the
    /// entire family is revoked before the error is surfaced.
    pub async fn refresh(&self, raw_refresh_token: &str) -> AppResult<TokenPair> {
        let claims = match jwt::decode_token(raw_refresh_token, self.config) {
            Ok(claims) => claims,
            Err(TokenError::Expired) => {
                // An expired refresh JWT still identifies its stored row,
                // so reuse detection must fire for it too.
                return Err(self.kill_family_of(raw_refresh_token).await?);
            }
            Err(TokenError::Malformed) => return Err(AuthError::InvalidRefreshToken.into()),
        };

        if claims.typ != TokenType::Refresh {
            return Err(AuthError::NotARefreshToken.into());
        }

        let token_hash = hash_refresh_token(raw_refresh_token, &self.config.refresh_token_pepper);
        let token = RefreshTokenRepo::find_by_hash(self.pool, &token_hash)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        let now = Utc::now();
        if !token.is_redeemable(now) {
            self.revoke_family(token.family_id, token.user_id).await?;
            return Err(AuthError::ReusedOrExpiredToken.into());
        }

        // Atomic active -> consumed transition. A losing concurrent racer
        // observes `false` here and is treated as a reuse event.
        let consumed = RefreshTokenRepo::consume(self.pool, token.id).await?;
        if !consumed {
            self.revoke_family(token.family_id, token.user_id).await?;
            return Err(AuthError::ReusedOrExpiredToken.into());
        }

        // Rotation succeeded: mint a new pair under the same family,
        // inheriting the issuance ip/ua.
        let access_jti = Uuid::new_v4().to_string();
        let access_expires = now + Duration::minutes(self.config.access_token_expiry_mins);
        let access_token = self.sign(
            token.user_id,
            access_jti,
            TokenType::Access,
            now,
            access_expires,
            None,
        )?;

        let refresh_token = self
            .issue_refresh(
                token.user_id,
                token.family_id,
                now,
                token.ip_address.clone(),
                token.user_agent.clone(),
            )
            .await?;

        tracing::debug!(user_id = %token.user_id, family_id = %token.family_id, "Refresh token rotated");

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.config.access_token_expiry_mins * 60,
        })
    }

    /// Revoke the access session named by the token's `jti` claim.
    ///
    /// Idempotent: a second logout, an already-expired token, or a token
    /// with no matching session all succeed silently. An undecodable token
    /// names no session, so there is nothing to revoke and nothing to
    /// report.
    pub async fn logout(&self, access_token: &str) -> AppResult<()> {
        let claims = match jwt::decode_token_allow_expired(access_token, self.config) {
            Ok(claims) => claims,
            Err(_) => return Ok(()),
        };

        let revoked = SessionRepo::revoke_by_jti(self.pool, &claims.jti).await?;
        if revoked {
            tracing::info!(jti = %claims.jti, "Session revoked");
        }
        Ok(())
    }

    /// Resolve an access token to its active user.
    pub async fn resolve_current_user(&self, token: &str) -> AppResult<User> {
        let claims = jwt::decode_token(token, self.config)
            .map_err(|_| AuthError::Unauthenticated("Invalid or expired token".into()))?;

        if claims.typ != TokenType::Access {
            return Err(AuthError::Unauthenticated("Not an access token".into()).into());
        }

        let user_id: DbId = claims
            .sub
            .parse()
            .map_err(|_| AuthError::Unauthenticated("Invalid token subject".into()))?;

        let user = UserRepo::find_by_id(self.pool, user_id)
            .await?
            .ok_or(AuthError::UserNotFound { id: user_id })?;

        if !user.is_active {
            return Err(AuthError::InactiveUser.into());
        }

        Ok(user)
    }

    /// Resolve a raw API key to its active owning user.
    ///
    /// Absent, revoked, and expired keys, and keys owned by an inactive
    /// user, all fail with the same [`AuthError::InvalidApiKey`].
    pub async fn resolve_by_api_key(&self, raw_key: &str) -> AppResult<User> {
        let key_hash = hash_api_key(raw_key);
        let key = ApiKeyRepo::find_active_by_hash(self.pool, &key_hash)
            .await?
            .ok_or(AuthError::InvalidApiKey)?;

        let user = UserRepo::find_by_id(self.pool, key.user_id)
            .await?
            .ok_or(AuthError::InvalidApiKey)?;
        if !user.is_active {
            return Err(AuthError::InvalidApiKey.into());
        }

        ApiKeyRepo::touch_last_used(self.pool, key.id).await?;

        Ok(user)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Mint a refresh token and persist its hash row under `family_id`.
    async fn issue_refresh(
        &self,
        user_id: DbId,
        family_id: DbId,
        now: Timestamp,
        ip: Option<String>,
        ua: Option<String>,
    ) -> AppResult<String> {
        let jti = Uuid::new_v4().to_string();
        let expires_at = now + Duration::days(self.config.refresh_token_expiry_days);
        let token = self.sign(user_id, jti.clone(), TokenType::Refresh, now, expires_at, None)?;
        let token_hash = hash_refresh_token(&token, &self.config.refresh_token_pepper);

        RefreshTokenRepo::create(
            self.pool,
            &CreateRefreshToken {
                user_id,
                family_id,
                jti,
                token_hash,
                expires_at,
                ip_address: ip,
                user_agent: ua,
            },
        )
        .await?;

        Ok(token)
    }

    /// Sign a claim set for the given user.
    fn sign(
        &self,
        user_id: DbId,
        jti: String,
        typ: TokenType,
        now: Timestamp,
        expires_at: Timestamp,
        sid: Option<String>,
    ) -> AppResult<String> {
        let claims = Claims {
            iss: ISSUER.to_string(),
            sub: user_id.to_string(),
            jti,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            typ,
            sid,
        };
        jwt::encode_token(&claims, self.config)
            .map_err(|e| AppError::Internal(format!("Token encoding error: {e}")))
    }

    /// Revoke every token in a family, logging the anomaly. Must complete
    /// before the triggering error is surfaced to the caller.
    async fn revoke_family(&self, family_id: DbId, user_id: DbId) -> AppResult<()> {
        let revoked = RefreshTokenRepo::revoke_family(self.pool, family_id).await?;
        tracing::warn!(
            %user_id,
            %family_id,
            revoked,
            "Refresh token reuse detected, family revoked"
        );
        Ok(())
    }

    /// Reuse handling for a refresh token that failed expiry validation at
    /// the codec level: look its row up by hash and kill the family.
    /// Returns the error to surface.
    async fn kill_family_of(&self, raw_refresh_token: &str) -> Result<AppError, AppError> {
        let token_hash = hash_refresh_token(raw_refresh_token, &self.config.refresh_token_pepper);
        match RefreshTokenRepo::find_by_hash(self.pool, &token_hash).await? {
            Some(token) => {
                self.revoke_family(token.family_id, token.user_id).await?;
                Ok(AuthError::ReusedOrExpiredToken.into())
            }
            None => Ok(AuthError::InvalidRefreshToken.into()),
        }
    }
}
