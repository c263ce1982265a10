use crate::types::DbId;

/// Domain-level authentication failure taxonomy.
///
/// Every variant maps to a single HTTP status at the API boundary (see the
/// `AppError` impl in `flueman-api`). Storage and codec failures are NOT
/// part of this enum -- they surface as opaque internal errors and must
/// never be confused with an authentication decision.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown identifier or wrong password. Deliberately identical for
    /// both cases so callers cannot enumerate accounts.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Missing, malformed, or expired access credential.
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// A token of the wrong type was presented to the refresh endpoint.
    #[error("Not a refresh token")]
    NotARefreshToken,

    /// The presented refresh token matches no stored record.
    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    /// The presented refresh token was already consumed, revoked, or has
    /// expired. Raising this implies the whole token family has been
    /// revoked as a side effect.
    #[error("Reused or expired refresh token")]
    ReusedOrExpiredToken,

    /// The token subject does not resolve to a stored user.
    #[error("User {id} not found")]
    UserNotFound { id: DbId },

    /// The resolved user exists but has been deactivated.
    #[error("Inactive user")]
    InactiveUser,

    /// Unknown, revoked, or expired API key, or the owning user is
    /// inactive. One variant for all cases, same reasoning as
    /// [`AuthError::InvalidCredentials`].
    #[error("Invalid API key")]
    InvalidApiKey,

    /// An unexpected internal failure (codec, hashing). Surfaced as 500.
    #[error("Internal error: {0}")]
    Internal(String),
}
