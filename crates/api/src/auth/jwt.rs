//! Signed, expiring claim-set codec.
//!
//! Both access and refresh tokens are HMAC-signed JWTs carrying a
//! [`Claims`] payload with a `typ` discriminator. The codec is a pure
//! function of its inputs and the configured signing secret: no type or
//! subject validation happens here, that is the caller's responsibility.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Issuer tag stamped on every token and validated on decode.
pub const ISSUER: &str = "flueman";

/// Default access token expiry in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 30;
/// Default refresh token expiry in days.
const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 14;

/// Token type discriminator embedded in the `typ` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims embedded in every token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Issuer tag, always [`ISSUER`].
    pub iss: String,
    /// Subject -- the user id as a string.
    pub sub: String,
    /// Unique token identifier (UUID v4) for revocation / lookup.
    pub jti: String,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Token type discriminator.
    pub typ: TokenType,
    /// Session id linking an access token to its session row. Absent on
    /// refresh tokens and on access tokens minted during rotation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
}

/// Codec failure taxonomy. Everything that is not a clean expiry is
/// malformed -- bad signature, bad structure, wrong issuer.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,
    #[error("Malformed token")]
    Malformed,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed,
        }
    }
}

/// Configuration for token signing, validation, and refresh-hash keying.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret used to sign and verify tokens.
    pub secret: String,
    /// Signing algorithm (HMAC family, default HS256).
    pub algorithm: jsonwebtoken::Algorithm,
    /// Access token lifetime in minutes (default: 30).
    pub access_token_expiry_mins: i64,
    /// Refresh token lifetime in days (default: 14).
    pub refresh_token_expiry_days: i64,
    /// Server-held pepper keying the refresh-token storage digest.
    pub refresh_token_pepper: String,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                    | Required | Default |
    /// |----------------------------|----------|---------|
    /// | `JWT_SECRET`               | **yes**  | --      |
    /// | `REFRESH_TOKEN_PEPPER`     | **yes**  | --      |
    /// | `JWT_ALGORITHM`            | no       | `HS256` |
    /// | `JWT_ACCESS_EXPIRY_MINS`   | no       | `30`    |
    /// | `JWT_REFRESH_EXPIRY_DAYS`  | no       | `14`    |
    ///
    /// # Panics
    ///
    /// Panics if a required secret is not set or is empty. Secrets have no
    /// silent defaults.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let refresh_token_pepper = std::env::var("REFRESH_TOKEN_PEPPER")
            .expect("REFRESH_TOKEN_PEPPER must be set in the environment");
        assert!(
            !refresh_token_pepper.is_empty(),
            "REFRESH_TOKEN_PEPPER must not be empty"
        );

        let algorithm: jsonwebtoken::Algorithm = std::env::var("JWT_ALGORITHM")
            .unwrap_or_else(|_| "HS256".to_string())
            .parse()
            .expect("JWT_ALGORITHM must be a valid JWT algorithm name");

        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        let refresh_token_expiry_days: i64 = std::env::var("JWT_REFRESH_EXPIRY_DAYS")
            .unwrap_or_else(|_| DEFAULT_REFRESH_EXPIRY_DAYS.to_string())
            .parse()
            .expect("JWT_REFRESH_EXPIRY_DAYS must be a valid i64");

        Self {
            secret,
            algorithm,
            access_token_expiry_mins,
            refresh_token_expiry_days,
            refresh_token_pepper,
        }
    }
}

/// Sign a claim set into a token string.
pub fn encode_token(claims: &Claims, config: &JwtConfig) -> Result<String, TokenError> {
    encode(
        &Header::new(config.algorithm),
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(TokenError::from)
}

/// Validate and decode a token, returning the embedded [`Claims`].
///
/// Validates signature, issuer, and expiry (no leeway, so expiry is
/// deterministic down to the second).
pub fn decode_token(token: &str, config: &JwtConfig) -> Result<Claims, TokenError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &strict_validation(config),
    )?;
    Ok(token_data.claims)
}

/// Decode a token without enforcing expiry. The signature and issuer are
/// still validated. Used by logout, where revocation of an already-expired
/// session is still meaningful.
pub fn decode_token_allow_expired(token: &str, config: &JwtConfig) -> Result<Claims, TokenError> {
    let mut validation = strict_validation(config);
    validation.validate_exp = false;
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

fn strict_validation(config: &JwtConfig) -> Validation {
    let mut validation = Validation::new(config.algorithm);
    validation.leeway = 0;
    validation.set_issuer(&[ISSUER]);
    validation
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use uuid::Uuid;

    /// Helper to build a test config with a known secret.
    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            algorithm: jsonwebtoken::Algorithm::HS256,
            access_token_expiry_mins: 30,
            refresh_token_expiry_days: 14,
            refresh_token_pepper: "test-pepper".to_string(),
        }
    }

    fn test_claims(typ: TokenType, exp_offset_secs: i64) -> Claims {
        let now = chrono::Utc::now().timestamp();
        Claims {
            iss: ISSUER.to_string(),
            sub: Uuid::new_v4().to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + exp_offset_secs,
            typ,
            sid: None,
        }
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let config = test_config();
        let claims = test_claims(TokenType::Access, 900);

        let token = encode_token(&claims, &config).expect("encoding should succeed");
        let decoded = decode_token(&token, &config).expect("decoding should succeed");

        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.jti, claims.jti);
        assert_eq!(decoded.typ, TokenType::Access);
        assert_eq!(decoded.iss, ISSUER);
        assert!(decoded.exp > decoded.iat);
    }

    #[test]
    fn test_type_discriminator_survives_round_trip() {
        let config = test_config();
        let claims = test_claims(TokenType::Refresh, 3600);

        let token = encode_token(&claims, &config).expect("encoding should succeed");
        let decoded = decode_token(&token, &config).expect("decoding should succeed");

        assert_eq!(decoded.typ, TokenType::Refresh);
    }

    #[test]
    fn test_expired_token_fails_deterministically() {
        let config = test_config();
        // Expired one second ago. With zero leeway this must fail.
        let claims = test_claims(TokenType::Access, -1);

        let token = encode_token(&claims, &config).expect("encoding should succeed");
        let result = decode_token(&token, &config);

        assert_matches!(result, Err(TokenError::Expired));
    }

    #[test]
    fn test_expired_token_decodes_with_expiry_disabled() {
        let config = test_config();
        let claims = test_claims(TokenType::Access, -300);

        let token = encode_token(&claims, &config).expect("encoding should succeed");
        let decoded =
            decode_token_allow_expired(&token, &config).expect("decoding should succeed");

        assert_eq!(decoded.jti, claims.jti);
    }

    #[test]
    fn test_wrong_secret_is_malformed() {
        let config_a = test_config();
        let config_b = JwtConfig {
            secret: "a-completely-different-secret".to_string(),
            ..test_config()
        };

        let claims = test_claims(TokenType::Access, 900);
        let token = encode_token(&claims, &config_a).expect("encoding should succeed");

        let result = decode_token(&token, &config_b);
        assert_matches!(result, Err(TokenError::Malformed));
    }

    #[test]
    fn test_wrong_issuer_is_malformed() {
        let config = test_config();
        let mut claims = test_claims(TokenType::Access, 900);
        claims.iss = "someone-else".to_string();

        let token = encode_token(&claims, &config).expect("encoding should succeed");
        let result = decode_token(&token, &config);

        assert_matches!(result, Err(TokenError::Malformed));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let config = test_config();
        let result = decode_token("not.a.token", &config);
        assert_matches!(result, Err(TokenError::Malformed));
    }

    #[test]
    fn test_sid_claim_round_trips() {
        let config = test_config();
        let mut claims = test_claims(TokenType::Access, 900);
        claims.sid = Some("0e4faf01-1111-2222-3333-444455556666".to_string());

        let token = encode_token(&claims, &config).expect("encoding should succeed");
        let decoded = decode_token(&token, &config).expect("decoding should succeed");

        assert_eq!(decoded.sid, claims.sid);
    }
}
