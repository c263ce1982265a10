//! Authentication middleware extractors.
//!
//! - [`auth::BearerToken`] -- Extracts the raw bearer credential (header or cookie).
//! - [`auth::CurrentUser`] -- Resolves the credential to an active user row.
//! - [`api_key::ApiKeyUser`] -- Resolves an `X-API-Key` header to its owner.

pub mod api_key;
pub mod auth;
