//! HTTP handlers, grouped by resource.

pub mod api_keys;
pub mod auth;
pub mod external;
