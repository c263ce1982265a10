//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod api_key_repo;
pub mod refresh_token_repo;
pub mod session_repo;
pub mod user_repo;

pub use api_key_repo::ApiKeyRepo;
pub use refresh_token_repo::RefreshTokenRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
