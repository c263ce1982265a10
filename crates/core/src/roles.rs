//! Well-known role name constants.
//!
//! These must match the `role` column values seeded by the users migration.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_USER: &str = "user";
