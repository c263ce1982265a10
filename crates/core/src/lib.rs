//! Domain primitives shared by the persistence and API layers.
//!
//! This crate has no internal dependencies so it can be used by the
//! repository layer, the HTTP server, and any future worker or CLI tooling.

pub mod api_keys;
pub mod error;
pub mod hashing;
pub mod roles;
pub mod types;
