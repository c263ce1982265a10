//! Authentication primitives and the auth service.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- signed claim-set encoding/decoding and token minting.
//! - [`service`] -- login, refresh rotation with reuse detection, logout,
//!   principal resolution. The sole owner of session-store mutations.

pub mod jwt;
pub mod password;
pub mod service;
