//! Authentication and authorization primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation and validation.
//! - [`seed`] -- the admin account ensured at startup.

pub mod jwt;
pub mod password;
pub mod seed;
