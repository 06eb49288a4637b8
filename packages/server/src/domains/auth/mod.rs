//! Auth domain - password accounts and JWT access tokens
//!
//! Responsibilities:
//! - Argon2id password hashing
//! - Registration and login
//! - Access token creation and verification

pub mod actions;
pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtService};
pub use password::{hash_password, verify_password};
