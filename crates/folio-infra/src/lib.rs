//! # Folio Infrastructure
//!
//! Concrete implementations of the ports defined in `folio-core`:
//! JSON-file storage for posts and admins, JWT tokens and Argon2 passwords.
//!
//! ## Feature Flags
//!
//! - `auth` (default) - JWT + Argon2 authentication

pub mod storage;

#[cfg(feature = "auth")]
pub mod auth;

pub use storage::{JsonAdminRepository, JsonPostRepository, mask_email};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
