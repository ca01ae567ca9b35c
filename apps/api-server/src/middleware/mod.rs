//! Request extractors and error mapping.

pub mod auth;
pub mod error;

pub use auth::{AdminIdentity, OptionalIdentity, TOKEN_COOKIE};
pub use error::{AppError, AppResult};
