//! Authentication and authorization ports.

use crate::domain::Role;

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub email: String,
    pub role: Role,
    pub exp: i64,
}

/// How long an issued token stays valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenLifetime {
    /// Regular login.
    Session,
    /// "Remember me" login.
    Extended,
}

/// Token service trait for signed access tokens.
pub trait TokenService: Send + Sync {
    /// Issue a token for an identity.
    fn generate_token(
        &self,
        email: &str,
        role: Role,
        lifetime: TokenLifetime,
    ) -> Result<String, AuthError>;

    /// Verify the signature and expiry of a token and decode it.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Lifetime in seconds, used for cookie max-age.
    fn lifetime_seconds(&self, lifetime: TokenLifetime) -> i64;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
///
/// Callers outside the auth gate see all of these as "unauthorized";
/// the variants exist for logging.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization")]
    MissingAuth,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Hashing error: {0}")]
    HashingError(String),
}
