//! Argon2id password hashing for admin credentials.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use folio_core::ports::{AuthError, PasswordService};

/// Argon2id password service producing PHC strings.
///
/// Verification reads the cost parameters from the stored hash, so hashes
/// written with other parameters still verify.
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
}

impl Argon2PasswordService {
    /// Argon2id with the library's recommended cost.
    pub fn new() -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default()),
        }
    }

    /// Argon2id with explicit memory (KiB), iteration and lane costs.
    pub fn with_cost(memory_kib: u32, iterations: u32, lanes: u32) -> Result<Self, AuthError> {
        let params = Params::new(memory_kib, iterations, lanes, None)
            .map_err(|e| AuthError::HashingError(e.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl Default for Argon2PasswordService {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        if password.is_empty() {
            return Err(AuthError::HashingError("empty password".to_string()));
        }
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::HashingError(e.to_string()))
    }

    /// `Ok(false)` on a mismatch; an unreadable stored hash is an error.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let stored =
            PasswordHash::new(hash).map_err(|e| AuthError::HashingError(e.to_string()))?;

        match self.argon2.verify_password(password.as_bytes(), &stored) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::HashingError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> Argon2PasswordService {
        Argon2PasswordService::with_cost(Params::MIN_M_COST, 1, 1).unwrap()
    }

    #[test]
    fn test_hash_is_salted_argon2id_phc_string() {
        let service = cheap();
        let a = service.hash("correct horse").unwrap();
        let b = service.hash("correct horse").unwrap();

        assert!(a.starts_with("$argon2id$"));
        assert_ne!(a, b);
        assert!(service.verify("correct horse", &a).unwrap());
        assert!(service.verify("correct horse", &b).unwrap());
        assert!(!service.verify("wrong horse", &a).unwrap());
    }

    #[test]
    fn test_verifies_hashes_written_with_other_cost() {
        let stored = cheap().hash("pw-from-last-year").unwrap();
        assert!(
            Argon2PasswordService::new()
                .verify("pw-from-last-year", &stored)
                .unwrap()
        );
    }

    #[test]
    fn test_garbage_hash_and_empty_password_are_errors() {
        let service = cheap();
        assert!(matches!(
            service.verify("pw", "not-a-phc-string"),
            Err(AuthError::HashingError(_))
        ));
        assert!(matches!(service.hash(""), Err(AuthError::HashingError(_))));
    }

    #[test]
    fn test_invalid_cost_is_rejected() {
        assert!(Argon2PasswordService::with_cost(0, 0, 0).is_err());
    }
}
