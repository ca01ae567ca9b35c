//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use folio_infra::JwtConfig;

/// Admin account created at startup when it has no password yet.
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding `posts.json` and `admins.json`.
    pub data_dir: PathBuf,
    /// Mark the auth cookie `Secure` (HTTPS only).
    pub cookie_secure: bool,
    pub bootstrap_admin: Option<BootstrapAdmin>,
    pub jwt: JwtConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let bootstrap_admin = match (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) if !email.trim().is_empty() && !password.is_empty() => {
                Some(BootstrapAdmin { email, password })
            }
            _ => None,
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            cookie_secure: env::var("COOKIE_SECURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            bootstrap_admin,
            jwt: JwtConfig::from_env(),
        }
    }

    pub fn posts_path(&self) -> PathBuf {
        self.data_dir.join("posts.json")
    }

    pub fn admins_path(&self) -> PathBuf {
        self.data_dir.join("admins.json")
    }
}
