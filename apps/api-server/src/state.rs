//! Application state - shared across all handlers.

use std::sync::Arc;

use anyhow::Context;
use folio_core::ports::{AdminRepository, PasswordService, PostRepository, TokenService};
use folio_infra::{
    Argon2PasswordService, JsonAdminRepository, JsonPostRepository, JwtTokenService, mask_email,
};

use crate::config::{AppConfig, BootstrapAdmin};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub admins: Arc<dyn AdminRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub cookie_secure: bool,
}

impl AppState {
    /// Build the application state, creating empty data files if needed.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let posts = JsonPostRepository::new(config.posts_path());
        posts
            .init()
            .await
            .with_context(|| format!("cannot initialize {}", config.posts_path().display()))?;

        let admins = JsonAdminRepository::new(config.admins_path());
        admins
            .init()
            .await
            .with_context(|| format!("cannot initialize {}", config.admins_path().display()))?;

        tracing::info!(data_dir = %config.data_dir.display(), "Application state initialized");

        Ok(Self {
            posts: Arc::new(posts),
            admins: Arc::new(admins),
            tokens: Arc::new(JwtTokenService::new(config.jwt.clone())),
            passwords: Arc::new(Argon2PasswordService::new()),
            cookie_secure: config.cookie_secure,
        })
    }

    /// Give the configured admin a password unless it already has one.
    pub async fn bootstrap_admin(&self, admin: &BootstrapAdmin) -> anyhow::Result<()> {
        let email = admin.email.trim().to_lowercase();
        let existing = self.admins.find_by_email(&email).await?;
        if existing.is_some_and(|a| a.has_credentials()) {
            tracing::debug!(admin_email = %mask_email(&email), "Bootstrap admin already exists");
            return Ok(());
        }

        let hash = self.passwords.hash(&admin.password)?;
        self.admins.create_account(&email, hash).await?;
        tracing::info!(admin_email = %mask_email(&email), "Bootstrap admin account created");
        Ok(())
    }
}
