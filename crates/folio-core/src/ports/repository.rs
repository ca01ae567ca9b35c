use async_trait::async_trait;

use crate::domain::{AdminAccount, AdminProfile, Post, PostPatch, ProfilePatch};
use crate::error::RepoError;

/// Post storage, keyed by slug.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// All posts in storage order.
    async fn list(&self) -> Result<Vec<Post>, RepoError>;

    /// Find a post without side effects.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// Insert a new post. Fails with `RepoError::Constraint` if the slug is taken.
    async fn insert(&self, post: Post) -> Result<Post, RepoError>;

    /// Merge a patch into an existing post, stamping `updated_at`.
    /// Returns `None` if the slug is unknown.
    async fn update(&self, slug: &str, patch: PostPatch) -> Result<Option<Post>, RepoError>;

    /// Remove a post. Returns `false` if the slug is unknown.
    async fn delete(&self, slug: &str) -> Result<bool, RepoError>;

    /// Count a view, recompute the trend score and persist.
    /// Returns `None` if the slug is unknown.
    async fn record_view(&self, slug: &str) -> Result<Option<Post>, RepoError>;
}

/// Admin account and profile storage, keyed by email.
#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminAccount>, RepoError>;

    /// Whether any stored admin can log in.
    async fn has_credentials(&self) -> Result<bool, RepoError>;

    /// Attach credentials to `email`, creating the record if needed.
    /// Fails with `RepoError::Constraint` if that admin already has a password.
    async fn create_account(
        &self,
        email: &str,
        password_hash: String,
    ) -> Result<AdminAccount, RepoError>;

    /// Merge a profile patch, creating the record lazily.
    async fn upsert_profile(
        &self,
        email: &str,
        patch: ProfilePatch,
    ) -> Result<AdminProfile, RepoError>;
}
