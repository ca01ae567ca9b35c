//! JSON-file admin repository.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use folio_core::domain::{AdminAccount, AdminProfile, ProfilePatch, Role};
use folio_core::error::RepoError;
use folio_core::ports::AdminRepository;

use super::document::{JsonDocument, Outcome};

/// On-disk shape: `{ "admins": [...] }`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AdminsDocument {
    #[serde(default)]
    pub admins: Vec<AdminAccount>,
}

/// Mask an email for logging, keeping the first character and the domain.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) if local.chars().count() > 1 => format!("{first}***@{domain}"),
            _ => format!("***@{domain}"),
        },
        None => "***".to_string(),
    }
}

/// Admin repository backed by one JSON document.
pub struct JsonAdminRepository {
    doc: JsonDocument<AdminsDocument>,
}

impl JsonAdminRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            doc: JsonDocument::new(path),
        }
    }

    /// Create the data file if it does not exist yet.
    pub async fn init(&self) -> Result<(), RepoError> {
        self.doc.init().await
    }
}

#[async_trait]
impl AdminRepository for JsonAdminRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminAccount>, RepoError> {
        tracing::debug!(admin_email = %mask_email(email), "Finding admin by email");

        let doc = self.doc.read().await?;
        Ok(doc.admins.into_iter().find(|a| a.email() == email))
    }

    async fn has_credentials(&self) -> Result<bool, RepoError> {
        let doc = self.doc.read().await?;
        Ok(doc.admins.iter().any(AdminAccount::has_credentials))
    }

    async fn create_account(
        &self,
        email: &str,
        password_hash: String,
    ) -> Result<AdminAccount, RepoError> {
        let account = self
            .doc
            .mutate(|doc| match doc.admins.iter().position(|a| a.email() == email) {
                Some(index) if doc.admins[index].has_credentials() => Err(RepoError::Constraint(
                    "an admin account with this email already exists".to_string(),
                )),
                Some(index) => {
                    let existing = &mut doc.admins[index];
                    existing.password_hash = Some(password_hash);
                    existing.role = Role::Admin;
                    Ok(Outcome::Write(existing.clone()))
                }
                None => {
                    let account = AdminAccount::new(email, password_hash);
                    doc.admins.push(account.clone());
                    Ok(Outcome::Write(account))
                }
            })
            .await?;

        tracing::info!(admin_email = %mask_email(email), "Admin account created");
        Ok(account)
    }

    async fn upsert_profile(
        &self,
        email: &str,
        patch: ProfilePatch,
    ) -> Result<AdminProfile, RepoError> {
        self.doc
            .mutate(|doc| {
                let index = match doc.admins.iter().position(|a| a.email() == email) {
                    Some(index) => index,
                    None => {
                        tracing::info!(admin_email = %mask_email(email), "Creating admin profile");
                        doc.admins.push(AdminAccount {
                            profile: AdminProfile::default_for(email),
                            role: Role::Admin,
                            password_hash: None,
                        });
                        doc.admins.len() - 1
                    }
                };

                let profile = &mut doc.admins[index].profile;
                profile.apply(patch);
                Ok(Outcome::Write(profile.clone()))
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn repo(dir: &TempDir) -> JsonAdminRepository {
        JsonAdminRepository::new(dir.path().join("admins.json"))
    }

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("alice@example.com"), "a***@example.com");
        assert_eq!(mask_email("a@example.com"), "***@example.com");
        assert_eq!(mask_email("not-an-email"), "***");
    }

    #[tokio::test]
    async fn test_create_account_and_find() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        assert!(!repo.has_credentials().await.unwrap());

        repo.create_account("me@example.com", "hash".into())
            .await
            .unwrap();

        let account = repo.find_by_email("me@example.com").await.unwrap().unwrap();
        assert_eq!(account.password_hash.as_deref(), Some("hash"));
        assert_eq!(account.profile.nickname, "Admin");
        assert!(repo.has_credentials().await.unwrap());
        assert!(repo.find_by_email("other@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_account_twice_conflicts() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        repo.create_account("me@example.com", "hash".into())
            .await
            .unwrap();

        let err = repo
            .create_account("me@example.com", "other".into())
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_profile_created_lazily_then_merged() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);

        let profile = repo
            .upsert_profile(
                "me@example.com",
                ProfilePatch {
                    nickname: Some("Ada".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(profile.nickname, "Ada");
        assert_eq!(profile.email, "me@example.com");

        let profile = repo
            .upsert_profile(
                "me@example.com",
                ProfilePatch {
                    bio: Some("Writes Rust".into()),
                    social_links: Some(BTreeMap::from([(
                        "github".to_string(),
                        "https://github.com/ada".to_string(),
                    )])),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(profile.nickname, "Ada");
        assert_eq!(profile.bio.as_deref(), Some("Writes Rust"));
        assert_eq!(profile.social_links.len(), 1);

        let raw: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("admins.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(raw["admins"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_credentials_attach_to_existing_profile() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        repo.upsert_profile(
            "me@example.com",
            ProfilePatch {
                nickname: Some("Ada".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let account = repo
            .create_account("me@example.com", "hash".into())
            .await
            .unwrap();
        assert_eq!(account.profile.nickname, "Ada");
        assert!(account.has_credentials());
    }
}
