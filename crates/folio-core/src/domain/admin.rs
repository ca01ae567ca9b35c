use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

pub const DEFAULT_NICKNAME: &str = "Admin";
pub const DEFAULT_PROFILE_AVATAR: &str = "/images/default-avatar.jpg";

/// Roles recognized by the auth gate. There is exactly one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[default]
    #[serde(rename = "ADMIN")]
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Public profile of an admin, keyed by email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub email: String,
    pub nickname: String,
    pub avatar: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Platform name -> URL.
    #[serde(default)]
    pub social_links: BTreeMap<String, String>,
}

impl AdminProfile {
    /// Profile shown for an admin who has never saved one.
    pub fn default_for(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            nickname: DEFAULT_NICKNAME.to_string(),
            avatar: DEFAULT_PROFILE_AVATAR.to_string(),
            bio: Some(String::new()),
            social_links: BTreeMap::new(),
        }
    }

    /// Merge a validated patch. The email never changes.
    pub fn apply(&mut self, patch: ProfilePatch) {
        if let Some(nickname) = patch.nickname {
            self.nickname = nickname.trim().to_string();
        }
        if let Some(avatar) = patch.avatar {
            self.avatar = match avatar.trim() {
                "" => DEFAULT_PROFILE_AVATAR.to_string(),
                avatar => avatar.to_string(),
            };
        }
        if let Some(bio) = patch.bio {
            self.bio = Some(bio);
        }
        if let Some(links) = patch.social_links {
            self.social_links = links
                .into_iter()
                .map(|(platform, url)| (platform.trim().to_lowercase(), url.trim().to_string()))
                .filter(|(platform, url)| !platform.is_empty() && !url.is_empty())
                .collect();
        }
    }
}

/// Partial profile update. `None` leaves a field untouched; an empty link
/// value removes that platform.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub nickname: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub social_links: Option<BTreeMap<String, String>>,
}

impl ProfilePatch {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.nickname.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(DomainError::validation("nickname must not be empty"));
        }
        if let Some(links) = &self.social_links {
            for (platform, url) in links {
                let url = url.trim();
                if !url.is_empty() && !(url.starts_with("http://") || url.starts_with("https://"))
                {
                    return Err(DomainError::Validation(format!(
                        "social link for {platform} must be an http(s) URL"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Stored admin record: the profile plus login credentials.
///
/// Records written before credentials existed have no password hash;
/// such admins cannot log in until one is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAccount {
    #[serde(flatten)]
    pub profile: AdminProfile,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
}

impl AdminAccount {
    pub fn new(email: impl Into<String>, password_hash: String) -> Self {
        Self {
            profile: AdminProfile::default_for(email),
            role: Role::Admin,
            password_hash: Some(password_hash),
        }
    }

    pub fn email(&self) -> &str {
        &self.profile.email
    }

    pub fn has_credentials(&self) -> bool {
        self.password_hash.is_some()
    }
}
