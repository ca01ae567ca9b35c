use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::text::{
    normalize_cover_image, normalize_tags, read_time_minutes, same_tag, slugify,
};
use super::trend::trend_score;
use crate::error::DomainError;

/// Author name used when a post is created without one.
pub const DEFAULT_AUTHOR_NAME: &str = "Admin";

/// Avatar used when an author has none.
pub const DEFAULT_AUTHOR_AVATAR: &str = "https://github.com/identicons/default.png";

/// Post author, embedded in every post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl Author {
    /// Fill in the default name and avatar where they are missing or blank.
    pub fn normalized(self) -> Self {
        let name = match self.name.trim() {
            "" => DEFAULT_AUTHOR_NAME.to_string(),
            name => name.to_string(),
        };
        let avatar = self
            .avatar
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_AUTHOR_AVATAR.to_string());

        Self {
            name,
            avatar: Some(avatar),
            bio: self.bio.filter(|b| !b.trim().is_empty()),
        }
    }
}

impl Default for Author {
    fn default() -> Self {
        Self {
            name: DEFAULT_AUTHOR_NAME.to_string(),
            avatar: Some(DEFAULT_AUTHOR_AVATAR.to_string()),
            bio: None,
        }
    }
}

/// Post entity - a single blog post, keyed by its slug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub content: String,
    #[serde(
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub cover_image: Option<String>,
    #[serde(default, deserialize_with = "normalized_author")]
    pub author: Author,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub trend_score: f64,
    #[serde(default)]
    pub read_time: u32,
}

/// Input for creating a post. The slug is derived from the title.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub description: String,
    pub content: String,
    pub cover_image: Option<String>,
    pub author: Option<Author>,
    pub tags: Vec<String>,
}

/// Partial update of a post. `None` leaves a field untouched.
///
/// Slug, views, creation time and trend score are not patchable.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    /// An empty string removes the cover image.
    pub cover_image: Option<String>,
    pub author: Option<Author>,
    pub tags: Option<Vec<String>>,
}

impl PostPatch {
    /// Reject patches that would blank out required fields.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(DomainError::validation("title must not be empty"));
        }
        if self.content.as_deref().is_some_and(|c| c.trim().is_empty()) {
            return Err(DomainError::validation("content must not be empty"));
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.content.is_none()
            && self.cover_image.is_none()
            && self.author.is_none()
            && self.tags.is_none()
    }
}

impl Post {
    /// Create a new post with a fresh slug, zero views and both timestamps set to `now`.
    pub fn new(draft: NewPost, now: DateTime<Utc>) -> Result<Self, DomainError> {
        let title = draft.title.trim();
        if title.is_empty() || draft.content.trim().is_empty() {
            return Err(DomainError::validation("title and content are required"));
        }

        let slug = slugify(title);
        if slug.is_empty() {
            return Err(DomainError::validation(
                "title must contain at least one letter or digit",
            ));
        }

        Ok(Self {
            slug,
            title: title.to_string(),
            description: draft.description.trim().to_string(),
            read_time: read_time_minutes(&draft.content),
            content: draft.content,
            cover_image: draft
                .cover_image
                .as_deref()
                .and_then(normalize_cover_image),
            author: draft.author.map(Author::normalized).unwrap_or_default(),
            tags: normalize_tags(&draft.tags),
            created_at: now,
            updated_at: now,
            views: 0,
            trend_score: 0.0,
        })
    }

    /// Merge a validated patch into this post and stamp `updated_at`.
    pub fn apply(&mut self, patch: PostPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = description.trim().to_string();
        }
        if let Some(content) = patch.content {
            self.read_time = read_time_minutes(&content);
            self.content = content;
        }
        if let Some(cover_image) = patch.cover_image {
            self.cover_image = normalize_cover_image(&cover_image);
        }
        if let Some(author) = patch.author {
            self.author = author.normalized();
        }
        if let Some(tags) = patch.tags {
            self.tags = normalize_tags(&tags);
        }
        self.updated_at = now;
    }

    /// Count one view and recompute the trend score with the new total.
    pub fn record_view(&mut self, now: DateTime<Utc>) {
        self.views = self.views.saturating_add(1);
        self.trend_score = trend_score(self.views, self.created_at, now);
    }

    /// Recompute derived fields (trend score, reading time) against `now`.
    pub fn refresh_derived(&mut self, now: DateTime<Utc>) {
        self.trend_score = trend_score(self.views, self.created_at, now);
        self.read_time = read_time_minutes(&self.content);
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| same_tag(t, tag))
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

fn normalized_author<'de, D>(deserializer: D) -> Result<Author, D::Error>
where
    D: Deserializer<'de>,
{
    Author::deserialize(deserializer).map(Author::normalized)
}
