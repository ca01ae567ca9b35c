//! JSON-file post repository.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use folio_core::domain::{Post, PostPatch};
use folio_core::error::RepoError;
use folio_core::ports::PostRepository;

use super::document::{JsonDocument, Outcome};

/// On-disk shape: `{ "posts": [...] }`.
///
/// Older files hold a bare array; those are accepted on read and
/// rewritten in the wrapped form on the next mutation.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(from = "PostsFile")]
pub struct PostsDocument {
    pub posts: Vec<Post>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PostsFile {
    Wrapped {
        #[serde(default)]
        posts: Vec<Post>,
    },
    Bare(Vec<Post>),
}

impl From<PostsFile> for PostsDocument {
    fn from(file: PostsFile) -> Self {
        match file {
            PostsFile::Wrapped { posts } | PostsFile::Bare(posts) => Self { posts },
        }
    }
}

/// Post repository backed by one JSON document.
pub struct JsonPostRepository {
    doc: JsonDocument<PostsDocument>,
}

impl JsonPostRepository {
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
impl PostRepository for JsonPostRepository {
    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.doc.read().await?.posts)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let doc = self.doc.read().await?;
        Ok(doc.posts.into_iter().find(|p| p.slug == slug))
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        self.doc
            .mutate(|doc| {
                if doc.posts.iter().any(|p| p.slug == post.slug) {
                    return Err(RepoError::Constraint(format!(
                        "a post with slug '{}' already exists",
                        post.slug
                    )));
                }
                doc.posts.push(post.clone());
                Ok(Outcome::Write(()))
            })
            .await?;

        tracing::info!(slug = %post.slug, "Post created");
        Ok(post)
    }

    async fn update(&self, slug: &str, patch: PostPatch) -> Result<Option<Post>, RepoError> {
        let updated = self
            .doc
            .mutate(|doc| {
                let Some(post) = doc.posts.iter_mut().find(|p| p.slug == slug) else {
                    return Ok(Outcome::Skip(None));
                };
                post.apply(patch, Utc::now());
                Ok(Outcome::Write(Some(post.clone())))
            })
            .await?;

        if updated.is_some() {
            tracing::info!(slug, "Post updated");
        }
        Ok(updated)
    }

    async fn delete(&self, slug: &str) -> Result<bool, RepoError> {
        let removed = self
            .doc
            .mutate(|doc| {
                let before = doc.posts.len();
                doc.posts.retain(|p| p.slug != slug);
                Ok(if doc.posts.len() == before {
                    Outcome::Skip(false)
                } else {
                    Outcome::Write(true)
                })
            })
            .await?;

        if removed {
            tracing::info!(slug, "Post deleted");
        }
        Ok(removed)
    }

    async fn record_view(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        self.doc
            .mutate(|doc| {
                let Some(post) = doc.posts.iter_mut().find(|p| p.slug == slug) else {
                    return Ok(Outcome::Skip(None));
                };
                post.record_view(Utc::now());
                tracing::debug!(slug, views = post.views, "Post viewed");
                Ok(Outcome::Write(Some(post.clone())))
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use folio_core::domain::NewPost;
    use tempfile::TempDir;

    fn repo(dir: &TempDir) -> JsonPostRepository {
        JsonPostRepository::new(dir.path().join("posts.json"))
    }

    fn new_post(title: &str) -> Post {
        Post::new(
            NewPost {
                title: title.to_string(),
                description: "desc".to_string(),
                content: format!("content of {title}"),
                tags: vec!["rust".to_string()],
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        let post = repo.insert(new_post("First Post")).await.unwrap();

        let found = repo.find_by_slug("first-post").await.unwrap().unwrap();
        assert_eq!(found.slug, post.slug);
        assert_eq!(found.title, "First Post");
        assert_eq!(found.content, "content of First Post");
        assert_eq!(found.views, 0);
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_constraint_error() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        repo.insert(new_post("Same Title")).await.unwrap();

        let err = repo.insert(new_post("same title!")).await.unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_none() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        repo.insert(new_post("Doomed")).await.unwrap();

        assert!(repo.delete("doomed").await.unwrap());
        assert!(repo.find_by_slug("doomed").await.unwrap().is_none());
        assert!(!repo.delete("doomed").await.unwrap());
    }

    #[tokio::test]
    async fn test_update_title_only() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        let original = repo.insert(new_post("Before")).await.unwrap();

        let updated = repo
            .update(
                "before",
                PostPatch {
                    title: Some("X".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "X");
        assert!(updated.updated_at >= original.updated_at);
        assert_eq!(
            Post {
                title: original.title.clone(),
                updated_at: original.updated_at,
                ..updated.clone()
            },
            original
        );
        // slug is immutable
        assert!(repo.find_by_slug("x").await.unwrap().is_none());
        assert_eq!(repo.find_by_slug("before").await.unwrap().unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_unknown_slug() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        let result = repo.update("ghost", PostPatch::default()).await.unwrap();
        assert!(result.is_none());
        assert!(!dir.path().join("posts.json").exists());
    }

    #[tokio::test]
    async fn test_record_view_persists() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        repo.insert(new_post("Popular")).await.unwrap();

        repo.record_view("popular").await.unwrap();
        let viewed = repo.record_view("popular").await.unwrap().unwrap();
        assert_eq!(viewed.views, 2);
        // created today: 2 views / 1 day * 1.5
        assert!((viewed.trend_score - 3.0).abs() < 1e-9);

        let stored = repo.find_by_slug("popular").await.unwrap().unwrap();
        assert_eq!(stored.views, 2);
        assert!(repo.record_view("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_creates_same_slug() {
        let dir = TempDir::new().unwrap();
        let repo = Arc::new(repo(&dir));

        let (a, b) = tokio::join!(
            repo.insert(new_post("Race")),
            repo.insert(new_post("Race"))
        );

        let oks = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
        assert_eq!(oks, 1);
        assert!(matches!(
            a.err().or(b.err()),
            Some(RepoError::Constraint(_))
        ));
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reads_legacy_bare_array_and_rewrites_wrapped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("posts.json");
        std::fs::write(
            &path,
            r#"[{
                "slug": "legacy",
                "title": "Legacy",
                "content": "old",
                "createdAt": "2024-01-01T00:00:00.000Z",
                "updatedAt": "2024-01-01T00:00:00.000Z"
            }]"#,
        )
        .unwrap();
        let repo = JsonPostRepository::new(&path);

        assert_eq!(repo.list().await.unwrap().len(), 1);
        repo.insert(new_post("Fresh")).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["posts"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_init_writes_empty_wrapped_document() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        repo.init().await.unwrap();

        let raw: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("posts.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(raw, serde_json::json!({ "posts": [] }));
    }
}
