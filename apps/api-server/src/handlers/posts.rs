//! Post handlers - public feed and admin post management.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde::Deserialize;

use folio_core::DomainError;
use folio_core::domain::{Author, FeedQuery, NewPost, Page, Post, PostPatch, SortOrder};
use folio_shared::dto::{AuthorInput, CreatePostRequest, MessageResponse, UpdatePostRequest};

use crate::middleware::{AdminIdentity, AppResult};
use crate::state::AppState;

/// Query string of the public feed.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedParams {
    pub sort: Option<SortOrder>,
    /// Comma-separated tag list.
    pub tags: Option<String>,
    pub q: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl From<FeedParams> for FeedQuery {
    fn from(params: FeedParams) -> Self {
        let tags = params
            .tags
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            sort: params.sort.unwrap_or_default(),
            tags,
            search: params.q,
            page: params.page.map(|n| Page::new(n, params.per_page)),
        }
    }
}

fn author_from(input: AuthorInput) -> Author {
    Author {
        name: input.name,
        avatar: input.avatar,
        bio: input.bio,
    }
}

/// GET /api/posts
pub async fn list_posts(
    state: web::Data<AppState>,
    params: web::Query<FeedParams>,
) -> AppResult<HttpResponse> {
    let query = FeedQuery::from(params.into_inner());
    let posts = state.posts.list().await?;
    let feed = query.run(posts, Utc::now());

    Ok(HttpResponse::Ok()
        .insert_header(("X-Total-Count", feed.total.to_string()))
        .insert_header(("X-Total-Pages", feed.total_pages.to_string()))
        .json(feed.posts))
}

/// GET /api/posts/{slug} - counts a view.
pub async fn get_post(
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> AppResult<HttpResponse> {
    let slug = slug.into_inner();
    let post = state
        .posts
        .record_view(&slug)
        .await?
        .ok_or_else(|| DomainError::post_not_found(slug))?;

    Ok(HttpResponse::Ok().json(post))
}

/// POST /api/posts
pub async fn create_post(
    admin: AdminIdentity,
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let post = Post::new(
        NewPost {
            title: req.title,
            description: req.description,
            content: req.content,
            cover_image: req.cover_image,
            author: req.author.map(author_from),
            tags: req.tags,
        },
        Utc::now(),
    )?;

    let post = state.posts.insert(post).await?;
    tracing::info!(slug = %post.slug, admin = %admin.email, "Post published");

    Ok(HttpResponse::Created().json(post))
}

/// PUT /api/posts/{slug}
pub async fn update_post(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    slug: web::Path<String>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let slug = slug.into_inner();
    let req = body.into_inner();
    let patch = PostPatch {
        title: req.title,
        description: req.description,
        content: req.content,
        cover_image: req.cover_image,
        author: req.author.map(author_from),
        tags: req.tags,
    };
    patch.validate()?;

    let post = state
        .posts
        .update(&slug, patch)
        .await?
        .ok_or_else(|| DomainError::post_not_found(slug))?;

    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /api/posts/{slug}
pub async fn delete_post(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> AppResult<HttpResponse> {
    let slug = slug.into_inner();
    if !state.posts.delete(&slug).await? {
        return Err(DomainError::post_not_found(slug).into());
    }

    Ok(HttpResponse::Ok().json(MessageResponse::ok("Post deleted")))
}

/// GET /api/admin/posts - newest first, views untouched.
pub async fn admin_list_posts(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let posts = state.posts.list().await?;
    let feed = FeedQuery::default().run(posts, Utc::now());
    Ok(HttpResponse::Ok().json(feed.posts))
}

/// GET /api/admin/posts/{slug} - views untouched.
pub async fn admin_get_post(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> AppResult<HttpResponse> {
    let slug = slug.into_inner();
    let post = state
        .posts
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| DomainError::post_not_found(slug))?;

    Ok(HttpResponse::Ok().json(post))
}
