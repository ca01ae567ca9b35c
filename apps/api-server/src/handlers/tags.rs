//! Tag listing.

use actix_web::{HttpResponse, web};

use folio_core::domain::tag_counts;

use crate::middleware::AppResult;
use crate::state::AppState;

/// GET /api/tags
pub async fn list_tags(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list().await?;
    Ok(HttpResponse::Ok().json(tag_counts(&posts)))
}
