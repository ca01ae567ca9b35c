//! Admin profile handlers. The profile is always the caller's own.

use actix_web::{HttpResponse, web};

use folio_core::domain::{AdminProfile, ProfilePatch};
use folio_shared::dto::UpdateProfileRequest;

use crate::middleware::{AdminIdentity, AppResult};
use crate::state::AppState;

/// GET /api/admin/profile
pub async fn get_profile(
    admin: AdminIdentity,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let profile = state
        .admins
        .find_by_email(&admin.email)
        .await?
        .map(|account| account.profile)
        .unwrap_or_else(|| AdminProfile::default_for(&admin.email));

    Ok(HttpResponse::Ok().json(profile))
}

/// PUT /api/admin/profile
pub async fn update_profile(
    admin: AdminIdentity,
    state: web::Data<AppState>,
    body: web::Json<UpdateProfileRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let patch = ProfilePatch {
        nickname: req.nickname,
        avatar: req.avatar,
        bio: req.bio,
        social_links: req.social_links,
    };
    patch.validate()?;

    let profile = state.admins.upsert_profile(&admin.email, patch).await?;
    Ok(HttpResponse::Ok().json(profile))
}
