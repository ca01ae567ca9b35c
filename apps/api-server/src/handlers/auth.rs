//! Admin authentication handlers.

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{HttpResponse, web};

use folio_core::domain::ProfilePatch;
use folio_core::ports::TokenLifetime;
use folio_infra::mask_email;
use folio_shared::dto::{
    LoginRequest, LoginResponse, MessageResponse, RegisterAdminRequest, SessionResponse,
    SessionUser,
};

use crate::middleware::{AdminIdentity, AppError, AppResult, OptionalIdentity, TOKEN_COOKIE};
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 8;

fn token_cookie(token: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build(TOKEN_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::seconds(max_age_secs))
        .finish()
}

/// POST /api/admin/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let email = req.email.trim().to_lowercase();

    let account = state.admins.find_by_email(&email).await?;
    let Some((hash, role)) = account.and_then(|a| a.password_hash.map(|h| (h, a.role))) else {
        tracing::info!(admin_email = %mask_email(&email), "Login failed: unknown admin");
        return Err(AppError::InvalidCredentials);
    };

    // argon2 verification blocks
    let passwords = state.passwords.clone();
    let password = req.password;
    let valid = web::block(move || passwords.verify(&password, &hash))
        .await?
        .unwrap_or_else(|e| {
            tracing::error!(
                admin_email = %mask_email(&email),
                error = %e,
                "Stored password hash is unreadable"
            );
            false
        });
    if !valid {
        tracing::info!(admin_email = %mask_email(&email), "Login failed: wrong password");
        return Err(AppError::InvalidCredentials);
    }

    let lifetime = if req.remember_me {
        TokenLifetime::Extended
    } else {
        TokenLifetime::Session
    };
    let token = state.tokens.generate_token(&email, role, lifetime)?;
    let expires_in = state.tokens.lifetime_seconds(lifetime);

    tracing::info!(admin_email = %mask_email(&email), remember_me = req.remember_me, "Admin logged in");

    Ok(HttpResponse::Ok()
        .cookie(token_cookie(token.clone(), expires_in, state.cookie_secure))
        .json(LoginResponse {
            success: true,
            message: "Login successful".to_string(),
            access_token: token,
            token_type: "Bearer".to_string(),
            expires_in: expires_in.max(0) as u64,
        }))
}

/// POST /api/admin/logout
pub async fn logout(state: web::Data<AppState>) -> HttpResponse {
    let mut cookie = token_cookie(String::new(), 0, state.cookie_secure);
    cookie.make_removal();

    HttpResponse::Ok()
        .cookie(cookie)
        .json(MessageResponse::ok("Logged out"))
}

/// GET /api/admin/verify
pub async fn verify(admin: AdminIdentity) -> HttpResponse {
    HttpResponse::Ok().json(SessionResponse {
        authenticated: true,
        user: SessionUser {
            email: admin.email,
            role: admin.role.as_str().to_string(),
        },
    })
}

/// POST /api/admin/register
///
/// Open while no admin has a password yet; afterwards only admins may add admins.
pub async fn register(
    OptionalIdentity(admin): OptionalIdentity,
    state: web::Data<AppState>,
    body: web::Json<RegisterAdminRequest>,
) -> AppResult<HttpResponse> {
    if admin.is_none() && state.admins.has_credentials().await? {
        return Err(AppError::Unauthorized);
    }

    let req = body.into_inner();
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let patch = req.nickname.map(|nickname| ProfilePatch {
        nickname: Some(nickname),
        ..Default::default()
    });
    if let Some(patch) = &patch {
        patch.validate()?;
    }

    let passwords = state.passwords.clone();
    let password = req.password;
    let hash = web::block(move || passwords.hash(&password)).await??;

    let account = state.admins.create_account(&email, hash).await?;
    let profile = match patch {
        Some(patch) => state.admins.upsert_profile(&email, patch).await?,
        None => account.profile,
    };

    tracing::info!(
        admin_email = %mask_email(&email),
        by = %admin.map(|a| mask_email(&a.email)).unwrap_or_else(|| "first-run".to_string()),
        "Admin registered"
    );

    Ok(HttpResponse::Created().json(profile))
}
