//! Admin authentication extractors.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::{Ready, ready};

use folio_core::domain::Role;
use folio_core::ports::{AuthError, TokenClaims};
use folio_shared::ErrorResponse;

use crate::state::AppState;

/// Name of the cookie carrying the access token.
pub const TOKEN_COOKIE: &str = "token";

/// Authenticated admin identity extractor.
///
/// Use this in handlers to require an admin session:
/// ```ignore
/// async fn protected_route(admin: AdminIdentity) -> impl Responder {
///     format!("Hello, {}!", admin.email)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AdminIdentity {
    pub email: String,
    pub role: Role,
}

impl From<TokenClaims> for AdminIdentity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            email: claims.email,
            role: claims.role,
        }
    }
}

/// Error type for authentication failures.
///
/// Every reason maps to the same 401 body; the reason is only logged.
#[derive(Debug)]
pub struct AuthenticationError(pub AuthError);

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl actix_web::ResponseError for AuthenticationError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        actix_web::http::StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        tracing::debug!(reason = %self.0, "Admin authentication rejected");
        actix_web::HttpResponse::Unauthorized().json(ErrorResponse::unauthorized())
    }
}

/// Bearer header first, then the token cookie.
fn extract_token(req: &HttpRequest) -> Result<String, AuthError> {
    if let Some(value) = req.headers().get(header::AUTHORIZATION) {
        let value = value
            .to_str()
            .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;
        return match value.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            _ => Err(AuthError::InvalidToken("Expected Bearer token".to_string())),
        };
    }

    match req.cookie(TOKEN_COOKIE) {
        Some(cookie) if !cookie.value().is_empty() => Ok(cookie.value().to_string()),
        _ => Err(AuthError::MissingAuth),
    }
}

fn authenticate(req: &HttpRequest) -> Result<AdminIdentity, AuthError> {
    let Some(state) = req.app_data::<web::Data<AppState>>() else {
        tracing::error!("AppState not found in app data");
        return Err(AuthError::InvalidToken(
            "Server configuration error".to_string(),
        ));
    };

    let token = extract_token(req)?;
    let claims = state.tokens.validate_token(&token)?;
    if claims.role != Role::Admin {
        return Err(AuthError::InsufficientPermissions);
    }
    Ok(AdminIdentity::from(claims))
}

impl FromRequest for AdminIdentity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).map_err(AuthenticationError))
    }
}

/// Optional identity extractor - doesn't fail if not authenticated.
pub struct OptionalIdentity(pub Option<AdminIdentity>);

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(OptionalIdentity(authenticate(req).ok())))
    }
}
