//! HTTP handlers and route configuration.

mod auth;
mod health;
mod posts;
mod profile;
mod tags;

use actix_web::web;

use crate::middleware::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .route("/tags", web::get().to(tags::list_tags))
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_posts))
                    .route("", web::post().to(posts::create_post))
                    .route("/{slug}", web::get().to(posts::get_post))
                    .route("/{slug}", web::put().to(posts::update_post))
                    .route("/{slug}", web::delete().to(posts::delete_post)),
            )
            // Admin routes
            .service(
                web::scope("/admin")
                    .route("/login", web::post().to(auth::login))
                    .route("/logout", web::post().to(auth::logout))
                    .route("/verify", web::get().to(auth::verify))
                    .route("/register", web::post().to(auth::register))
                    .route("/profile", web::get().to(profile::get_profile))
                    .route("/profile", web::put().to(profile::update_profile))
                    .route("/posts", web::get().to(posts::admin_list_posts))
                    .route("/posts/{slug}", web::get().to(posts::admin_get_post)),
            ),
    );
}
