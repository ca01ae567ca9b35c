//! # Folio API Server
//!
//! Actix-web HTTP server for the blog: public post feed, admin
//! authentication, and post management over JSON files.

use actix_web::{App, HttpServer, web};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    let state = AppState::new(&config)
        .await
        .context("failed to initialize application state")?;

    if let Some(admin) = &config.bootstrap_admin {
        state
            .bootstrap_admin(admin)
            .await
            .context("failed to bootstrap admin account")?;
    }

    tracing::info!(
        host = %config.host,
        port = config.port,
        "Starting Folio API server"
    );

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))
    .with_context(|| format!("cannot bind {}:{}", config.host, config.port))?
    .run()
    .await?;

    Ok(())
}
