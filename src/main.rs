// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, database, and start HTTP server

mod config;
mod db;
mod errors;
mod handlers;
mod middleware;
mod models;
mod services;
mod views;

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use config::Config;
use db::{PgStore, PlaceStore};
use dotenv::dotenv;
use middleware::SessionIdentity;
use services::{CloudinaryUploader, ImageUploader};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load environment variables
    dotenv().ok();
    let config = Config::from_env();

    // 2. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            config.log_level.as_str()
        } else {
            "info,actix_web=info,sqlx=warn"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    // 3. Validate configuration
    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        anyhow::bail!("invalid configuration: {}", e);
    }

    log::info!("Starting libon-places...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Initialize database connection pool
    let pool = config::init_db_pool(&config)
        .await
        .context("failed to connect to database")?;

    // 5. Collaborators shared by every worker
    let store: Arc<dyn PlaceStore> = Arc::new(PgStore::new(pool));
    let uploader: Arc<dyn ImageUploader> =
        Arc::new(CloudinaryUploader::new(config.cloudinary.clone()));

    // 6. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let config_clone = config.clone();

    HttpServer::new(move || {
        App::new()
            // Application state
            .app_data(web::Data::from(store.clone()))
            .app_data(web::Data::from(uploader.clone()))
            .app_data(web::Data::new(config_clone.clone()))
            // Middleware
            .wrap(SessionIdentity::new(&config_clone.session_secret))
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::places_config)
    })
    .bind(&server_addr)
    .with_context(|| format!("failed to bind {}", server_addr))?
    .run()
    .await?;

    Ok(())
}
