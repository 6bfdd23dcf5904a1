//! Main entry point for the campsite reservations backend server.
//! This crate wires configuration, the favorites service, and the REST API.

mod cors;

use std::sync::Arc;

use actix_web::{App, HttpResponse, HttpServer, middleware::Logger, web};
use favorites::{FavoritesService, PgFavoritesStore};
use postgres::database::*;
use web_handlers::favorite_routes;

use crate::cors::CorsGate;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    log::info!("🚀 Starting campsite reservations server...");

    // Create database connection pool
    let pool = match create_connection_pool().await {
        Ok(pool) => {
            log::info!("🗃️ Database pool created successfully");

            if let Err(e) = test_connection(&pool).await {
                log::error!("❌ Database connection test failed: {}", e);
            }
            pool
        }
        Err(e) => {
            log::error!("❌ Failed to create database pool: {}", e);
            log::error!("💡 Make sure PostgreSQL is running: brew services start postgresql@16");
            std::process::exit(1);
        }
    };

    // Make sure the favorites tables exist before accepting traffic
    let store = PgFavoritesStore::new(pool.clone());
    if let Err(e) = store.migrate().await {
        log::error!("❌ Failed to prepare favorites tables: {}", e);
        std::process::exit(1);
    }
    log::info!("🗂️ Favorites tables ready");

    let favorites_service = FavoritesService::new(Arc::new(store));

    log::info!("🌐 Server will be available at: http://0.0.0.0:8080");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(favorites_service.clone()))
            .wrap(CorsGate::from_env())
            .wrap(Logger::default())
            .service(web::scope("/api").configure(favorite_routes))
            .route(
                "/health",
                web::get().to(|| async { HttpResponse::Ok().body("OK") }),
            )
    })
    .bind("0.0.0.0:8080")?
    .run()
    .await
}
