// src/main.rs
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger};
use log::{info, error, warn};

use etventura_be::config::{self, Settings, StorageKind};
use etventura_be::repositories::{MemoryStore, PgStore};
use etventura_be::AppServices;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    info!("JWT secret: {}", config::mask_secret(&settings.jwt_secret));
    info!("Feed requires auth: {}", settings.feed_requires_auth);

    let services = match settings.storage {
        StorageKind::Postgres => {
            let pg_pool = match config::get_pg_pool() {
                Ok(p) => p,
                Err(e) => {
                    error!("Failed to create PG pool: {:#}", e);
                    std::process::exit(1);
                }
            };
            let store = PgStore::new(pg_pool);
            if let Err(e) = store.run_migrations().await {
                error!("Failed to apply schema: {}", e);
                std::process::exit(1);
            }
            AppServices::new(Arc::new(store), &settings)
        }
        StorageKind::Memory => {
            warn!("Using in-memory storage, data is lost on restart");
            AppServices::new(Arc::new(MemoryStore::new()), &settings)
        }
    };

    let bind_address = format!("0.0.0.0:{}", settings.port);
    info!("Starting server on {}", bind_address);

    let allowed_origins = settings.allowed_origins.clone();

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "PUT", "OPTIONS"])
            .allowed_headers(vec![
                "authorization",
                "content-type",
                "accept",
                "x-requested-with"
            ])
            .supports_credentials()
            .max_age(3600);

        for origin in &allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .configure(|cfg| services.configure(cfg))
    })
    .bind(&bind_address)?
    .run()
    .await
}
