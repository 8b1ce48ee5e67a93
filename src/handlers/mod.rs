use actix_web::{get, web, HttpResponse};

pub mod auth_handlers;
pub mod feed_handlers;
pub mod profile_handlers;

/// GET /health
#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Daftar semua route aplikasi.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health)
        .service(
            web::scope("/auth")
                .service(auth_handlers::register) // POST /auth/register
                .service(auth_handlers::login),   // POST /auth/login
        )
        .service(
            web::scope("/api")
                .service(feed_handlers::infinite_feed)          // GET /api/feed
                .service(feed_handlers::create_feed)            // POST /api/feed
                .service(feed_handlers::toggle_like)            // POST /api/feed/{id}/like
                .service(profile_handlers::get_user_profile)    // GET /api/profile
                .service(profile_handlers::upsert_user_profile), // PUT /api/profile
        );
}
