pub mod client;
pub mod config;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;

use std::sync::Arc;

use actix_web::web;

use crate::config::Settings;
use crate::error::ApiError;
use crate::repositories::{FeedRepository, ProfileRepository, UserRepository};
use crate::services::auth_services::AuthService;
use crate::services::feed_services::FeedService;
use crate::services::profile_services::ProfileService;

/// State kecil yang dibaca handler, di luar service.
#[derive(Debug, Clone)]
pub struct AppState {
    pub feed_requires_auth: bool,
}

/// Semua service yang di-share antar worker actix.
#[derive(Clone)]
pub struct AppServices {
    pub auth: web::Data<AuthService>,
    pub feed: web::Data<FeedService>,
    pub profile: web::Data<ProfileService>,
    pub state: web::Data<AppState>,
}

impl AppServices {
    /// Rakit service di atas satu storage (Postgres atau memory).
    pub fn new<S>(store: Arc<S>, settings: &Settings) -> Self
    where
        S: UserRepository + ProfileRepository + FeedRepository + 'static,
    {
        let users: Arc<dyn UserRepository> = store.clone();
        let profiles: Arc<dyn ProfileRepository> = store.clone();
        let feed: Arc<dyn FeedRepository> = store;

        Self {
            auth: web::Data::new(AuthService::new(
                users.clone(),
                settings.jwt_secret.clone(),
                settings.token_ttl_secs,
            )),
            feed: web::Data::new(FeedService::new(feed)),
            profile: web::Data::new(ProfileService::new(users, profiles)),
            state: web::Data::new(AppState {
                feed_requires_auth: settings.feed_requires_auth,
            }),
        }
    }

    /// Dipakai di `App::configure`, baik di `main` maupun di test.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.auth.clone())
            .app_data(self.feed.clone())
            .app_data(self.profile.clone())
            .app_data(self.state.clone())
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                ApiError::field("body", &err.to_string()).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                ApiError::field("query", &err.to_string()).into()
            }))
            .configure(handlers::routes);
    }
}
