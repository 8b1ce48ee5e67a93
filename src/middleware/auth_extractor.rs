// src/middleware/auth_extractor.rs
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use log::debug;
use uuid::Uuid;

use crate::error::ApiError;
use crate::services::auth_services::AuthService;

/// Hasil extractor - session user yang sudah terautentikasi untuk request ini.
/// Handler menerima ini secara eksplisit; tidak ada lookup session global.
/// Hanya id yang dibawa; role dan identitas lain dibaca dari storage karena
/// klaim token bisa sudah basi setelah profile diubah.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<AuthenticatedUser, ApiError>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, ApiError> {
    let svc = req
        .app_data::<web::Data<AuthService>>()
        .ok_or_else(|| ApiError::Internal("AuthService is not registered".to_string()))?;

    let auth_header = req
        .headers()
        .get("Authorization")
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid header format".to_string()))?;

    // Cek format Bearer token
    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Invalid auth header format".to_string()))?;

    svc.verify_token(token).map_err(|e| {
        debug!("Token rejected: {}", e);
        ApiError::Unauthorized("Invalid token".to_string())
    })
}
