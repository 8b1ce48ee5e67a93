// src/handlers/profile_handlers.rs
use actix_web::{get, put, web, HttpResponse};

use crate::dtos::api_response::ApiResponse;
use crate::dtos::profile::UpsertProfileIn;
use crate::error::ApiError;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::services::profile_services::ProfileService;

/// GET /api/profile
/// `{ profile, role }` milik session user; profile `null` kalau belum dibuat.
#[get("/profile")]
pub async fn get_user_profile(
    auth_user: AuthenticatedUser,
    svc: web::Data<ProfileService>,
) -> Result<HttpResponse, ApiError> {
    let out = svc.get_profile(&auth_user).await?;
    let message = if out.profile.is_some() {
        "Profile retrieved successfully"
    } else {
        "No profile found"
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(message, out)))
}

/// PUT /api/profile
#[put("/profile")]
pub async fn upsert_user_profile(
    auth_user: AuthenticatedUser,
    svc: web::Data<ProfileService>,
    body: web::Json<UpsertProfileIn>,
) -> Result<HttpResponse, ApiError> {
    let profile = svc.upsert_profile(&auth_user, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Profile updated successfully", profile)))
}
