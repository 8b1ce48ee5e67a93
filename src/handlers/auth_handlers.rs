use actix_web::{post, web, HttpResponse};

use crate::dtos::api_response::ApiResponse;
use crate::dtos::auth::{LoginIn, RegisterIn};
use crate::error::ApiError;
use crate::services::auth_services::AuthService;

/// POST /auth/register
/// Buat akun saja, tanpa session. Client lanjut ke login lalu isi profile.
#[post("/register")]
pub async fn register(
    svc: web::Data<AuthService>,
    body: web::Json<RegisterIn>,
) -> Result<HttpResponse, ApiError> {
    let user = svc.register(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("Account created", user)))
}

/// POST /auth/login
#[post("/login")]
pub async fn login(
    svc: web::Data<AuthService>,
    body: web::Json<LoginIn>,
) -> Result<HttpResponse, ApiError> {
    let out = svc.login(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Login successful", out)))
}
