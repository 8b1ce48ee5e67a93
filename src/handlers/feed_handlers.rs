// src/handlers/feed_handlers.rs
use actix_web::{get, post, web, HttpResponse};
use log::debug;
use uuid::Uuid;
use validator::Validate;

use crate::dtos::api_response::ApiResponse;
use crate::dtos::feed::{CreateFeedIn, InfiniteFeedQuery};
use crate::error::ApiError;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::services::feed_services::FeedService;
use crate::AppState;

/// GET /api/feed?limit=&cursorId=&cursorCreatedAt=
/// Satu halaman feed + `nextCursor` kalau masih ada.
#[get("/feed")]
pub async fn infinite_feed(
    svc: web::Data<FeedService>,
    state: web::Data<AppState>,
    user: Option<AuthenticatedUser>,
    query: web::Query<InfiniteFeedQuery>,
) -> Result<HttpResponse, ApiError> {
    if state.feed_requires_auth && user.is_none() {
        return Err(ApiError::Unauthorized("Unauthorize user".to_string()));
    }

    query.validate()?;
    let cursor = query.cursor()?;
    let viewer = user.as_ref().map(|u| u.user_id);

    let page = svc.infinite_feed(viewer, query.limit(), cursor).await?;
    debug!("Returning {} projects", page.projects.len());

    Ok(HttpResponse::Ok().json(ApiResponse::success("Feed retrieved successfully", page)))
}

/// POST /api/feed
#[post("/feed")]
pub async fn create_feed(
    svc: web::Data<FeedService>,
    user: AuthenticatedUser,
    body: web::Json<CreateFeedIn>,
) -> Result<HttpResponse, ApiError> {
    let project = svc.create(&user, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("Project created successfully", project)))
}

/// POST /api/feed/{id}/like
#[post("/feed/{id}/like")]
pub async fn toggle_like(
    svc: web::Data<FeedService>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let out = svc.toggle_like(&user, path.into_inner()).await?;
    let message = if out.added_like { "Like added" } else { "Like removed" };
    Ok(HttpResponse::Ok().json(ApiResponse::success(message, out)))
}
