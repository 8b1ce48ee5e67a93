// src/services/feed_services.rs
use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use log::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::dtos::feed::{CreateFeedIn, FeedCursor, FeedPage, FeedProject, ToggleLikeOut, MAX_FEED_LIMIT};
use crate::error::ApiError;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::models::post::{FeedRow, NewProject, Project, Visibility};
use crate::repositories::FeedRepository;

#[derive(Clone)]
pub struct FeedService {
    feed: Arc<dyn FeedRepository>,
}

impl FeedService {
    pub fn new(feed: Arc<dyn FeedRepository>) -> Self {
        Self { feed }
    }

    /// Satu halaman feed, newest first. `viewer == None` berarti anonim (likedByMe selalu false).
    pub async fn infinite_feed(
        &self,
        viewer: Option<Uuid>,
        limit: i64,
        cursor: Option<FeedCursor>,
    ) -> Result<FeedPage, ApiError> {
        if !(1..=MAX_FEED_LIMIT).contains(&limit) {
            return Err(ApiError::field("limit", "Limit must be between 1 and 100"));
        }

        // over-fetch satu baris untuk tahu masih ada halaman berikutnya atau tidak
        let rows = self.feed.list_feed(viewer, cursor, limit + 1).await?;
        debug!(
            "Feed query viewer={:?} cursor={:?} limit={} rows={}",
            viewer,
            cursor,
            limit,
            rows.len()
        );

        Ok(paginate(rows, limit as usize))
    }

    /// Buat project baru milik caller, selalu PUBLIC.
    pub async fn create(
        &self,
        owner: &AuthenticatedUser,
        input: CreateFeedIn,
    ) -> Result<Project, ApiError> {
        input.validate()?;

        let image = input
            .image
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let project = self
            .feed
            .insert_project(NewProject {
                id: Uuid::new_v4(),
                title: input.title,
                description: input.description,
                image,
                // presisi mikrodetik, sama dengan timestamptz Postgres
                created_at: Utc::now().trunc_subsecs(6),
                status: Visibility::Public,
                user_id: owner.user_id,
            })
            .await?;

        info!("User {} created project {}", owner.user_id, project.id);
        Ok(project)
    }

    pub async fn toggle_like(
        &self,
        user: &AuthenticatedUser,
        project_id: Uuid,
    ) -> Result<ToggleLikeOut, ApiError> {
        if self.feed.find_project(project_id).await?.is_none() {
            return Err(ApiError::NotFound("Project not found".to_string()));
        }

        let added_like = self.feed.toggle_like(project_id, user.user_id).await?;
        Ok(ToggleLikeOut { added_like })
    }
}

/// `rows` berisi maksimal `limit + 1` baris. Kalau lebih dari `limit`, baris terakhir
/// di-pop dan (created_at, id)-nya jadi `next_cursor`.
pub fn paginate(mut rows: Vec<FeedRow>, limit: usize) -> FeedPage {
    let mut next_cursor = None;
    if rows.len() > limit {
        rows.truncate(limit + 1);
        if let Some(next) = rows.pop() {
            next_cursor = Some(FeedCursor {
                id: next.id,
                created_at: next.created_at,
            });
        }
    }

    FeedPage {
        projects: rows.into_iter().map(FeedProject::from).collect(),
        next_cursor,
    }
}
