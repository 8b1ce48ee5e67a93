use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::models::post::FeedRow;

pub const DEFAULT_FEED_LIMIT: i64 = 10;
pub const MAX_FEED_LIMIT: i64 = 100;

/// Posisi resume feed: (created_at, id). `id` jadi tie-break kalau timestamp sama.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedCursor {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Query string `GET /api/feed?limit=&cursorId=&cursorCreatedAt=`
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InfiniteFeedQuery {
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<i64>,
    pub cursor_id: Option<Uuid>,
    pub cursor_created_at: Option<DateTime<Utc>>,
}

impl InfiniteFeedQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_FEED_LIMIT)
    }

    /// Cursor hanya valid kalau kedua bagian ada.
    pub fn cursor(&self) -> Result<Option<FeedCursor>, ApiError> {
        match (self.cursor_id, self.cursor_created_at) {
            (Some(id), Some(created_at)) => Ok(Some(FeedCursor { id, created_at })),
            (None, None) => Ok(None),
            _ => Err(ApiError::field(
                "cursor",
                "cursorId and cursorCreatedAt must be sent together",
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedUser {
    pub id: Uuid,
    pub name: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedProject {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub like_count: i64,
    pub liked_by_me: bool,
    pub user: FeedUser,
}

impl FeedProject {
    pub fn cursor(&self) -> FeedCursor {
        FeedCursor {
            id: self.id,
            created_at: self.created_at,
        }
    }
}

impl From<FeedRow> for FeedProject {
    fn from(row: FeedRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            image: row.image,
            created_at: row.created_at,
            like_count: row.like_count,
            liked_by_me: row.liked_by_me,
            user: FeedUser {
                id: row.user_id,
                name: row.user_name,
                image: row.user_image,
            },
        }
    }
}

/// Satu halaman feed. `next_cursor == None` berarti list sudah habis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
    pub projects: Vec<FeedProject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<FeedCursor>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFeedIn {
    #[validate(length(min = 1, max = 30, message = "Title must be between 1 and 30 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description required"))]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleLikeOut {
    pub added_like: bool,
}
