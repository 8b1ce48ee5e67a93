use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_postgres::Row;
use uuid::Uuid;

use super::pg::parse_column;
use super::{FeedRepository, PgStore, RepoError};
use crate::dtos::feed::FeedCursor;
use crate::models::post::{FeedRow, NewProject, Project, Visibility};

const PROJECT_COLUMNS: &str = "id, title, description, image, status, user_id, created_at";

// like_count dan liked_by_me dihitung saat query, tidak disimpan di projects.
// Baris cursor ikut terbawa (<=), jadi halaman berikutnya dimulai dari item yang di-pop.
const FEED_SQL: &str = "\
    SELECT p.id, p.title, p.description, p.image, p.created_at, \
           (SELECT COUNT(*) FROM likes l WHERE l.project_id = p.id) AS like_count, \
           EXISTS (SELECT 1 FROM likes l WHERE l.project_id = p.id AND l.user_id = $1) AS liked_by_me, \
           u.id AS user_id, u.name AS user_name, u.image AS user_image \
    FROM projects p \
    JOIN users u ON u.id = p.user_id \
    WHERE p.status <> ALL($2) \
      AND ($3::timestamptz IS NULL OR (p.created_at, p.id) <= ($3::timestamptz, $4::uuid)) \
    ORDER BY p.created_at DESC, p.id DESC \
    LIMIT $5";

fn project_from_row(row: &Row) -> Result<Project, RepoError> {
    Ok(Project {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        image: row.try_get("image")?,
        status: parse_column(row.try_get("status")?)?,
        user_id: row.try_get("user_id")?,
        created_at: row.try_get("created_at")?,
    })
}

fn feed_row_from_row(row: &Row) -> Result<FeedRow, RepoError> {
    Ok(FeedRow {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        image: row.try_get("image")?,
        created_at: row.try_get("created_at")?,
        like_count: row.try_get("like_count")?,
        liked_by_me: row.try_get("liked_by_me")?,
        user_id: row.try_get("user_id")?,
        user_name: row.try_get("user_name")?,
        user_image: row.try_get("user_image")?,
    })
}

#[async_trait]
impl FeedRepository for PgStore {
    async fn list_feed(
        &self,
        viewer: Option<Uuid>,
        cursor: Option<FeedCursor>,
        take: i64,
    ) -> Result<Vec<FeedRow>, RepoError> {
        let client = self.pool.get().await?;

        let hidden: Vec<&str> = Visibility::HIDDEN_FROM_FEED
            .iter()
            .map(|v| v.as_str())
            .collect();
        let cursor_created_at: Option<DateTime<Utc>> = cursor.map(|c| c.created_at);
        let cursor_id: Option<Uuid> = cursor.map(|c| c.id);

        let rows = client
            .query(
                FEED_SQL,
                &[&viewer, &hidden, &cursor_created_at, &cursor_id, &take],
            )
            .await?;

        rows.iter().map(feed_row_from_row).collect()
    }

    async fn insert_project(&self, project: NewProject) -> Result<Project, RepoError> {
        let client = self.pool.get().await?;
        let sql = format!(
            "INSERT INTO projects (id, title, description, image, status, user_id, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            PROJECT_COLUMNS
        );
        let row = client
            .query_one(
                sql.as_str(),
                &[
                    &project.id,
                    &project.title,
                    &project.description,
                    &project.image,
                    &project.status.as_str(),
                    &project.user_id,
                    &project.created_at,
                ],
            )
            .await?;
        project_from_row(&row)
    }

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, RepoError> {
        let client = self.pool.get().await?;
        let sql = format!("SELECT {} FROM projects WHERE id = $1", PROJECT_COLUMNS);
        let row = client.query_opt(sql.as_str(), &[&id]).await?;
        row.as_ref().map(project_from_row).transpose()
    }

    async fn toggle_like(&self, project_id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        let mut client = self.pool.get().await?;
        let tx = client.transaction().await?;

        // lock baris project: toggle bersamaan pada project yang sama jalan berurutan,
        // jadi DELETE kedua pasti melihat like hasil INSERT pertama
        let locked = tx
            .query_opt("SELECT 1 FROM projects WHERE id = $1 FOR UPDATE", &[&project_id])
            .await?;
        if locked.is_none() {
            return Err(RepoError::NotFound);
        }

        let removed = tx
            .execute(
                "DELETE FROM likes WHERE project_id = $1 AND user_id = $2",
                &[&project_id, &user_id],
            )
            .await?;

        let added = if removed == 0 {
            let inserted = tx
                .execute(
                    "INSERT INTO likes (project_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
                    &[&project_id, &user_id],
                )
                .await?;
            inserted == 1
        } else {
            false
        };

        tx.commit().await?;
        Ok(added)
    }
}
