use async_trait::async_trait;
use tokio_postgres::Row;
use uuid::Uuid;

use super::pg::{is_unique_violation, parse_column};
use super::{PgStore, RepoError, UserRepository};
use crate::models::user::{NewUser, User};

const USER_COLUMNS: &str = "id, email, name, image, password_hash, role, created_at";

fn user_from_row(row: &Row) -> Result<User, RepoError> {
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        name: row.try_get("name")?,
        image: row.try_get("image")?,
        password_hash: row.try_get("password_hash")?,
        role: parse_column(row.try_get("role")?)?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl UserRepository for PgStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let client = self.pool.get().await?;
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let row = client.query_opt(sql.as_str(), &[&email]).await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let client = self.pool.get().await?;
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = client.query_opt(sql.as_str(), &[&id]).await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn insert(&self, user: NewUser) -> Result<User, RepoError> {
        let client = self.pool.get().await?;
        let sql = format!(
            "INSERT INTO users (id, email, password_hash, role, created_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            USER_COLUMNS
        );
        let row = client
            .query_one(
                sql.as_str(),
                &[
                    &user.id,
                    &user.email,
                    &user.password_hash,
                    &user.role.as_str(),
                    &user.created_at,
                ],
            )
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    RepoError::Conflict("User already exist".to_string())
                } else {
                    RepoError::Postgres(e)
                }
            })?;
        user_from_row(&row)
    }
}
