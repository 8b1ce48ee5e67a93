use async_trait::async_trait;
use chrono::Utc;
use tokio_postgres::Row;
use uuid::Uuid;

use super::pg::is_unique_violation;
use super::{PgStore, ProfileRepository, RepoError};
use crate::models::profile::{Profile, ProfileFields};
use crate::models::user::Role;

const PROFILE_COLUMNS: &str = "id, user_id, username, name, phone, address, city, country, \
                               post_code, biography, interest, skills, updated_at";

fn profile_from_row(row: &Row) -> Result<Profile, RepoError> {
    Ok(Profile {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        username: row.try_get("username")?,
        name: row.try_get("name")?,
        phone: row.try_get("phone")?,
        address: row.try_get("address")?,
        city: row.try_get("city")?,
        country: row.try_get("country")?,
        post_code: row.try_get("post_code")?,
        biography: row.try_get("biography")?,
        interest: row.try_get("interest")?,
        skills: row.try_get("skills")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl ProfileRepository for PgStore {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Profile>, RepoError> {
        let client = self.pool.get().await?;
        let sql = format!("SELECT {} FROM profiles WHERE user_id = $1", PROFILE_COLUMNS);
        let row = client.query_opt(sql.as_str(), &[&user_id]).await?;
        row.as_ref().map(profile_from_row).transpose()
    }

    async fn upsert_with_role(
        &self,
        user_id: Uuid,
        role: Role,
        fields: ProfileFields,
    ) -> Result<Profile, RepoError> {
        let mut client = self.pool.get().await?;
        let tx = client.transaction().await?;

        let updated = tx
            .execute(
                "UPDATE users SET role = $2 WHERE id = $1",
                &[&user_id, &role.as_str()],
            )
            .await?;
        if updated == 0 {
            return Err(RepoError::NotFound);
        }

        let sql = format!(
            "INSERT INTO profiles (id, user_id, username, name, phone, address, city, country, \
                                   post_code, biography, interest, skills, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             ON CONFLICT (user_id) DO UPDATE SET \
                username = EXCLUDED.username, name = EXCLUDED.name, phone = EXCLUDED.phone, \
                address = EXCLUDED.address, city = EXCLUDED.city, country = EXCLUDED.country, \
                post_code = EXCLUDED.post_code, biography = EXCLUDED.biography, \
                interest = EXCLUDED.interest, skills = EXCLUDED.skills, \
                updated_at = EXCLUDED.updated_at \
             RETURNING {}",
            PROFILE_COLUMNS
        );
        let row = tx
            .query_one(
                sql.as_str(),
                &[
                    &Uuid::new_v4(),
                    &user_id,
                    &fields.username,
                    &fields.name,
                    &fields.phone,
                    &fields.address,
                    &fields.city,
                    &fields.country,
                    &fields.post_code,
                    &fields.biography,
                    &fields.interest,
                    &fields.skills,
                    &Utc::now(),
                ],
            )
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    RepoError::Conflict("Username already taken".to_string())
                } else {
                    RepoError::Postgres(e)
                }
            })?;

        let profile = profile_from_row(&row)?;
        tx.commit().await?;
        Ok(profile)
    }
}
