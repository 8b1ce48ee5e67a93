use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Row `profiles`, one-to-one dengan `users` (kolom `user_id` unique).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub post_code: Option<i32>,
    pub biography: String,
    pub interest: String,
    pub skills: String,
    pub updated_at: DateTime<Utc>,
}

/// Data untuk upsert profile. Field yang sama dipakai untuk create maupun update.
#[derive(Debug, Clone)]
pub struct ProfileFields {
    pub username: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub post_code: Option<i32>,
    pub biography: String,
    pub interest: String,
    pub skills: String,
}

impl Profile {
    pub fn from_fields(id: Uuid, user_id: Uuid, fields: ProfileFields, updated_at: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id,
            username: fields.username,
            name: fields.name,
            phone: fields.phone,
            address: fields.address,
            city: fields.city,
            country: fields.country,
            post_code: fields.post_code,
            biography: fields.biography,
            interest: fields.interest,
            skills: fields.skills,
            updated_at,
        }
    }
}
