use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user::UserPublic;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterIn {
    #[validate(email(message = "Email invalid"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 character"))]
    pub password: String,
    #[validate(
        length(min = 8, message = "Password must be at least 8 character"),
        must_match(other = "password", message = "Password doesnt match")
    )]
    pub confirm_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginIn {
    #[validate(email(message = "Email invalid"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 character"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOut {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginOut {
    pub session: SessionOut,
    pub user: UserPublic,
}
