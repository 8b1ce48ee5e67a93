use std::sync::Arc;

use log::info;
use validator::Validate;

use crate::dtos::profile::{ProfileOut, UpsertProfileIn};
use crate::error::ApiError;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::models::profile::Profile;
use crate::repositories::{ProfileRepository, RepoError, UserRepository};

#[derive(Clone)]
pub struct ProfileService {
    users: Arc<dyn UserRepository>,
    profiles: Arc<dyn ProfileRepository>,
}

impl ProfileService {
    pub fn new(users: Arc<dyn UserRepository>, profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { users, profiles }
    }

    /// Profile milik session user. Profile boleh belum ada, user harus ada.
    pub async fn get_profile(&self, session: &AuthenticatedUser) -> Result<ProfileOut, ApiError> {
        let user = self
            .users
            .find_by_id(session.user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User doesnt exist".to_string()))?;

        let profile = self.profiles.find_by_user_id(user.id).await?;
        Ok(ProfileOut {
            profile,
            role: user.role,
        })
    }

    /// Insert/update profile dan sekalian set role user.
    pub async fn upsert_profile(
        &self,
        session: &AuthenticatedUser,
        input: UpsertProfileIn,
    ) -> Result<Profile, ApiError> {
        input.validate()?;

        if input.user_id != session.user_id {
            return Err(ApiError::Unauthorized(
                "Cannot edit another user's profile".to_string(),
            ));
        }

        let profile = self
            .profiles
            .upsert_with_role(input.user_id, input.role, input.fields())
            .await
            .map_err(|e| match e {
                RepoError::NotFound => ApiError::NotFound("User doesnt exist".to_string()),
                other => other.into(),
            })?;

        info!("Profile saved for user {} as {}", profile.user_id, input.role);
        Ok(profile)
    }
}
