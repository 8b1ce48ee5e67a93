// src/services/auth_services.rs
use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::{info, warn};
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use crate::dtos::auth::{LoginIn, LoginOut, RegisterIn, SessionOut};
use crate::error::ApiError;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::models::user::{JwtClaims, NewUser, Role, User, UserPublic};
use crate::repositories::{RepoError, UserRepository};
use crate::services::password::{hash_password, verify_password};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("jwt error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("parse uuid error")]
    UuidError(#[from] uuid::Error),
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt_secret: String,
    token_ttl_secs: i64,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, jwt_secret: String, token_ttl_secs: i64) -> Self {
        Self {
            users,
            jwt_secret,
            token_ttl_secs,
        }
    }

    /// Buat akun baru. Email yang sudah terdaftar -> Conflict, credential lama tidak disentuh.
    pub async fn register(&self, input: RegisterIn) -> Result<UserPublic, ApiError> {
        let input = RegisterIn {
            email: input.email.trim().to_lowercase(),
            ..input
        };
        input.validate()?;

        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(ApiError::Conflict("User already exist".to_string()));
        }

        let password_hash = hash_password(&input.password)?;
        let user = self
            .users
            .insert(NewUser {
                id: Uuid::new_v4(),
                email: input.email,
                password_hash,
                role: Role::default(),
                created_at: Utc::now().trunc_subsecs(6),
            })
            .await
            .map_err(|e| match e {
                // race: email didaftarkan request lain di antara cek dan insert
                RepoError::Conflict(_) => ApiError::Conflict("User already exist".to_string()),
                other => other.into(),
            })?;

        info!("Registered user {}", user.id);
        Ok(UserPublic::from(&user))
    }

    pub async fn login(&self, input: LoginIn) -> Result<LoginOut, ApiError> {
        let input = LoginIn {
            email: input.email.trim().to_lowercase(),
            ..input
        };
        input.validate()?;

        let user = match self.users.find_by_email(&input.email).await? {
            Some(user) => user,
            None => {
                warn!("Login attempt for unknown email");
                return Err(ApiError::Unauthorized("Invalid email or password".to_string()));
            }
        };

        let hash = user.password_hash.as_deref().ok_or_else(|| {
            ApiError::Unauthorized("You're not configured password yet".to_string())
        })?;

        if !verify_password(&input.password, hash)? {
            warn!("Wrong password for user {}", user.id);
            return Err(ApiError::Unauthorized("Invalid email or password".to_string()));
        }

        let session = self.issue_token(&user)?;
        Ok(LoginOut {
            session,
            user: UserPublic::from(&user),
        })
    }

    pub fn issue_token(&self, user: &User) -> Result<SessionOut, ApiError> {
        let now = Utc::now().timestamp();
        let claims = JwtClaims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            name: user.name.clone(),
            image: user.image.clone(),
            iat: now as u64,
            exp: (now + self.token_ttl_secs) as u64,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(format!("failed to sign token: {}", e)))?;

        Ok(SessionOut {
            access_token: token,
            token_type: "bearer".to_string(),
            expires_in: self.token_ttl_secs,
        })
    }

    /// Validasi signature + expiry, lalu ambil identitas user dari klaim.
    pub fn verify_token(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;

        Ok(AuthenticatedUser {
            user_id: Uuid::parse_str(&data.claims.sub)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryStore;

    fn service() -> AuthService {
        AuthService::new(Arc::new(MemoryStore::new()), "test-secret".to_string(), 3600)
    }

    fn register_in(email: &str, password: &str) -> RegisterIn {
        RegisterIn {
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn second_registration_conflicts_and_keeps_credential() {
        let svc = service();
        svc.register(register_in("Founder@Example.com ", "first-password"))
            .await
            .unwrap();

        let err = svc
            .register(register_in("founder@example.com", "second-password"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));

        // password lama masih berlaku, yang baru tidak
        let ok = svc
            .login(LoginIn {
                email: "founder@example.com".into(),
                password: "first-password".into(),
            })
            .await;
        assert!(ok.is_ok());
        let err = svc
            .login(LoginIn {
                email: "founder@example.com".into(),
                password: "second-password".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn register_rejects_mismatched_confirmation() {
        let svc = service();
        let err = svc
            .register(RegisterIn {
                email: "a@b.co".into(),
                password: "password1".into(),
                confirm_password: "password2".into(),
            })
            .await
            .unwrap_err();
        match err {
            ApiError::Validation(fields) => assert!(fields.contains_key("confirmPassword")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn login_token_round_trips() {
        let svc = service();
        let user = svc
            .register(register_in("inv@example.com", "password123"))
            .await
            .unwrap();
        let out = svc
            .login(LoginIn {
                email: "inv@example.com".into(),
                password: "password123".into(),
            })
            .await
            .unwrap();

        let session = svc.verify_token(&out.session.access_token).unwrap();
        assert_eq!(session.user_id, user.id);
        assert_eq!(out.session.expires_in, 3600);
    }

    #[tokio::test]
    async fn unknown_email_is_unauthorized() {
        let err = service()
            .login(LoginIn {
                email: "ghost@example.com".into(),
                password: "password123".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@b.co".into(),
            name: None,
            image: None,
            password_hash: None,
            role: Role::Investor,
            created_at: Utc::now(),
        };
        let other = AuthService::new(Arc::new(MemoryStore::new()), "other-secret".into(), 3600);
        let token = other.issue_token(&user).unwrap().access_token;

        assert!(service().verify_token(&token).is_err());
        assert!(other.verify_token(&token).is_ok());
    }
}
