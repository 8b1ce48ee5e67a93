// src/client/api.rs
use async_trait::async_trait;
use chrono::SecondsFormat;
use log::debug;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use urlencoding::encode;
use uuid::Uuid;
use validator::Validate;

use super::list::PageFetcher;
use super::ClientError;
use crate::dtos::api_response::ApiResponse;
use crate::dtos::auth::{LoginIn, LoginOut, RegisterIn};
use crate::dtos::feed::{CreateFeedIn, FeedCursor, FeedPage, ToggleLikeOut};
use crate::dtos::profile::{ProfileOut, UpsertProfileIn};
use crate::error::{field_errors, FieldErrors};
use crate::models::post::Project;
use crate::models::profile::Profile;
use crate::models::user::UserPublic;

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Option<FieldErrors>,
}

/// HTTP client untuk API et-Ventura. Token disimpan setelah `login`.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, req: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let token = self.token.as_ref().ok_or(ClientError::NotLoggedIn)?;
        Ok(req.bearer_auth(token))
    }

    async fn read<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            let body: ErrorEnvelope = serde_json::from_str(&text).unwrap_or(ErrorEnvelope {
                code: String::new(),
                message: text.clone(),
                errors: None,
            });
            return Err(ClientError::Api {
                status: status.as_u16(),
                code: body.code,
                message: body.message,
                errors: body.errors,
            });
        }

        let envelope: ApiResponse<T> =
            serde_json::from_str(&text).map_err(|e| ClientError::Decode(e.to_string()))?;
        envelope
            .data
            .ok_or_else(|| ClientError::Decode("missing data".to_string()))
    }

    pub async fn register(&self, input: RegisterIn) -> Result<UserPublic, ClientError> {
        input
            .validate()
            .map_err(|e| ClientError::Validation(field_errors(&e)))?;

        let resp = self
            .http
            .post(self.url("/auth/register"))
            .json(&input)
            .send()
            .await?;
        Self::read(resp).await
    }

    /// Login lalu simpan access token untuk request berikutnya.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<LoginOut, ClientError> {
        let body = LoginIn {
            email: email.to_string(),
            password: password.to_string(),
        };
        let resp = self
            .http
            .post(self.url("/auth/login"))
            .json(&body)
            .send()
            .await?;

        let out: LoginOut = Self::read(resp).await?;
        self.token = Some(out.session.access_token.clone());
        Ok(out)
    }

    pub async fn fetch_feed_page(
        &self,
        limit: i64,
        cursor: Option<FeedCursor>,
    ) -> Result<FeedPage, ClientError> {
        let mut url = format!("{}?limit={}", self.url("/api/feed"), limit);
        if let Some(c) = cursor {
            let created_at = c.created_at.to_rfc3339_opts(SecondsFormat::Micros, true);
            url.push_str(&format!(
                "&cursorId={}&cursorCreatedAt={}",
                c.id,
                encode(&created_at)
            ));
        }
        debug!("GET {}", url);

        // feed boleh diakses tanpa token kalau server mengizinkan
        let mut req = self.http.get(&url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        Self::read(req.send().await?).await
    }

    /// Validasi dilakukan sebelum request; input invalid tidak pernah dikirim.
    pub async fn create_feed(&self, input: CreateFeedIn) -> Result<Project, ClientError> {
        input
            .validate()
            .map_err(|e| ClientError::Validation(field_errors(&e)))?;

        let req = self.authed(self.http.post(self.url("/api/feed")))?;
        Self::read(req.json(&input).send().await?).await
    }

    pub async fn toggle_like(&self, project_id: Uuid) -> Result<ToggleLikeOut, ClientError> {
        let path = format!("/api/feed/{}/like", project_id);
        let req = self.authed(self.http.post(self.url(&path)))?;
        Self::read(req.send().await?).await
    }

    pub async fn get_profile(&self) -> Result<ProfileOut, ClientError> {
        let req = self.authed(self.http.get(self.url("/api/profile")))?;
        Self::read(req.send().await?).await
    }

    pub async fn upsert_profile(&self, input: UpsertProfileIn) -> Result<Profile, ClientError> {
        input
            .validate()
            .map_err(|e| ClientError::Validation(field_errors(&e)))?;

        let req = self.authed(self.http.put(self.url("/api/profile")))?;
        Self::read(req.json(&input).send().await?).await
    }
}

#[async_trait]
impl PageFetcher for ApiClient {
    async fn fetch_page(
        &self,
        limit: i64,
        cursor: Option<FeedCursor>,
    ) -> Result<FeedPage, ClientError> {
        self.fetch_feed_page(limit, cursor).await
    }
}
