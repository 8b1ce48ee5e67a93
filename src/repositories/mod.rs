use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::dtos::feed::FeedCursor;
use crate::models::post::{FeedRow, NewProject, Project};
use crate::models::profile::{Profile, ProfileFields};
use crate::models::user::{NewUser, Role, User};

pub mod memory;
pub mod pg;
pub mod post_repository;
pub mod profile_repository;
pub mod user_repository;

pub use memory::MemoryStore;
pub use pg::PgStore;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),
    #[error("postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),
    #[error("{0}")]
    Conflict(String),
    #[error("not found")]
    NotFound,
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    /// Gagal dengan `RepoError::Conflict` kalau email sudah terdaftar.
    async fn insert(&self, user: NewUser) -> Result<User, RepoError>;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Profile>, RepoError>;

    /// Insert atau update profile milik `user_id` dan set `users.role` dalam satu transaksi.
    /// `RepoError::NotFound` kalau user tidak ada.
    async fn upsert_with_role(
        &self,
        user_id: Uuid,
        role: Role,
        fields: ProfileFields,
    ) -> Result<Profile, RepoError>;
}

#[async_trait]
pub trait FeedRepository: Send + Sync {
    /// Ambil maksimal `take` baris feed mulai dari `cursor` (inklusif), urut
    /// (created_at desc, id desc), tanpa project PRIVATE/INVEST.
    async fn list_feed(
        &self,
        viewer: Option<Uuid>,
        cursor: Option<FeedCursor>,
        take: i64,
    ) -> Result<Vec<FeedRow>, RepoError>;

    async fn insert_project(&self, project: NewProject) -> Result<Project, RepoError>;

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, RepoError>;

    /// Hapus like kalau sudah ada, buat kalau belum. Return `true` kalau like ditambahkan.
    async fn toggle_like(&self, project_id: Uuid, user_id: Uuid) -> Result<bool, RepoError>;
}
