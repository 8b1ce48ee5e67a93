use deadpool_postgres::Pool;
use log::info;
use tokio_postgres::error::SqlState;

use super::RepoError;

const INIT_SCHEMA: &str = include_str!("../../migrations/0001_init.sql");

/// Storage Postgres. Semua repository trait diimplementasikan di atas pool yang sama.
#[derive(Clone)]
pub struct PgStore {
    pub(crate) pool: Pool,
}

impl PgStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Jalankan schema awal. Aman dipanggil berulang (`IF NOT EXISTS`).
    pub async fn run_migrations(&self) -> Result<(), RepoError> {
        let client = self.pool.get().await?;
        client.batch_execute(INIT_SCHEMA).await?;
        info!("Database schema is up to date");
        Ok(())
    }
}

pub(crate) fn is_unique_violation(e: &tokio_postgres::Error) -> bool {
    e.code() == Some(&SqlState::UNIQUE_VIOLATION)
}

pub(crate) fn parse_column<T>(value: String) -> Result<T, RepoError>
where
    T: std::str::FromStr<Err = String>,
{
    value.parse::<T>().map_err(RepoError::Corrupt)
}
