//! Sisi client feed: HTTP client ke API, cache halaman feed, dan state renderer
//! infinite list. Tidak ada UI di sini; renderer menghasilkan view model.

use thiserror::Error;

use crate::error::FieldErrors;

pub mod api;
pub mod cache;
pub mod list;

pub use api::ApiClient;
pub use cache::FeedCache;
pub use list::{FeedCard, FeedView, InfiniteFeedList, PageFetcher};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// Ditolak sebelum request dikirim.
    #[error("validation failed: {0:?}")]
    Validation(FieldErrors),
    #[error("{code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
        errors: Option<FieldErrors>,
    },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("not logged in")]
    NotLoggedIn,
}
