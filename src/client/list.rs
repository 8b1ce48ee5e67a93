use async_trait::async_trait;
use log::{debug, warn};
use uuid::Uuid;

use super::cache::FeedCache;
use super::ClientError;
use crate::dtos::feed::{FeedCursor, FeedPage, FeedProject, DEFAULT_FEED_LIMIT};

/// Fetch berikutnya dipicu saat viewport melewati 80% tinggi konten.
pub const SCROLL_THRESHOLD: f64 = 0.8;

#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(
        &self,
        limit: i64,
        cursor: Option<FeedCursor>,
    ) -> Result<FeedPage, ClientError>;
}

#[derive(Debug, Clone, PartialEq)]
enum FetchStatus {
    Idle,
    Fetching,
    Failed(String),
}

/// Satu kartu project yang siap ditampilkan.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedCard {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    pub author_image: Option<String>,
    pub date: String,
    pub title: String,
    pub description: String,
    pub like_count: i64,
    pub liked_by_me: bool,
}

impl From<&FeedProject> for FeedCard {
    fn from(p: &FeedProject) -> Self {
        Self {
            id: p.id,
            author_id: p.user.id,
            author_name: p.user.name.clone().unwrap_or_default(),
            author_image: p.user.image.clone(),
            date: p.created_at.format("%-m/%-d/%y").to_string(),
            title: p.title.clone(),
            description: p.description.clone(),
            like_count: p.like_count,
            liked_by_me: p.liked_by_me,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeedView {
    Loading,
    Error(String),
    Empty,
    List {
        cards: Vec<FeedCard>,
        has_more: bool,
        loading_more: bool,
        error: Option<String>,
    },
}

/// State renderer infinite feed. Maksimal satu fetch berjalan pada satu waktu;
/// tidak ada deduplikasi, halaman yang overlap akan tampil dobel.
#[derive(Debug)]
pub struct InfiniteFeedList {
    cache: FeedCache,
    limit: i64,
    status: FetchStatus,
}

impl Default for InfiniteFeedList {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_LIMIT)
    }
}

impl InfiniteFeedList {
    pub fn new(limit: i64) -> Self {
        Self {
            cache: FeedCache::new(),
            limit,
            status: FetchStatus::Idle,
        }
    }

    pub fn cache(&self) -> &FeedCache {
        &self.cache
    }

    /// Untuk patch optimistik (create/like) dari luar.
    pub fn cache_mut(&mut self) -> &mut FeedCache {
        &mut self.cache
    }

    pub fn is_fetching(&self) -> bool {
        self.status == FetchStatus::Fetching
    }

    pub fn has_more(&self) -> bool {
        self.cache.has_more()
    }

    /// Mulai fetch: return `(limit, cursor)` untuk request, atau `None` kalau
    /// sedang fetch atau list sudah habis. Panggil `complete` dengan hasilnya.
    pub fn begin_fetch(&mut self) -> Option<(i64, Option<FeedCursor>)> {
        if self.is_fetching() {
            return None;
        }
        let cursor = if self.cache.is_loaded() {
            Some(self.cache.next_cursor()?)
        } else {
            None
        };
        self.status = FetchStatus::Fetching;
        Some((self.limit, cursor))
    }

    pub fn complete(&mut self, result: Result<FeedPage, ClientError>) {
        match result {
            Ok(page) => {
                debug!("Loaded page with {} projects", page.projects.len());
                self.cache.push_page(page);
                self.status = FetchStatus::Idle;
            }
            Err(e) => {
                warn!("Feed fetch failed: {}", e);
                self.status = FetchStatus::Failed(e.to_string());
            }
        }
    }

    /// Fetch halaman berikutnya (atau pertama). Return `true` kalau request dikirim.
    pub async fn fetch_next<F: PageFetcher + ?Sized>(&mut self, fetcher: &F) -> bool {
        let Some((limit, cursor)) = self.begin_fetch() else {
            return false;
        };
        let result = fetcher.fetch_page(limit, cursor).await;
        self.complete(result);
        true
    }

    /// Buang cache lalu load ulang halaman pertama.
    pub async fn refresh<F: PageFetcher + ?Sized>(&mut self, fetcher: &F) -> bool {
        self.cache.invalidate();
        self.status = FetchStatus::Idle;
        self.fetch_next(fetcher).await
    }

    /// `true` kalau posisi scroll sudah cukup dekat ke ujung list untuk fetch berikutnya.
    pub fn should_fetch(&self, scroll_top: f64, viewport_height: f64, content_height: f64) -> bool {
        if self.is_fetching() || !self.has_more() || content_height <= 0.0 {
            return false;
        }
        (scroll_top + viewport_height) >= content_height * SCROLL_THRESHOLD
    }

    pub async fn on_scroll<F: PageFetcher + ?Sized>(
        &mut self,
        fetcher: &F,
        scroll_top: f64,
        viewport_height: f64,
        content_height: f64,
    ) -> bool {
        if !self.should_fetch(scroll_top, viewport_height, content_height) {
            return false;
        }
        self.fetch_next(fetcher).await
    }

    pub fn render(&self) -> FeedView {
        if !self.cache.is_loaded() {
            return match &self.status {
                FetchStatus::Failed(msg) => FeedView::Error(msg.clone()),
                _ => FeedView::Loading,
            };
        }

        if self.cache.is_empty() {
            return FeedView::Empty;
        }

        FeedView::List {
            cards: self.cache.projects().map(FeedCard::from).collect(),
            has_more: self.has_more(),
            loading_more: self.is_fetching(),
            error: match &self.status {
                FetchStatus::Failed(msg) => Some(msg.clone()),
                _ => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use chrono::{TimeZone, Utc};

    use crate::dtos::feed::FeedUser;

    fn project(n: u128) -> FeedProject {
        FeedProject {
            id: Uuid::from_u128(n),
            title: format!("Project {}", n),
            description: "desc".into(),
            image: None,
            created_at: Utc.with_ymd_and_hms(2023, 3, 9, 10, 0, 0).unwrap(),
            like_count: 0,
            liked_by_me: false,
            user: FeedUser {
                id: Uuid::nil(),
                name: Some("Sari".into()),
                image: None,
            },
        }
    }

    /// Fetcher palsu: list 1..=total dipotong per halaman, cursor inklusif.
    struct FakeFetcher {
        total: u128,
        calls: Mutex<Vec<Option<FeedCursor>>>,
        fail: bool,
    }

    impl FakeFetcher {
        fn new(total: u128) -> Self {
            Self {
                total,
                calls: Mutex::new(Vec::new()),
                fail: false,
            }
        }
    }

    #[async_trait]
    impl PageFetcher for FakeFetcher {
        async fn fetch_page(
            &self,
            limit: i64,
            cursor: Option<FeedCursor>,
        ) -> Result<FeedPage, ClientError> {
            self.calls.lock().unwrap().push(cursor);
            if self.fail {
                return Err(ClientError::Decode("boom".into()));
            }
            let start = cursor.map(|c| c.id.as_u128()).unwrap_or(1);
            let mut rows: Vec<FeedProject> = (start..=self.total)
                .take(limit as usize + 1)
                .map(project)
                .collect();
            let next_cursor = if rows.len() > limit as usize {
                rows.pop().map(|p| p.cursor())
            } else {
                None
            };
            Ok(FeedPage {
                projects: rows,
                next_cursor,
            })
        }
    }

    #[tokio::test]
    async fn loads_pages_until_exhausted() {
        let fetcher = FakeFetcher::new(5);
        let mut list = InfiniteFeedList::new(2);
        assert_eq!(list.render(), FeedView::Loading);

        assert!(list.fetch_next(&fetcher).await);
        assert!(list.fetch_next(&fetcher).await);
        assert!(list.fetch_next(&fetcher).await);
        // sudah habis, tidak ada request lagi
        assert!(!list.fetch_next(&fetcher).await);
        assert_eq!(fetcher.calls.lock().unwrap().len(), 3);

        match list.render() {
            FeedView::List { cards, has_more, loading_more, error } => {
                let ids: Vec<u128> = cards.iter().map(|c| c.id.as_u128()).collect();
                assert_eq!(ids, vec![1, 2, 3, 4, 5]);
                assert!(!has_more);
                assert!(!loading_more);
                assert!(error.is_none());
                assert_eq!(cards[0].date, "3/9/23");
                assert_eq!(cards[0].author_name, "Sari");
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_first_page_renders_empty_state() {
        let fetcher = FakeFetcher::new(0);
        let mut list = InfiniteFeedList::new(10);
        list.fetch_next(&fetcher).await;
        assert_eq!(list.render(), FeedView::Empty);
    }

    #[tokio::test]
    async fn first_page_failure_renders_error() {
        let mut fetcher = FakeFetcher::new(3);
        fetcher.fail = true;
        let mut list = InfiniteFeedList::new(10);
        list.fetch_next(&fetcher).await;
        assert!(matches!(list.render(), FeedView::Error(_)));
    }

    #[test]
    fn only_one_fetch_in_flight() {
        let mut list = InfiniteFeedList::new(2);
        assert_eq!(list.begin_fetch(), Some((2, None)));
        assert!(list.begin_fetch().is_none());
        assert!(list.is_fetching());

        list.complete(Ok(FeedPage {
            projects: vec![project(1), project(2)],
            next_cursor: Some(project(3).cursor()),
        }));
        assert_eq!(list.begin_fetch(), Some((2, Some(project(3).cursor()))));
    }

    #[tokio::test]
    async fn scroll_threshold_triggers_fetch() {
        let fetcher = FakeFetcher::new(10);
        let mut list = InfiniteFeedList::new(3);
        list.fetch_next(&fetcher).await;

        // 50% -> belum
        assert!(!list.on_scroll(&fetcher, 0.0, 500.0, 1000.0).await);
        // 85% -> fetch
        assert!(list.on_scroll(&fetcher, 350.0, 500.0, 1000.0).await);
        assert_eq!(list.cache().len(), 6);
    }

    #[tokio::test]
    async fn refresh_starts_from_first_page() {
        let fetcher = FakeFetcher::new(4);
        let mut list = InfiniteFeedList::new(2);
        list.fetch_next(&fetcher).await;
        list.fetch_next(&fetcher).await;

        assert!(list.refresh(&fetcher).await);
        assert_eq!(list.cache().len(), 2);
        assert_eq!(fetcher.calls.lock().unwrap().last().copied(), Some(None));
    }
}
