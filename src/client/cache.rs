use uuid::Uuid;

use crate::dtos::feed::{FeedCursor, FeedPage, FeedProject, FeedUser};
use crate::models::post::Project;

/// Cache halaman feed di client, urutan sama dengan urutan fetch.
#[derive(Debug, Clone, Default)]
pub struct FeedCache {
    pages: Vec<FeedPage>,
}

impl FeedCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> &[FeedPage] {
        &self.pages
    }

    pub fn is_loaded(&self) -> bool {
        !self.pages.is_empty()
    }

    pub fn projects(&self) -> impl Iterator<Item = &FeedProject> {
        self.pages.iter().flat_map(|p| p.projects.iter())
    }

    pub fn len(&self) -> usize {
        self.pages.iter().map(|p| p.projects.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cursor untuk halaman berikutnya, `None` kalau belum ada halaman atau sudah habis.
    pub fn next_cursor(&self) -> Option<FeedCursor> {
        self.pages.last().and_then(|p| p.next_cursor)
    }

    pub fn has_more(&self) -> bool {
        self.next_cursor().is_some()
    }

    pub fn push_page(&mut self, page: FeedPage) {
        self.pages.push(page);
    }

    /// Patch optimistik setelah create: taruh project baru di depan halaman pertama
    /// dengan like 0 dan identitas author dari session. Tidak melakukan apa-apa
    /// (return `false`) kalau halaman pertama belum pernah di-fetch.
    pub fn prepend_created(&mut self, project: &Project, author: &FeedUser) -> bool {
        let Some(first) = self.pages.first_mut() else {
            return false;
        };

        first.projects.insert(
            0,
            FeedProject {
                id: project.id,
                title: project.title.clone(),
                description: project.description.clone(),
                image: project.image.clone(),
                created_at: project.created_at,
                like_count: 0,
                liked_by_me: false,
                user: author.clone(),
            },
        );
        true
    }

    /// Patch setelah toggle like: update count dan flag di semua halaman.
    pub fn apply_like(&mut self, project_id: Uuid, added_like: bool) {
        let delta = if added_like { 1 } else { -1 };
        for project in self
            .pages
            .iter_mut()
            .flat_map(|p| p.projects.iter_mut())
            .filter(|p| p.id == project_id)
        {
            project.like_count = (project.like_count + delta).max(0);
            project.liked_by_me = added_like;
        }
    }

    /// Buang semua halaman; renderer akan fetch ulang dari awal.
    pub fn invalidate(&mut self) {
        self.pages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    use crate::models::post::Visibility;

    fn feed_project(n: u128) -> FeedProject {
        FeedProject {
            id: Uuid::from_u128(n),
            title: format!("Project {}", n),
            description: "desc".into(),
            image: None,
            created_at: Utc::now() - Duration::minutes(n as i64),
            like_count: 3,
            liked_by_me: false,
            user: FeedUser {
                id: Uuid::nil(),
                name: Some("Someone".into()),
                image: None,
            },
        }
    }

    fn two_pages() -> FeedCache {
        let mut cache = FeedCache::new();
        cache.push_page(FeedPage {
            projects: vec![feed_project(1), feed_project(2)],
            next_cursor: Some(feed_project(3).cursor()),
        });
        cache.push_page(FeedPage {
            projects: vec![feed_project(3)],
            next_cursor: None,
        });
        cache
    }

    fn created() -> Project {
        Project {
            id: Uuid::from_u128(99),
            title: "New pitch".into(),
            description: "Just launched".into(),
            image: None,
            created_at: Utc::now(),
            status: Visibility::Public,
            user_id: Uuid::from_u128(7),
        }
    }

    #[test]
    fn prepend_goes_to_first_page_only() {
        let mut cache = two_pages();
        let me = FeedUser {
            id: Uuid::from_u128(7),
            name: Some("Me".into()),
            image: None,
        };

        assert!(cache.prepend_created(&created(), &me));

        let first = &cache.pages()[0];
        assert_eq!(first.projects.len(), 3);
        assert_eq!(first.projects[0].id, Uuid::from_u128(99));
        assert_eq!(first.projects[0].like_count, 0);
        assert!(!first.projects[0].liked_by_me);
        assert_eq!(first.projects[0].user, me);
        // cursor halaman pertama tidak berubah
        assert_eq!(first.next_cursor.unwrap().id, Uuid::from_u128(3));
        assert_eq!(cache.pages()[1].projects.len(), 1);
    }

    #[test]
    fn prepend_without_pages_is_noop() {
        let mut cache = FeedCache::new();
        let me = FeedUser {
            id: Uuid::nil(),
            name: None,
            image: None,
        };
        assert!(!cache.prepend_created(&created(), &me));
        assert!(cache.is_empty());
    }

    #[test]
    fn like_patch_updates_matching_project() {
        let mut cache = two_pages();
        cache.apply_like(Uuid::from_u128(3), true);
        let p = cache.projects().find(|p| p.id == Uuid::from_u128(3)).unwrap();
        assert_eq!(p.like_count, 4);
        assert!(p.liked_by_me);

        cache.apply_like(Uuid::from_u128(3), false);
        let p = cache.projects().find(|p| p.id == Uuid::from_u128(3)).unwrap();
        assert_eq!(p.like_count, 3);
        assert!(!p.liked_by_me);
    }

    #[test]
    fn has_more_follows_last_page() {
        let mut cache = two_pages();
        assert!(!cache.has_more());
        assert_eq!(cache.len(), 3);

        cache.invalidate();
        assert!(!cache.is_loaded());
        assert!(cache.next_cursor().is_none());
    }
}
