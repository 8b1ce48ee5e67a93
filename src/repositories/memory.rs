use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{FeedRepository, ProfileRepository, RepoError, UserRepository};
use crate::dtos::feed::FeedCursor;
use crate::models::post::{FeedRow, NewProject, Project};
use crate::models::profile::{Profile, ProfileFields};
use crate::models::user::{NewUser, Role, User};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    profiles: HashMap<Uuid, Profile>,
    projects: HashMap<Uuid, Project>,
    // (project_id, user_id)
    likes: BTreeSet<(Uuid, Uuid)>,
}

/// Storage in-process, dipakai untuk `STORAGE=memory` dan test.
/// Semantik sama dengan `PgStore`; satu `RwLock` menggantikan transaksi.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set nama dan foto user, seperti yang dilakukan OAuth provider.
    pub async fn set_user_identity(&self, user_id: Uuid, name: Option<String>, image: Option<String>) {
        let mut tables = self.tables.write().await;
        if let Some(user) = tables.users.get_mut(&user_id) {
            user.name = name;
            user.image = image;
        }
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(RepoError::Conflict("User already exist".to_string()));
        }

        let stored = User {
            id: user.id,
            email: user.email,
            name: None,
            image: None,
            password_hash: Some(user.password_hash),
            role: user.role,
            created_at: user.created_at,
        };
        tables.users.insert(stored.id, stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Profile>, RepoError> {
        Ok(self.tables.read().await.profiles.get(&user_id).cloned())
    }

    async fn upsert_with_role(
        &self,
        user_id: Uuid,
        role: Role,
        fields: ProfileFields,
    ) -> Result<Profile, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(RepoError::NotFound);
        }

        let taken = tables
            .profiles
            .values()
            .any(|p| p.user_id != user_id && p.username == fields.username);
        if taken {
            return Err(RepoError::Conflict("Username already taken".to_string()));
        }

        let id = tables
            .profiles
            .get(&user_id)
            .map(|p| p.id)
            .unwrap_or_else(Uuid::new_v4);
        let profile = Profile::from_fields(id, user_id, fields, Utc::now());
        tables.profiles.insert(user_id, profile.clone());

        if let Some(user) = tables.users.get_mut(&user_id) {
            user.role = role;
        }
        Ok(profile)
    }
}

#[async_trait]
impl FeedRepository for MemoryStore {
    async fn list_feed(
        &self,
        viewer: Option<Uuid>,
        cursor: Option<FeedCursor>,
        take: i64,
    ) -> Result<Vec<FeedRow>, RepoError> {
        let tables = self.tables.read().await;

        let mut visible: Vec<&Project> = tables
            .projects
            .values()
            .filter(|p| p.status.is_listed())
            .filter(|p| match cursor {
                Some(c) => (p.created_at, p.id) <= (c.created_at, c.id),
                None => true,
            })
            .collect();
        visible.sort_by_key(|p| Reverse((p.created_at, p.id)));

        let take = usize::try_from(take).unwrap_or(0);
        let rows = visible
            .into_iter()
            .take(take)
            .map(|p| {
                let owner = tables.users.get(&p.user_id);
                let like_count = tables
                    .likes
                    .range((p.id, Uuid::nil())..=(p.id, Uuid::from_u128(u128::MAX)))
                    .count() as i64;
                FeedRow {
                    id: p.id,
                    title: p.title.clone(),
                    description: p.description.clone(),
                    image: p.image.clone(),
                    created_at: p.created_at,
                    like_count,
                    liked_by_me: viewer.is_some_and(|v| tables.likes.contains(&(p.id, v))),
                    user_id: p.user_id,
                    user_name: owner.and_then(|u| u.name.clone()),
                    user_image: owner.and_then(|u| u.image.clone()),
                }
            })
            .collect();
        Ok(rows)
    }

    async fn insert_project(&self, project: NewProject) -> Result<Project, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&project.user_id) {
            return Err(RepoError::NotFound);
        }
        let stored: Project = project.into();
        tables.projects.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, RepoError> {
        Ok(self.tables.read().await.projects.get(&id).cloned())
    }

    async fn toggle_like(&self, project_id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.projects.contains_key(&project_id) {
            return Err(RepoError::NotFound);
        }
        if tables.likes.remove(&(project_id, user_id)) {
            Ok(false)
        } else {
            tables.likes.insert((project_id, user_id));
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::post::Visibility;
    use chrono::{DateTime, Duration, TimeZone};

    async fn seed_user(store: &MemoryStore, email: &str) -> Uuid {
        let user = store
            .insert(NewUser {
                id: Uuid::new_v4(),
                email: email.to_string(),
                password_hash: "hash".to_string(),
                role: Role::Entrepreneur,
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        user.id
    }

    fn project(user_id: Uuid, id: Uuid, created_at: DateTime<Utc>, status: Visibility) -> NewProject {
        NewProject {
            id,
            title: "Pitch".to_string(),
            description: "desc".to_string(),
            image: None,
            created_at,
            status,
            user_id,
        }
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryStore::new();
        seed_user(&store, "a@b.co").await;
        let err = store
            .insert(NewUser {
                id: Uuid::new_v4(),
                email: "a@b.co".to_string(),
                password_hash: "other".to_string(),
                role: Role::Investor,
                created_at: Utc::now(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Conflict(_)));
    }

    #[tokio::test]
    async fn same_timestamp_breaks_tie_on_id() {
        let store = MemoryStore::new();
        let owner = seed_user(&store, "owner@b.co").await;
        let ts = Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap();

        let low = Uuid::from_u128(1);
        let high = Uuid::from_u128(2);
        store.insert_project(project(owner, low, ts, Visibility::Public)).await.unwrap();
        store.insert_project(project(owner, high, ts, Visibility::Public)).await.unwrap();

        let rows = store.list_feed(None, None, 10).await.unwrap();
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![high, low]);

        // cursor inklusif: resume di `low` mengembalikan `low` saja
        let cursor = FeedCursor { id: low, created_at: ts };
        let rows = store.list_feed(None, Some(cursor), 10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, low);
    }

    #[tokio::test]
    async fn hidden_projects_are_filtered() {
        let store = MemoryStore::new();
        let owner = seed_user(&store, "owner@b.co").await;
        let now = Utc::now();
        store
            .insert_project(project(owner, Uuid::new_v4(), now, Visibility::Private))
            .await
            .unwrap();
        store
            .insert_project(project(owner, Uuid::new_v4(), now - Duration::seconds(1), Visibility::Invest))
            .await
            .unwrap();
        let public = Uuid::new_v4();
        store
            .insert_project(project(owner, public, now - Duration::seconds(2), Visibility::Public))
            .await
            .unwrap();

        let rows = store.list_feed(Some(owner), None, 10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, public);
    }

    #[tokio::test]
    async fn like_toggle_counts_per_project() {
        let store = MemoryStore::new();
        let owner = seed_user(&store, "owner@b.co").await;
        let fan = seed_user(&store, "fan@b.co").await;
        let pid = Uuid::new_v4();
        store.insert_project(project(owner, pid, Utc::now(), Visibility::Public)).await.unwrap();

        assert!(store.toggle_like(pid, fan).await.unwrap());
        assert!(store.toggle_like(pid, owner).await.unwrap());

        let rows = store.list_feed(Some(fan), None, 10).await.unwrap();
        assert_eq!(rows[0].like_count, 2);
        assert!(rows[0].liked_by_me);

        assert!(!store.toggle_like(pid, fan).await.unwrap());
        let rows = store.list_feed(Some(fan), None, 10).await.unwrap();
        assert_eq!(rows[0].like_count, 1);
        assert!(!rows[0].liked_by_me);
    }

    #[tokio::test]
    async fn upsert_keeps_profile_id_and_sets_role() {
        let store = MemoryStore::new();
        let user_id = seed_user(&store, "inv@b.co").await;
        let fields = ProfileFields {
            username: "inv".into(),
            name: "Investor".into(),
            phone: "1".into(),
            address: "a".into(),
            city: "c".into(),
            country: "id".into(),
            post_code: None,
            biography: "b".into(),
            interest: "i".into(),
            skills: "s".into(),
        };

        let first = store.upsert_with_role(user_id, Role::Investor, fields.clone()).await.unwrap();
        let mut changed = fields;
        changed.city = "Jakarta".into();
        let second = store.upsert_with_role(user_id, Role::Investor, changed).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.city, "Jakarta");
        let user = store.find_by_id(user_id).await.unwrap().unwrap();
        assert_eq!(user.role, Role::Investor);
    }

    #[tokio::test]
    async fn upsert_for_missing_user_is_not_found() {
        let store = MemoryStore::new();
        let fields = ProfileFields {
            username: "ghost".into(),
            name: String::new(),
            phone: String::new(),
            address: String::new(),
            city: String::new(),
            country: String::new(),
            post_code: None,
            biography: String::new(),
            interest: String::new(),
            skills: String::new(),
        };
        let err = store
            .upsert_with_role(Uuid::new_v4(), Role::Entrepreneur, fields)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound));
    }
}
