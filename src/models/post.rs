use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tingkat visibilitas project. Feed publik hanya menampilkan `Public`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Invest,
}

impl Visibility {
    /// Status yang tidak boleh muncul di feed, apa pun identitas viewer-nya.
    pub const HIDDEN_FROM_FEED: [Visibility; 2] = [Visibility::Private, Visibility::Invest];

    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "PUBLIC",
            Visibility::Private => "PRIVATE",
            Visibility::Invest => "INVEST",
        }
    }

    pub fn is_listed(&self) -> bool {
        !Self::HIDDEN_FROM_FEED.contains(self)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PUBLIC" => Ok(Visibility::Public),
            "PRIVATE" => Ok(Visibility::Private),
            "INVEST" => Ok(Visibility::Invest),
            other => Err(format!("unknown visibility status: {}", other)),
        }
    }
}

/// Row `projects`, yaitu post/pitch yang dibuat user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub status: Visibility,
    pub user_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub status: Visibility,
    pub user_id: Uuid,
}

impl From<NewProject> for Project {
    fn from(p: NewProject) -> Self {
        Self {
            id: p.id,
            title: p.title,
            description: p.description,
            image: p.image,
            created_at: p.created_at,
            status: p.status,
            user_id: p.user_id,
        }
    }
}

/// Satu baris hasil query feed: project + agregat like + identitas pemilik.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub like_count: i64,
    pub liked_by_me: bool,
    pub user_id: Uuid,
    pub user_name: Option<String>,
    pub user_image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_public_is_listed() {
        assert!(Visibility::Public.is_listed());
        assert!(!Visibility::Private.is_listed());
        assert!(!Visibility::Invest.is_listed());
    }

    #[test]
    fn visibility_round_trips_through_text_column() {
        for v in [Visibility::Public, Visibility::Private, Visibility::Invest] {
            assert_eq!(v.as_str().parse::<Visibility>(), Ok(v));
        }
        assert!("public".parse::<Visibility>().is_err());
    }
}
