use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::bookmarks::repo::Bookmark;

#[derive(Debug, Deserialize)]
pub struct CreateBookmarkRequest {
    pub title: String,
    pub link: String,
    pub description: Option<String>,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Deserialize)]
pub struct EditBookmarkRequest {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BookmarkResponse {
    pub id: Uuid,
    pub title: String,
    pub link: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Bookmark> for BookmarkResponse {
    fn from(b: Bookmark) -> Self {
        Self {
            id: b.id,
            title: b.title,
            link: b.link,
            description: b.description,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}
