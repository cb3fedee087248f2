use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

/// A user's approval marker; at most one per user per post or comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub user: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub user: Uuid,
    pub text: String,
    pub name: String,
    pub avatar: Option<String>,
    #[serde(default)]
    pub likes: Vec<Like>,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

/// A post document: likes and comments (newest first) travel with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user: Uuid,
    pub text: String,
    pub name: String,
    pub avatar: Option<String>,
    pub likes: Vec<Like>,
    pub comments: Vec<Comment>,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

#[derive(Debug, FromRow)]
pub struct PostRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub name: String,
    pub avatar: Option<String>,
    pub likes: Json<Vec<Like>>,
    pub comments: Json<Vec<Comment>>,
    pub date: OffsetDateTime,
}

impl From<PostRow> for Post {
    fn from(r: PostRow) -> Self {
        Self {
            id: r.id,
            user: r.user_id,
            text: r.text,
            name: r.name,
            avatar: r.avatar,
            likes: r.likes.0,
            comments: r.comments.0,
            date: r.date,
        }
    }
}
