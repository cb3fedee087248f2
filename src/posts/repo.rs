use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::repo_types::{Post, PostRow};

/// Post documents are read and written whole; concurrent writers race and
/// the last save wins.
#[async_trait]
pub trait PostRepo: Send + Sync {
    async fn insert(&self, post: &Post) -> anyhow::Result<()>;
    /// All posts, newest first.
    async fn list_recent(&self) -> anyhow::Result<Vec<Post>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Post>>;
    /// Overwrites text, likes and comments of an existing post.
    async fn save(&self, post: &Post) -> anyhow::Result<()>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
    async fn delete_by_user(&self, user_id: Uuid) -> anyhow::Result<u64>;
}

pub struct PgPostRepo {
    db: PgPool,
}

impl PgPostRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostRepo for PgPostRepo {
    async fn insert(&self, post: &Post) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, user_id, text, name, avatar, likes, comments, date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(post.id)
        .bind(post.user)
        .bind(&post.text)
        .bind(&post.name)
        .bind(&post.avatar)
        .bind(Json(&post.likes))
        .bind(Json(&post.comments))
        .bind(post.date)
        .execute(&self.db)
        .await
        .context("insert post")?;
        Ok(())
    }

    async fn list_recent(&self) -> anyhow::Result<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, user_id, text, name, avatar, likes, comments, date
            FROM posts
            ORDER BY date DESC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list posts")?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, user_id, text, name, avatar, likes, comments, date
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find post")?;
        Ok(row.map(Post::from))
    }

    async fn save(&self, post: &Post) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE posts
               SET text = $2, likes = $3, comments = $4
             WHERE id = $1
            "#,
        )
        .bind(post.id)
        .bind(&post.text)
        .bind(Json(&post.likes))
        .bind(Json(&post.comments))
        .execute(&self.db)
        .await
        .with_context(|| format!("save post {}", post.id))?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete post")?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete_by_user(&self, user_id: Uuid) -> anyhow::Result<u64> {
        let res = sqlx::query("DELETE FROM posts WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await
            .context("delete posts by user")?;
        Ok(res.rows_affected())
    }
}

#[derive(Default)]
pub struct MemoryPostRepo {
    posts: RwLock<HashMap<Uuid, Post>>,
}

#[async_trait]
impl PostRepo for MemoryPostRepo {
    async fn insert(&self, post: &Post) -> anyhow::Result<()> {
        let mut posts = self.posts.write().await;
        anyhow::ensure!(!posts.contains_key(&post.id), "duplicate post id {}", post.id);
        posts.insert(post.id, post.clone());
        Ok(())
    }

    async fn list_recent(&self) -> anyhow::Result<Vec<Post>> {
        let mut all: Vec<Post> = self.posts.read().await.values().cloned().collect();
        all.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(all)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Post>> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn save(&self, post: &Post) -> anyhow::Result<()> {
        // a post deleted concurrently stays deleted
        if let Some(stored) = self.posts.write().await.get_mut(&post.id) {
            stored.text = post.text.clone();
            stored.likes = post.likes.clone();
            stored.comments = post.comments.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        Ok(self.posts.write().await.remove(&id).is_some())
    }

    async fn delete_by_user(&self, user_id: Uuid) -> anyhow::Result<u64> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|_, p| p.user != user_id);
        Ok((before - posts.len()) as u64)
    }
}
