use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::repo_types::{Profile, ProfileRow};

#[async_trait]
pub trait ProfileRepo: Send + Sync {
    async fn find_by_user(&self, user_id: Uuid) -> anyhow::Result<Option<Profile>>;
    async fn list(&self) -> anyhow::Result<Vec<Profile>>;
    /// Inserts the profile or replaces the stored one for the same user.
    async fn upsert(&self, profile: &Profile) -> anyhow::Result<()>;
    async fn delete_by_user(&self, user_id: Uuid) -> anyhow::Result<bool>;
}

pub struct PgProfileRepo {
    db: PgPool,
}

impl PgProfileRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileRepo for PgProfileRepo {
    async fn find_by_user(&self, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT user_id, company, website, location, status, skills, bio,
                   github_username, experience, education, social, date
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .context("find profile")?;
        Ok(row.map(Profile::from))
    }

    async fn list(&self) -> anyhow::Result<Vec<Profile>> {
        let rows = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT user_id, company, website, location, status, skills, bio,
                   github_username, experience, education, social, date
            FROM profiles
            ORDER BY date DESC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list profiles")?;
        Ok(rows.into_iter().map(Profile::from).collect())
    }

    async fn upsert(&self, p: &Profile) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, company, website, location, status, skills, bio,
                                  github_username, experience, education, social, date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (user_id) DO UPDATE
               SET company = EXCLUDED.company,
                   website = EXCLUDED.website,
                   location = EXCLUDED.location,
                   status = EXCLUDED.status,
                   skills = EXCLUDED.skills,
                   bio = EXCLUDED.bio,
                   github_username = EXCLUDED.github_username,
                   experience = EXCLUDED.experience,
                   education = EXCLUDED.education,
                   social = EXCLUDED.social
            "#,
        )
        .bind(p.user)
        .bind(&p.company)
        .bind(&p.website)
        .bind(&p.location)
        .bind(&p.status)
        .bind(&p.skills)
        .bind(&p.bio)
        .bind(&p.github_username)
        .bind(Json(&p.experience))
        .bind(Json(&p.education))
        .bind(Json(&p.social))
        .bind(p.date)
        .execute(&self.db)
        .await
        .with_context(|| format!("upsert profile for {}", p.user))?;
        Ok(())
    }

    async fn delete_by_user(&self, user_id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await
            .context("delete profile")?;
        Ok(res.rows_affected() > 0)
    }
}

#[derive(Default)]
pub struct MemoryProfileRepo {
    profiles: RwLock<HashMap<Uuid, Profile>>,
}

#[async_trait]
impl ProfileRepo for MemoryProfileRepo {
    async fn find_by_user(&self, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
        Ok(self.profiles.read().await.get(&user_id).cloned())
    }

    async fn list(&self) -> anyhow::Result<Vec<Profile>> {
        let mut all: Vec<Profile> = self.profiles.read().await.values().cloned().collect();
        all.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(all)
    }

    async fn upsert(&self, profile: &Profile) -> anyhow::Result<()> {
        self.profiles
            .write()
            .await
            .insert(profile.user, profile.clone());
        Ok(())
    }

    async fn delete_by_user(&self, user_id: Uuid) -> anyhow::Result<bool> {
        Ok(self.profiles.write().await.remove(&user_id).is_some())
    }
}
