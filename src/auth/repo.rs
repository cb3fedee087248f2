use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::repo_types::{NewUser, User};

#[derive(Debug, Error)]
pub enum CreateUserError {
    #[error("email {0} is already registered")]
    DuplicateEmail(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    /// Fails with `DuplicateEmail` when the email is taken, even if a lookup just missed it.
    async fn create(&self, new: NewUser<'_>) -> Result<User, CreateUserError>;
    /// Returns whether a user was removed.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}

pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, avatar, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, avatar, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find user by id")?;
        Ok(user)
    }

    async fn create(&self, new: NewUser<'_>) -> Result<User, CreateUserError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash, avatar)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password_hash, avatar, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.name)
        .bind(new.email)
        .bind(new.password_hash)
        .bind(new.avatar)
        .fetch_one(&self.db)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                CreateUserError::DuplicateEmail(new.email.to_string())
            }
            e => anyhow::Error::new(e).context("insert user").into(),
        })?;
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete user")?;
        Ok(res.rows_affected() > 0)
    }
}

#[derive(Default)]
pub struct MemoryUserRepo {
    users: RwLock<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserRepo for MemoryUserRepo {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn create(&self, new: NewUser<'_>) -> Result<User, CreateUserError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == new.email) {
            return Err(CreateUserError::DuplicateEmail(new.email.to_string()));
        }
        let user = User {
            id: Uuid::new_v4(),
            name: new.name.to_string(),
            email: new.email.to_string(),
            password_hash: new.password_hash.to_string(),
            avatar: new.avatar.map(str::to_string),
            created_at: OffsetDateTime::now_utc(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        Ok(self.users.write().await.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user<'a>(email: &'a str) -> NewUser<'a> {
        NewUser {
            name: "Ada",
            email,
            password_hash: "$argon2id$stub",
            avatar: None,
        }
    }

    #[tokio::test]
    async fn memory_repo_create_find_delete() {
        let repo = MemoryUserRepo::default();
        let user = repo.create(new_user("ada@example.com")).await.unwrap();

        let by_email = repo.find_by_email("ada@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
        assert!(repo.find_by_id(user.id).await.unwrap().is_some());

        assert!(repo.delete(user.id).await.unwrap());
        assert!(!repo.delete(user.id).await.unwrap());
        assert!(repo.find_by_id(user.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn memory_repo_rejects_duplicate_email() {
        let repo = MemoryUserRepo::default();
        repo.create(new_user("dup@example.com")).await.unwrap();
        let err = repo.create(new_user("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, CreateUserError::DuplicateEmail(ref e) if e == "dup@example.com"));
    }

    #[test]
    fn password_hash_is_not_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password_hash: "secret-hash".into(),
            avatar: None,
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("ada@example.com"));
    }
}
