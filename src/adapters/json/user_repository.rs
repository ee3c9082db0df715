use crate::domain::{User, UserId};
use crate::ports::user_repository::{Result, UserRepository as UserRepositoryTrait};
use async_trait::async_trait;
use std::path::PathBuf;

use super::store::{IdFormat, JsonStore};

const USER_ID: IdFormat = IdFormat::new("USER", 1_000_000);

/// UserRepositoryのJSONファイル実装（users.json）
pub struct UserRepository {
    store: JsonStore<User>,
}

impl UserRepository {
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            store: JsonStore::open(path, USER_ID).await,
        }
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    async fn save(&self, user: &mut User) -> Result<()> {
        self.store.save(user).await
    }

    async fn find_by_id(&self, user_id: &UserId) -> Option<User> {
        self.store.get(user_id.as_str()).await
    }

    async fn find_by_email(&self, email: &str) -> Option<User> {
        self.store.find(|user| user.email == email).await
    }

    async fn find_all(&self) -> Vec<User> {
        self.store.values().await
    }

    async fn delete(&self, user_id: &UserId) -> Result<bool> {
        self.store.remove(user_id.as_str()).await
    }
}
