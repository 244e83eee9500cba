//! Process-local [`UserRepository`].
//!
//! Used by the test suite and when the gateway starts without a database.
//! Contents are lost on restart.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use ridegate_models::{NewUser, User};

use crate::error::RepositoryError;
use crate::repository::UserRepository;

#[derive(Debug)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
    next_id: AtomicI64,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::with_users(Vec::new())
    }

    /// Seeds the store. New ids continue after the largest seeded id.
    pub fn with_users(users: Vec<User>) -> Self {
        let next_id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        Self {
            users: RwLock::new(users),
            next_id: AtomicI64::new(next_id),
        }
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, RepositoryError> {
        let users = self.users.read().await;
        Ok(users.iter().any(|u| u.username == username))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepositoryError> {
        let users = self.users.read().await;
        Ok(users.iter().any(|u| u.email == email))
    }

    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        // Checked under the write lock so concurrent creates cannot both pass.
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.username == user.username) {
            return Err(RepositoryError::Duplicate { field: "username" });
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::Duplicate { field: "email" });
        }

        let now = Utc::now();
        let stored = User {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            username: user.username,
            password_hash: user.password_hash,
            email: user.email,
            phone: user.phone,
            role: user.role,
            enabled: true,
            created_at: now,
            updated_at: now,
        };
        users.push(stored.clone());

        Ok(stored)
    }
}
