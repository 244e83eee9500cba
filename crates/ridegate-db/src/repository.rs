use async_trait::async_trait;

use ridegate_models::{NewUser, User};

use crate::error::RepositoryError;

/// Storage the login and registration flows depend on.
///
/// Usernames and emails are unique; `create` reports a collision as
/// [`RepositoryError::Duplicate`] even when it loses a race with a
/// concurrent insert.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;

    async fn exists_by_username(&self, username: &str) -> Result<bool, RepositoryError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepositoryError>;

    /// Inserts a user and returns it with id and timestamps assigned.
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError>;
}
