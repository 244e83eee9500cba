use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A uniqueness constraint rejected the write. `field` is `"username"` or `"email"`.
    #[error("{field} already exists")]
    Duplicate { field: &'static str },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row could not be turned into a [`User`](ridegate_models::User).
    #[error("corrupt user record: {0}")]
    Corrupt(String),
}
