//! # Ridegate DB
//!
//! Credential store for the ridegate gateway.
//!
//! The gateway only needs four things from storage, captured by
//! [`UserRepository`]. Two implementations exist:
//!
//! - [`PgUserRepository`]: PostgreSQL via SQLx, used when `DATABASE_URL` is set
//! - [`InMemoryUserRepository`]: process-local, for tests and local runs
//!
//! # Example
//!
//! ```ignore
//! use ridegate_db::{init_db_pool, run_migrations, PgUserRepository};
//!
//! let pool = init_db_pool(&database_url).await?;
//! run_migrations(&pool).await?;
//! let users = PgUserRepository::new(pool);
//! ```

pub mod error;
pub mod memory;
pub mod postgres;
pub mod repository;

pub use error::RepositoryError;
pub use memory::InMemoryUserRepository;
pub use postgres::PgUserRepository;
pub use repository::UserRepository;

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Connects to PostgreSQL.
///
/// The returned pool is cheaply cloneable; build it once at startup.
///
/// # Errors
///
/// Returns the underlying [`sqlx::Error`] if the connection cannot be made.
pub async fn init_db_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPool::connect(database_url).await
}

/// Applies the bundled migrations. Already-applied migrations are skipped.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
