use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use ridegate_auth::{AuthorizationPolicy, TokenCodec};
use ridegate_config::{CorsConfig, GatewayConfig};
use ridegate_core::{BcryptHasher, PasswordHasher};
use ridegate_db::{
    InMemoryUserRepository, PgUserRepository, UserRepository, init_db_pool, run_migrations,
};

use crate::middleware::gateway::GatewayFilterChain;
use crate::modules::auth::service::LoginIssuer;
use crate::modules::proxy::service::ProxyService;

/// Everything a request handler can reach. Built once at startup; every
/// field is immutable or internally synchronized.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<GatewayFilterChain>,
    pub login_issuer: Arc<LoginIssuer>,
    pub users: Arc<dyn UserRepository>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub proxy: Arc<ProxyService>,
    pub cors_config: CorsConfig,
}

impl AppState {
    /// # Errors
    ///
    /// Fails on an unknown role in the access rules, if the upstream HTTP
    /// client cannot be built, or if the password hasher is unusable.
    pub fn new(
        config: &GatewayConfig,
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> anyhow::Result<Self> {
        let codec = Arc::new(TokenCodec::from_config(&config.jwt));
        Self::with_codec(config, users, hasher, codec)
    }

    /// Like [`AppState::new`] with a prebuilt codec, e.g. one on a fixed clock.
    pub fn with_codec(
        config: &GatewayConfig,
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        codec: Arc<TokenCodec>,
    ) -> anyhow::Result<Self> {
        let policy = AuthorizationPolicy::from_config(&config.access)
            .context("Invalid access rules")?;
        let proxy =
            ProxyService::from_config(&config.upstream).context("Failed to build HTTP client")?;

        let login_issuer = LoginIssuer::new(
            Arc::clone(&users),
            Arc::clone(&hasher),
            Arc::clone(&codec),
            config.login.credential_lookup_timeout(),
        )
        .context("Failed to prepare login issuer")?;

        Ok(Self {
            gateway: Arc::new(GatewayFilterChain::new(codec, Arc::new(policy))),
            login_issuer: Arc::new(login_issuer),
            users,
            hasher,
            proxy: Arc::new(proxy),
            cors_config: config.cors.clone(),
        })
    }
}

/// Connects the credential store and assembles the state.
///
/// Without `DATABASE_URL` the gateway runs on an in-memory store.
pub async fn init_app_state(config: &GatewayConfig) -> anyhow::Result<AppState> {
    let users: Arc<dyn UserRepository> = match &config.database_url {
        Some(url) => {
            let pool = init_db_pool(url)
                .await
                .context("Failed to connect to database")?;
            run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;
            info!("Connected to PostgreSQL credential store");
            Arc::new(PgUserRepository::new(pool))
        }
        None => {
            warn!("DATABASE_URL is not set; using an in-memory credential store that is lost on restart");
            Arc::new(InMemoryUserRepository::new())
        }
    };

    let hasher = Arc::new(BcryptHasher::new(config.login.password_hash_cost));

    AppState::new(config, users, hasher)
}
