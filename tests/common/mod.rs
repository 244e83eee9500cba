#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::extract::Request;
use axum::http::{Response, header};
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::{Value, json};

use ridegate::ridegate_auth::{FixedClock, Role, TokenCodec};
use ridegate::ridegate_config::{GatewayConfig, JwtConfig, UpstreamRoute};
use ridegate::ridegate_core::{BcryptHasher, PasswordHasher};
use ridegate::ridegate_db::{InMemoryUserRepository, UserRepository};
use ridegate::ridegate_models::User;
use ridegate::router::init_router;
use ridegate::state::AppState;

pub const TEST_SECRET: &str = "integration_test_secret_key_0123456789abcdef";
pub const TEST_PASSWORD: &str = "password123";
pub const TEST_TTL: i64 = 3600;
pub const NOW: i64 = 1_700_000_000;

pub struct TestApp {
    pub router: Router,
    pub codec: Arc<TokenCodec>,
    pub clock: Arc<FixedClock>,
    pub users: Arc<dyn UserRepository>,
}

impl TestApp {
    pub fn token(&self, username: &str, user_id: i64, role: Role) -> String {
        self.codec.issue(username, user_id, role).unwrap()
    }
}

/// Cheap hashing so tests stay fast.
pub fn test_hasher() -> BcryptHasher {
    BcryptHasher::new(4)
}

pub fn test_config(upstream: &str) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.jwt = JwtConfig {
        secret: TEST_SECRET.to_string(),
        token_ttl_seconds: TEST_TTL,
    };
    config.upstream.routes = vec![
        UpstreamRoute::new("/api/driver", upstream),
        UpstreamRoute::new("/api/customer", upstream),
        UpstreamRoute::new("/api/rides", upstream),
    ];
    config.upstream.timeout_seconds = 5;
    config.login.password_hash_cost = 4;
    config
}

pub fn build_app(config: &GatewayConfig, users: Arc<dyn UserRepository>) -> TestApp {
    let clock = Arc::new(FixedClock::new(NOW));
    let codec = Arc::new(TokenCodec::with_clock(
        config.jwt.secret.as_bytes(),
        config.jwt.token_ttl_seconds,
        clock.clone(),
    ));
    let state = AppState::with_codec(
        config,
        Arc::clone(&users),
        Arc::new(test_hasher()),
        Arc::clone(&codec),
    )
    .unwrap();

    TestApp {
        router: init_router(state),
        codec,
        clock,
        users,
    }
}

/// App with an empty in-memory store, forwarding to `upstream`.
pub fn setup_test_app(upstream: &str) -> TestApp {
    build_app(
        &test_config(upstream),
        Arc::new(InMemoryUserRepository::new()),
    )
}

/// App whose store already holds `users`.
pub fn setup_test_app_with_users(upstream: &str, users: Vec<User>) -> TestApp {
    build_app(
        &test_config(upstream),
        Arc::new(InMemoryUserRepository::with_users(users)),
    )
}

pub fn stored_user(id: i64, username: &str, role: Role, enabled: bool) -> User {
    let now = chrono::Utc::now();
    User {
        id,
        username: username.to_string(),
        password_hash: test_hasher().hash(TEST_PASSWORD).unwrap(),
        email: format!("{username}@example.com"),
        phone: None,
        role,
        enabled,
        created_at: now,
        updated_at: now,
    }
}

/// Starts a downstream service that echoes what it received as JSON.
pub async fn spawn_echo_upstream() -> String {
    let app = Router::new().fallback(echo);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// An address nothing listens on.
pub async fn dead_upstream() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

async fn echo(req: Request) -> Json<Value> {
    let (parts, body) = req.into_parts();
    let body = to_bytes(body, usize::MAX).await.unwrap_or_default();

    let headers: serde_json::Map<String, Value> = parts
        .headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                json!(value.to_str().unwrap_or_default()),
            )
        })
        .collect();
    let roles: Vec<&str> = parts
        .headers
        .get_all("x-user-role")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();

    Json(json!({
        "method": parts.method.as_str(),
        "path": parts.uri.path(),
        "query": parts.uri.query(),
        "headers": headers,
        "x_user_role_values": roles,
        "body": String::from_utf8_lossy(&body),
    }))
}

pub fn json_request(method: &str, uri: &str, body: Value) -> axum::http::Request<Body> {
    axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

pub fn bearer_request(method: &str, uri: &str, token: &str) -> axum::http::Request<Body> {
    axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}
