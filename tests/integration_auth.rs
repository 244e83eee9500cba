mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use common::{
    TEST_PASSWORD, TEST_TTL, bearer_request, body_json, build_app, json_request, setup_test_app,
    setup_test_app_with_users, stored_user, test_config,
};
use ridegate::ridegate_auth::Role;
use ridegate::ridegate_db::{RepositoryError, UserRepository};
use ridegate::ridegate_models::{NewUser, User};

const UPSTREAM: &str = "http://127.0.0.1:9";

fn register_body(username: &str, email: &str, role: &str) -> serde_json::Value {
    json!({
        "username": username,
        "password": TEST_PASSWORD,
        "email": email,
        "phone": "+15551234567",
        "role": role
    })
}

#[tokio::test]
async fn test_register_returns_profile_without_password() {
    let app = setup_test_app(UPSTREAM);

    let response = app
        .router
        .oneshot(json_request(
            "POST",
            "/auth/register",
            register_body("dave", "dave@example.com", "DRIVER"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["username"], "dave");
    assert_eq!(body["email"], "dave@example.com");
    assert_eq!(body["phone"], "+15551234567");
    assert_eq!(body["role"], "DRIVER");
    assert!(body["id"].is_i64());
    assert!(body.get("createdAt").is_some());
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());

    let stored = app.users.find_by_username("dave").await.unwrap().unwrap();
    assert_ne!(stored.password_hash, TEST_PASSWORD);
    assert!(stored.enabled);
}

#[tokio::test]
async fn test_register_duplicate_username_conflicts() {
    let app = setup_test_app_with_users(
        UPSTREAM,
        vec![stored_user(1, "dave", Role::Driver, true)],
    );

    let response = app
        .router
        .oneshot(json_request(
            "POST",
            "/auth/register",
            register_body("dave", "other@example.com", "CUSTOMER"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Username already exists" })
    );
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let app = setup_test_app_with_users(
        UPSTREAM,
        vec![stored_user(1, "dave", Role::Driver, true)],
    );

    let response = app
        .router
        .oneshot(json_request(
            "POST",
            "/auth/register",
            register_body("david", "dave@example.com", "CUSTOMER"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Email already exists" })
    );
}

#[tokio::test]
async fn test_register_validation_lists_fields() {
    let app = setup_test_app(UPSTREAM);

    let response = app
        .router
        .oneshot(json_request(
            "POST",
            "/auth/register",
            json!({
                "username": "da",
                "password": "short",
                "email": "not-an-email",
                "role": "CUSTOMER"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Validation failed");
    assert!(body["fields"].get("username").is_some());
    assert!(body["fields"].get("password").is_some());
    assert!(body["fields"].get("email").is_some());
}

#[tokio::test]
async fn test_register_missing_field() {
    let app = setup_test_app(UPSTREAM);

    let response = app
        .router
        .oneshot(json_request(
            "POST",
            "/auth/register",
            json!({
                "username": "dave",
                "password": TEST_PASSWORD,
                "email": "dave@example.com"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["fields"]["role"], "role is required");
}

#[tokio::test]
async fn test_register_admin_is_rejected() {
    let app = setup_test_app(UPSTREAM);

    let response = app
        .router
        .oneshot(json_request(
            "POST",
            "/auth/register",
            register_body("root", "root@example.com", "ADMIN"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["fields"].get("role").is_some());
    assert!(app.users.find_by_username("root").await.unwrap().is_none());
}

#[tokio::test]
async fn test_login_returns_bearer_token() {
    let app = setup_test_app_with_users(
        UPSTREAM,
        vec![stored_user(7, "dave", Role::Driver, true)],
    );

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            json!({ "username": "dave", "password": TEST_PASSWORD }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["tokenType"], "Bearer");
    assert_eq!(body["expiresIn"], TEST_TTL);
    assert_eq!(body["user"]["id"], 7);
    assert_eq!(body["user"]["role"], "DRIVER");
    assert!(body["user"].get("password").is_none());

    let token = body["token"].as_str().unwrap();
    let identity = app.codec.verify(token).unwrap();
    assert_eq!(identity.subject_id(), 7);
    assert_eq!(identity.username(), "dave");
    assert_eq!(identity.role(), Role::Driver);
}

#[tokio::test]
async fn test_login_token_opens_role_path() {
    let upstream = common::spawn_echo_upstream().await;
    let app = setup_test_app_with_users(
        &upstream,
        vec![stored_user(3, "carol", Role::Customer, true)],
    );

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            json!({ "username": "carol", "password": TEST_PASSWORD }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let token = body["token"].as_str().unwrap().to_string();

    let response = app
        .router
        .oneshot(bearer_request("GET", "/api/customer/rides", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let echoed = body_json(response).await;
    assert_eq!(echoed["headers"]["x-user-role"], "CUSTOMER");
    assert_eq!(echoed["headers"]["x-user-id"], "3");
}

#[tokio::test]
async fn test_wrong_password_and_unknown_user_are_indistinguishable() {
    let app = setup_test_app_with_users(
        UPSTREAM,
        vec![stored_user(7, "dave", Role::Driver, true)],
    );

    let wrong_password = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            json!({ "username": "dave", "password": "wrongpassword" }),
        ))
        .await
        .unwrap();
    let unknown_user = app
        .router
        .oneshot(json_request(
            "POST",
            "/auth/login",
            json!({ "username": "nobody", "password": TEST_PASSWORD }),
        ))
        .await
        .unwrap();

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);

    let expected = json!({ "error": "Invalid username or password" });
    assert_eq!(body_json(wrong_password).await, expected);
    assert_eq!(body_json(unknown_user).await, expected);
}

#[tokio::test]
async fn test_disabled_account_looks_like_bad_credentials() {
    let app = setup_test_app_with_users(
        UPSTREAM,
        vec![stored_user(9, "eve", Role::Customer, false)],
    );

    let disabled = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            json!({ "username": "eve", "password": TEST_PASSWORD }),
        ))
        .await
        .unwrap();
    let wrong_password = app
        .router
        .oneshot(json_request(
            "POST",
            "/auth/login",
            json!({ "username": "eve", "password": "wrongpassword" }),
        ))
        .await
        .unwrap();

    assert_eq!(disabled.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);

    let disabled = body_json(disabled).await;
    assert_eq!(disabled, json!({ "error": "Invalid username or password" }));
    assert_eq!(disabled, body_json(wrong_password).await);
}

#[tokio::test]
async fn test_login_empty_fields_rejected() {
    let app = setup_test_app(UPSTREAM);

    let response = app
        .router
        .oneshot(json_request(
            "POST",
            "/auth/login",
            json!({ "username": "", "password": "" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["fields"]["username"], "username is required");
    assert_eq!(body["fields"]["password"], "password is required");
}

/// A store whose lookups never finish in time.
struct SlowRepository;

#[async_trait]
impl UserRepository for SlowRepository {
    async fn find_by_username(&self, _username: &str) -> Result<Option<User>, RepositoryError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(None)
    }

    async fn exists_by_username(&self, _username: &str) -> Result<bool, RepositoryError> {
        Ok(false)
    }

    async fn exists_by_email(&self, _email: &str) -> Result<bool, RepositoryError> {
        Ok(false)
    }

    async fn create(&self, _user: NewUser) -> Result<User, RepositoryError> {
        Err(RepositoryError::Corrupt("read-only".to_string()))
    }
}

#[tokio::test]
async fn test_slow_credential_lookup_is_internal_error() {
    let mut config = test_config(UPSTREAM);
    config.login.credential_lookup_timeout_ms = 50;
    let app = build_app(&config, Arc::new(SlowRepository));

    let response = app
        .router
        .oneshot(json_request(
            "POST",
            "/auth/login",
            json!({ "username": "dave", "password": TEST_PASSWORD }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "An unexpected error occurred" })
    );
}

#[tokio::test]
async fn test_logout_requires_token() {
    let app = setup_test_app(UPSTREAM);

    let request = Request::builder()
        .method("POST")
        .uri("/auth/logout")
        .body(Body::empty())
        .unwrap();
    let response = app.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await, json!({ "error": "Unauthorized" }));
}

#[tokio::test]
async fn test_logout_with_token() {
    let app = setup_test_app(UPSTREAM);
    let token = app.token("dave", 7, Role::Driver);

    let response = app
        .router
        .oneshot(bearer_request("POST", "/auth/logout", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "message": "Logged out successfully" })
    );
}
