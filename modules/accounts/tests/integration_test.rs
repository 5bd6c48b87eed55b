use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tower::ServiceExt;

use accounts::{
    api::rest::dto::{LoginResp, RegisterResp},
    contract::model::NewUser,
    domain::error::DomainError,
    domain::service::{Service, ServiceConfig},
    infra::storage::migrations::Migrator,
};
use auth::TokenIssuer;

/// Create a fresh test database for each test
async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

fn test_issuer() -> Arc<TokenIssuer> {
    Arc::new(TokenIssuer::new("test-secret", Duration::from_secs(3600)))
}

/// Create a test domain service
async fn create_test_service() -> Arc<Service> {
    let db = create_test_db().await;
    Arc::new(Service::new(db, test_issuer(), ServiceConfig::default()))
}

/// Create a test HTTP router
async fn create_test_router() -> Router {
    let service = create_test_service().await;
    accounts::api::rest::routes::router(service)
}

fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_register_and_login_flow() -> Result<()> {
    let service = create_test_service().await;

    let user = service
        .register(NewUser {
            username: "alice".to_string(),
            password: "s3cret".to_string(),
        })
        .await?;
    assert_eq!(user.username, "alice");

    let outcome = service.login("alice", "s3cret").await?;
    assert_eq!(outcome.user.id, user.id);
    assert!(!outcome.token.is_empty());

    // The token verifies against the same issuer and carries the user id
    assert_eq!(test_issuer().verify(&outcome.token)?, user.id);

    Ok(())
}

#[tokio::test]
async fn test_duplicate_username_is_a_conflict() -> Result<()> {
    let service = create_test_service().await;

    let new_user = NewUser {
        username: "bob".to_string(),
        password: "s3cret".to_string(),
    };
    service.register(new_user.clone()).await?;

    let result = service.register(new_user).await;
    assert!(matches!(result, Err(DomainError::UsernameTaken { .. })));

    Ok(())
}

#[tokio::test]
async fn test_wrong_password_is_rejected() -> Result<()> {
    let service = create_test_service().await;

    service
        .register(NewUser {
            username: "carol".to_string(),
            password: "correct-pw".to_string(),
        })
        .await?;

    let result = service.login("carol", "wrong-pw").await;
    assert!(matches!(result, Err(DomainError::InvalidCredentials)));

    // Unknown usernames produce the same error (no user enumeration)
    let result = service.login("nobody", "whatever").await;
    assert!(matches!(result, Err(DomainError::InvalidCredentials)));

    Ok(())
}

#[tokio::test]
async fn test_registration_validation() -> Result<()> {
    let service = create_test_service().await;

    let result = service
        .register(NewUser {
            username: "  ".to_string(),
            password: "s3cret".to_string(),
        })
        .await;
    assert!(matches!(result, Err(DomainError::MissingCredentials)));

    let result = service
        .register(NewUser {
            username: "dave".to_string(),
            password: "abc".to_string(),
        })
        .await;
    assert!(matches!(result, Err(DomainError::PasswordTooShort { .. })));

    let result = service
        .register(NewUser {
            username: "x".repeat(65),
            password: "s3cret".to_string(),
        })
        .await;
    assert!(matches!(result, Err(DomainError::UsernameTooLong { .. })));

    Ok(())
}

#[tokio::test]
async fn test_http_register_created() {
    let router = create_test_router().await;

    let response = router
        .oneshot(json_request(
            "/register",
            serde_json::json!({"username": "alice", "password": "s3cret"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: RegisterResp = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(body.message, "User registered successfully");
}

#[tokio::test]
async fn test_http_register_missing_fields() {
    let router = create_test_router().await;

    let response = router
        .oneshot(json_request(
            "/register",
            serde_json::json!({"username": "alice"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn test_http_register_conflict() {
    let router = create_test_router().await;
    let req = serde_json::json!({"username": "alice", "password": "s3cret"});

    let response = router
        .clone()
        .oneshot(json_request("/register", req.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = router.oneshot(json_request("/register", req)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("alice"));
}

#[tokio::test]
async fn test_http_login() {
    let router = create_test_router().await;

    let response = router
        .clone()
        .oneshot(json_request(
            "/register",
            serde_json::json!({"username": "erin", "password": "s3cret"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Correct password: 200 with a token
    let response = router
        .clone()
        .oneshot(json_request(
            "/login",
            serde_json::json!({"username": "erin", "password": "s3cret"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: LoginResp = serde_json::from_value(body_json(response).await).unwrap();
    assert!(test_issuer().verify(&body.token).is_ok());

    // Wrong password: 401
    let response = router
        .oneshot(json_request(
            "/login",
            serde_json::json!({"username": "erin", "password": "nope"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
