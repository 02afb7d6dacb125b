//! Registration, login, logout and profile through the HTTP surface.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn test_register_login_profile_logout() {
    let app = TestApp::new();

    let (status, body) = app.register("Ann", "ann@x.com", "secret1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["data"]["name"], "Ann");
    assert_eq!(body["data"]["email"], "ann@x.com");
    assert!(body["data"].get("password").is_none());
    assert!(body["data"].get("password_hash").is_none());

    let (status, body) = app.login("ann@x.com", "secret1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["token_type"], "bearer");
    assert_eq!(body["expires_in"], 3600);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = app.send(Method::GET, "/api/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "ann@x.com");

    let (status, body) = app.send(Method::POST, "/api/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "message": "User has been logged out"}));

    let (status, body) = app.send(Method::GET, "/api/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_logout_only_revokes_the_presented_token() {
    let app = TestApp::new();
    let first = app.signed_in("Ann", "ann@x.com").await;
    let (_, body) = app.login("ann@x.com", "secret1").await;
    let second = body["token"].as_str().unwrap().to_string();

    let (status, _) = app.send(Method::POST, "/api/logout", Some(&first), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send(Method::GET, "/api/profile", Some(&second), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let app = TestApp::new();
    app.register("Ann", "ann@x.com", "secret1").await;

    let (status, body) = app.register("Impostor", "ann@x.com", "secret2").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["email"][0], "The email has already been taken.");
}

#[tokio::test]
async fn test_duplicate_email_reported_alongside_other_failures() {
    let app = TestApp::new();
    app.register("Ann", "ann@x.com", "secret1").await;

    let (status, body) = app.register("Impostor", "ann@x.com", "abc").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["email"][0], "The email has already been taken.");
    assert_eq!(body["error"]["password"][0], "The password must be at least 6 characters.");
    assert_eq!(app.repos.users.count(), 1);
}

#[tokio::test]
async fn test_register_trims_name_and_email() {
    let app = TestApp::new();

    let (status, body) = app.register("  Ann  ", " ann@x.com ", "secret1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Ann");
    assert_eq!(body["data"]["email"], "ann@x.com");

    let (status, body) = app.register("Bob", "ann@x.com  ", "secret1").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["email"][0], "The email has already been taken.");
}

#[tokio::test]
async fn test_register_wrong_types_are_field_errors() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            Method::POST,
            "/api/register",
            None,
            Some(json!({"name": 42, "email": "ann@x.com"})),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["name"][0], "The name must be a string.");
    assert!(body["error"]["password"].is_array());
    assert!(body["error"].get("body").is_none());
}

#[tokio::test]
async fn test_register_missing_fields_reports_each() {
    let app = TestApp::new();

    let (status, body) = app
        .send(Method::POST, "/api/register", None, Some(json!({})))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    for field in ["name", "email", "password"] {
        assert!(body["error"][field].is_array(), "no error for {}", field);
    }
    assert_eq!(app.repos.users.count(), 0);
}

#[tokio::test]
async fn test_register_password_length_bounds() {
    let app = TestApp::new();

    let (status, body) = app.register("Ann", "a@x.com", "12345").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]["password"].is_array());

    let (status, _) = app.register("Ann", "b@x.com", &"p".repeat(51)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app.register("Ann", "c@x.com", "123456").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.register("Ann", "d@x.com", &"p".repeat(50)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_rejects_malformed_email() {
    let app = TestApp::new();

    let (status, body) = app.register("Ann", "not-an-email", "secret1").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["email"][0], "The email must be a valid email address.");
}

#[tokio::test]
async fn test_wrong_password_yields_no_token() {
    let app = TestApp::new();
    app.register("Ann", "ann@x.com", "secret1").await;

    let (status, body) = app.login("ann@x.com", "secret2").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Login credentials are invalid.");
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn test_unknown_email_matches_wrong_password() {
    let app = TestApp::new();

    let (status, body) = app.login("ghost@x.com", "secret1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_login_validation() {
    let app = TestApp::new();

    let (status, body) = app
        .send(Method::POST, "/api/login", None, Some(json!({"email": "ann@x.com"})))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]["password"].is_array());
}

#[tokio::test]
async fn test_protected_routes_need_a_token() {
    let app = TestApp::new();

    let (status, body) = app.send(Method::GET, "/api/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token not provided");

    let (status, _) = app.send(Method::POST, "/api/logout", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .send(Method::GET, "/api/profile", Some("not.a.jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_malformed_json_is_validation_error() {
    let app = TestApp::new();
    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/api/register")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();

    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_health_reports_unreachable_database() {
    let app = TestApp::new();

    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["database"]["status"], "unhealthy");
}
