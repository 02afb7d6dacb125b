//! Product CRUD through the HTTP surface, including owner isolation.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use common::TestApp;

fn widget() -> Value {
    json!({"name": "Widget", "company": "Acme", "price": 9.99, "quantity": 3})
}

async fn create(app: &TestApp, token: &str, body: Value) -> (StatusCode, Value) {
    app.send(Method::POST, "/api/products", Some(token), Some(body)).await
}

#[tokio::test]
async fn test_product_lifecycle() {
    let app = TestApp::new();
    let token = app.signed_in("Ann", "ann@x.com").await;

    let (status, body) = create(&app, &token, widget()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Product created successfully");
    assert_eq!(body["data"]["name"], "Widget");
    assert_eq!(body["data"]["company"], "Acme");
    assert_eq!(body["data"]["price"], 9.99);
    assert_eq!(body["data"]["quantity"], 3);
    let id = body["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/products/{}", id);

    let (status, body) = app.send(Method::GET, "/api/products", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], id.as_str());

    let (status, body) = app.send(Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Widget");

    let (status, body) = app
        .send(
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({"name": "Gadget", "company": "Acme", "price": 12.5, "quantity": 0})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product updated successfully");
    assert_eq!(body["data"]["name"], "Gadget");
    assert_eq!(body["data"]["quantity"], 0);

    let (status, body) = app.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "message": "Product deleted successfully"}));

    let (status, body) = app.send(Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Sorry, product not found.");
}

#[tokio::test]
async fn test_products_are_invisible_to_other_users() {
    let app = TestApp::new();
    let ann = app.signed_in("Ann", "ann@x.com").await;
    let bob = app.signed_in("Bob", "bob@x.com").await;

    let (_, body) = create(&app, &ann, widget()).await;
    let uri = format!("/api/products/{}", body["data"]["id"].as_str().unwrap());

    let (status, body) = app.send(Method::GET, "/api/products", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _) = app.send(Method::GET, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(
            Method::PUT,
            &uri,
            Some(&bob),
            Some(json!({"name": "Hijacked", "company": "Evil", "price": 0.0, "quantity": 1})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send(Method::DELETE, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.send(Method::GET, &uri, Some(&ann), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Widget");
    assert_eq!(body["company"], "Acme");
}

#[tokio::test]
async fn test_create_requires_every_field() {
    let app = TestApp::new();
    let token = app.signed_in("Ann", "ann@x.com").await;

    let (status, body) = create(&app, &token, json!({"name": "Widget"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    for field in ["company", "price", "quantity"] {
        assert!(body["error"][field].is_array(), "no error for {}", field);
    }
    assert!(body["error"].get("name").is_none());
    assert_eq!(app.repos.products.count(), 0);
}

#[tokio::test]
async fn test_wrong_type_reported_with_missing_fields() {
    let app = TestApp::new();
    let token = app.signed_in("Ann", "ann@x.com").await;

    let (status, body) = create(&app, &token, json!({"price": "abc"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["price"][0], "The price must be a number.");
    for field in ["name", "company", "quantity"] {
        assert!(body["error"][field].is_array(), "no error for {}", field);
    }
    assert!(body["error"].get("body").is_none());
    assert_eq!(app.repos.products.count(), 0);
}

#[tokio::test]
async fn test_numeric_strings_are_accepted() {
    let app = TestApp::new();
    let token = app.signed_in("Ann", "ann@x.com").await;

    let (status, body) = create(
        &app,
        &token,
        json!({"name": "Widget", "company": "Acme", "price": "10", "quantity": "3"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["price"], 10.0);
    assert_eq!(body["data"]["quantity"], 3);

    let (status, body) = create(&app, &token, json!({"price": "10"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].get("price").is_none());
    for field in ["name", "company", "quantity"] {
        assert!(body["error"][field].is_array(), "no error for {}", field);
    }
}

#[tokio::test]
async fn test_update_validates_before_touching_the_product() {
    let app = TestApp::new();
    let token = app.signed_in("Ann", "ann@x.com").await;
    let (_, body) = create(&app, &token, widget()).await;
    let uri = format!("/api/products/{}", body["data"]["id"].as_str().unwrap());

    let (status, _) = app
        .send(Method::PUT, &uri, Some(&token), Some(json!({"name": "Gadget"})))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = app.send(Method::GET, &uri, Some(&token), None).await;
    assert_eq!(body["name"], "Widget");
}

#[tokio::test]
async fn test_unknown_and_malformed_ids_are_not_found() {
    let app = TestApp::new();
    let token = app.signed_in("Ann", "ann@x.com").await;

    let (status, _) = app
        .send(
            Method::GET,
            "/api/products/550e8400-e29b-41d4-a716-446655440000",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.send(Method::DELETE, "/api/products/42", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_product_routes_need_a_token() {
    let app = TestApp::new();

    let (status, _) = app.send(Method::GET, "/api/products", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(Method::POST, "/api/products", None, Some(widget()))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.repos.products.count(), 0);
}

#[tokio::test]
async fn test_revoked_token_loses_product_access() {
    let app = TestApp::new();
    let token = app.signed_in("Ann", "ann@x.com").await;
    create(&app, &token, widget()).await;

    app.send(Method::POST, "/api/logout", Some(&token), None).await;

    let (status, _) = app.send(Method::GET, "/api/products", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
