//! Shared harness for integration tests.
//!
//! Real services over in-memory repositories, driven through the router
//! with `oneshot`. No database is needed.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use product_api::domain::{Product, ProductDraft, User};
use product_api::errors::AppResult;
use product_api::infra::{
    Database, ProductRepository, Repositories, RevokedTokenRepository, UserRepository,
};
use product_api::services::Services;
use product_api::{create_router, AppState, Config};

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only-32chars";

#[derive(Default)]
pub struct InMemoryUsers {
    rows: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUsers {
    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, name: String, email: String, password_hash: String) -> AppResult<User> {
        let user = User::new(Uuid::new_v4(), name, email, password_hash);
        self.rows.lock().unwrap().insert(user.id, user.clone());
        Ok(user)
    }
}

#[derive(Default)]
pub struct InMemoryProducts {
    rows: Mutex<HashMap<Uuid, Product>>,
}

impl InMemoryProducts {
    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProducts {
    async fn list_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Product>> {
        let mut products: Vec<Product> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.is_owned_by(owner_id))
            .cloned()
            .collect();
        products.sort_by_key(|p| p.created_at);
        Ok(products)
    }

    async fn find_owned(&self, owner_id: Uuid, id: Uuid) -> AppResult<Option<Product>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&id)
            .filter(|p| p.is_owned_by(owner_id))
            .cloned())
    }

    async fn create(&self, owner_id: Uuid, draft: ProductDraft) -> AppResult<Product> {
        let product = Product::new(Uuid::new_v4(), owner_id, draft);
        self.rows.lock().unwrap().insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_owned(
        &self,
        owner_id: Uuid,
        id: Uuid,
        draft: ProductDraft,
    ) -> AppResult<Option<Product>> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&id) {
            Some(product) if product.is_owned_by(owner_id) => {
                product.apply(draft);
                Ok(Some(product.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_owned(&self, owner_id: Uuid, id: Uuid) -> AppResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        if rows.get(&id).is_some_and(|p| p.is_owned_by(owner_id)) {
            rows.remove(&id);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[derive(Default)]
pub struct InMemoryRevocations {
    rows: Mutex<HashMap<Uuid, DateTime<Utc>>>,
}

#[async_trait]
impl RevokedTokenRepository for InMemoryRevocations {
    async fn revoke(&self, jti: Uuid, _user_id: Uuid, expires_at: DateTime<Utc>) -> AppResult<()> {
        self.rows.lock().unwrap().insert(jti, expires_at);
        Ok(())
    }

    async fn is_revoked(&self, jti: Uuid) -> AppResult<bool> {
        Ok(self.rows.lock().unwrap().contains_key(&jti))
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|_, expires_at| *expires_at > now);
        Ok((before - rows.len()) as u64)
    }
}

#[derive(Default)]
pub struct InMemoryRepositories {
    pub users: Arc<InMemoryUsers>,
    pub products: Arc<InMemoryProducts>,
    pub revocations: Arc<InMemoryRevocations>,
}

impl Repositories for InMemoryRepositories {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.products.clone()
    }

    fn revoked_tokens(&self) -> Arc<dyn RevokedTokenRepository> {
        self.revocations.clone()
    }
}

/// Router plus a handle on the stores behind it.
pub struct TestApp {
    pub router: Router,
    pub repos: Arc<InMemoryRepositories>,
}

impl TestApp {
    pub fn new() -> Self {
        let repos = Arc::new(InMemoryRepositories::default());
        let config = Config::new("postgres://unused", TEST_SECRET, 1);
        let services = Arc::new(Services::from_repositories(repos.clone(), config));
        let database = Arc::new(Database::from_connection(
            sea_orm::DatabaseConnection::Disconnected,
        ));

        Self {
            router: create_router(AppState::from_services(services, database)),
            repos,
        }
    }

    /// Send a request and decode the JSON body (`Value::Null` when empty).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/api/register",
            None,
            Some(serde_json::json!({ "name": name, "email": email, "password": password })),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/api/login",
            None,
            Some(serde_json::json!({ "email": email, "password": password })),
        )
        .await
    }

    /// Register then log in, returning the bearer token.
    pub async fn signed_in(&self, name: &str, email: &str) -> String {
        let (status, _) = self.register(name, email, "secret1").await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = self.login(email, "secret1").await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }
}
