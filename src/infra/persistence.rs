//! Repository registry.
//!
//! Services receive one `Repositories` handle instead of a repository per
//! table. Every operation in this service is a single statement, so the
//! registry hands out plain connection-backed stores and opens no
//! transactions.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::repositories::{
    ProductRepository, ProductStore, RevokedTokenRepository, RevokedTokenStore, UserRepository,
    UserStore,
};

/// Centralized repository access for dependency injection.
pub trait Repositories: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn products(&self) -> Arc<dyn ProductRepository>;

    fn revoked_tokens(&self) -> Arc<dyn RevokedTokenRepository>;
}

/// SeaORM-backed repository registry
pub struct Persistence {
    user_repo: Arc<UserStore>,
    product_repo: Arc<ProductStore>,
    revoked_token_repo: Arc<RevokedTokenStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            product_repo: Arc::new(ProductStore::new(db.clone())),
            revoked_token_repo: Arc::new(RevokedTokenStore::new(db)),
        }
    }
}

impl Repositories for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.product_repo.clone()
    }

    fn revoked_tokens(&self) -> Arc<dyn RevokedTokenRepository> {
        self.revoked_token_repo.clone()
    }
}

/// Registry over mock repositories for service unit tests.
///
/// Repositories that are not replaced are bare mocks with no expectations,
/// so any unexpected call fails the test.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockRepositories {
    users: Arc<dyn UserRepository>,
    products: Arc<dyn ProductRepository>,
    revoked_tokens: Arc<dyn RevokedTokenRepository>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockRepositories {
    pub fn new() -> Self {
        use super::repositories::{
            MockProductRepository, MockRevokedTokenRepository, MockUserRepository,
        };

        Self {
            users: Arc::new(MockUserRepository::new()),
            products: Arc::new(MockProductRepository::new()),
            revoked_tokens: Arc::new(MockRevokedTokenRepository::new()),
        }
    }

    pub fn with_users(mut self, repo: impl UserRepository + 'static) -> Self {
        self.users = Arc::new(repo);
        self
    }

    pub fn with_products(mut self, repo: impl ProductRepository + 'static) -> Self {
        self.products = Arc::new(repo);
        self
    }

    pub fn with_revoked_tokens(mut self, repo: impl RevokedTokenRepository + 'static) -> Self {
        self.revoked_tokens = Arc::new(repo);
        self
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Default for MockRepositories {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Repositories for MockRepositories {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.products.clone()
    }

    fn revoked_tokens(&self) -> Arc<dyn RevokedTokenRepository> {
        self.revoked_tokens.clone()
    }
}
