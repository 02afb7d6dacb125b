//! Service Container - Centralized service access.
//!
//! Wires repositories, the token service and the application services
//! together once at start-up; handlers only ever see the trait objects.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, JwtTokenService, ProductManager, ProductService, TokenService,
};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{Persistence, Repositories};

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn products(&self) -> Arc<dyn ProductService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    product_service: Arc<dyn ProductService>,
    jwt: Arc<JwtTokenService>,
}

impl Services {
    /// Build every service over the given repository registry.
    pub fn from_repositories<R: Repositories + 'static>(repos: Arc<R>, config: Config) -> Self {
        let jwt = Arc::new(JwtTokenService::new(repos.revoked_tokens(), config));
        let token_service: Arc<dyn TokenService> = jwt.clone();

        Self {
            auth_service: Arc::new(Authenticator::new(repos.clone(), token_service)),
            product_service: Arc::new(ProductManager::new(repos)),
            jwt,
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        Self::from_repositories(Arc::new(Persistence::new(db)), config)
    }

    /// Drop denylist entries for tokens that have expired anyway.
    pub async fn purge_expired_tokens(&self) -> AppResult<u64> {
        self.jwt.purge_expired().await
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn products(&self) -> Arc<dyn ProductService> {
        self.product_service.clone()
    }
}
