//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::infra::Database;
use crate::services::{AuthService, ProductService, ServiceContainer};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Registration, login, logout and bearer token lookup
    pub auth_service: Arc<dyn AuthService>,
    /// Owner-scoped product CRUD
    pub product_service: Arc<dyn ProductService>,
    /// Database connection, used by the health check
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from an assembled service container.
    pub fn from_services(container: Arc<dyn ServiceContainer>, database: Arc<Database>) -> Self {
        Self {
            auth_service: container.auth(),
            product_service: container.products(),
            database,
        }
    }
}
