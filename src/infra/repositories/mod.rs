//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

pub(crate) mod entities;
mod product_repository;
mod revoked_token_repository;
mod user_repository;

pub use product_repository::{ProductRepository, ProductStore};
pub use revoked_token_repository::{RevokedTokenRepository, RevokedTokenStore};
pub use user_repository::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use product_repository::MockProductRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use revoked_token_repository::MockRevokedTokenRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
