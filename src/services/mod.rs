//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on the `Repositories` registry and
//! on each other only through traits.

mod auth_service;
pub mod container;
mod product_service;
mod token_service;

pub use container::{ServiceContainer, Services};

pub use auth_service::{AuthService, Authenticator};
pub use product_service::{ProductManager, ProductService};
pub use token_service::{Claims, IssuedToken, JwtTokenService, TokenService};
