//! HTTP request handlers.

pub mod auth_handler;
pub mod product_handler;

pub use auth_handler::{auth_routes, protected_auth_routes};
pub use product_handler::product_routes;
