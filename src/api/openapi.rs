//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, product_handler};
use crate::domain::{Product, UserResponse};
use crate::services::IssuedToken;

/// OpenAPI documentation for the Product API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Product API",
        version = "0.1.0",
        description = "Token-authenticated product catalogue where every user manages their own products"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
        auth_handler::logout,
        auth_handler::profile,
        product_handler::list_products,
        product_handler::create_product,
        product_handler::get_product,
        product_handler::update_product,
        product_handler::delete_product,
    ),
    components(
        schemas(
            UserResponse,
            Product,
            IssuedToken,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::LoginResponse,
            auth_handler::ProfileResponse,
            product_handler::ProductRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login, logout and profile"),
        (name = "Products", description = "Products owned by the authenticated user")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for bearer token authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token obtained from /api/login"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/register",
            "/api/login",
            "/api/logout",
            "/api/profile",
            "/api/products",
            "/api/products/{id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
