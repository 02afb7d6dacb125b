//! Authentication handlers.

use std::fmt;

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::api::extractors::{JsonBody, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::config::{
    MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH, MSG_EMAIL_TAKEN, MSG_LOGGED_OUT, MSG_USER_CREATED,
};
use crate::domain::{FieldErrors, Rules, UserResponse, Validate};
use crate::errors::AppResult;
use crate::services::IssuedToken;
use crate::types::ApiResponse;

/// User registration request
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(value_type = Option<String>, example = "Ann")]
    pub name: Option<Value>,
    #[schema(value_type = Option<String>, example = "ann@x.com")]
    pub email: Option<Value>,
    /// Between 6 and 50 characters
    #[schema(value_type = Option<String>, example = "secret1", min_length = 6, max_length = 50)]
    pub password: Option<Value>,
}

impl RegisterRequest {
    /// The email as it will be stored, if one was sent as text.
    fn submitted_email(&self) -> Option<String> {
        self.email
            .as_ref()
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .map(str::to_string)
    }
}

/// Registration fields after validation
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Validate for RegisterRequest {
    type Valid = Registration;

    fn validate(self) -> Result<Registration, FieldErrors> {
        let mut rules = Rules::new();
        let name = rules.required_string("name", self.name);
        let email = rules.required_string("email", self.email);
        let password = rules.required_secret("password", self.password);

        if let Some(email) = &email {
            rules.email("email", email);
        }
        if let Some(password) = &password {
            rules.length_between("password", password, MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH);
        }

        match (name, email, password) {
            (Some(name), Some(email), Some(password)) => rules.finish().map(|()| Registration {
                name,
                email,
                password,
            }),
            _ => Err(rules.into_errors()),
        }
    }
}

/// Adds the taken-email failure to whatever the field rules reported.
fn require_unique_email(
    checked: Result<Registration, FieldErrors>,
    taken: bool,
) -> Result<Registration, FieldErrors> {
    match checked {
        Ok(_) if taken => Err(FieldErrors::single("email", MSG_EMAIL_TAKEN)),
        Err(mut errors) if taken => {
            errors.add("email", MSG_EMAIL_TAKEN);
            Err(errors)
        }
        checked => checked,
    }
}

/// User login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(value_type = Option<String>, example = "ann@x.com")]
    pub email: Option<Value>,
    #[schema(value_type = Option<String>, example = "secret1", min_length = 6, max_length = 50)]
    pub password: Option<Value>,
}

/// Login credentials after validation
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Validate for LoginRequest {
    type Valid = Credentials;

    fn validate(self) -> Result<Credentials, FieldErrors> {
        let mut rules = Rules::new();
        let email = rules.required_string("email", self.email);
        let password = rules.required_secret("password", self.password);

        if let Some(email) = &email {
            rules.email("email", email);
        }
        if let Some(password) = &password {
            rules.length_between("password", password, MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH);
        }

        match (email, password) {
            (Some(email), Some(password)) => {
                rules.finish().map(|()| Credentials { email, password })
            }
            _ => Err(rules.into_errors()),
        }
    }
}

/// Successful login: `{success, token, token_type, expires_in}`
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(flatten)]
    pub token: IssuedToken,
}

/// Current user: `{user}`
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub user: UserResponse,
}

/// Public authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Authentication routes that need a bearer token
pub fn protected_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/logout", post(logout))
        .route("/profile", get(profile))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User created; body is `{success, message, data}`", body = UserResponse),
        (status = 422, description = "Validation error, including an already taken email")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    // The lookup runs even when other fields fail so every error comes back at once
    let email = payload.submitted_email();
    let checked = payload.validate();
    let taken = match &email {
        Some(email) => state.auth_service.email_taken(email).await?,
        None => false,
    };
    let payload = require_unique_email(checked, taken)?;

    let user = state
        .auth_service
        .register(payload.name, payload.email, payload.password)
        .await?;

    Ok(Json(ApiResponse::with_message(
        UserResponse::from(user),
        MSG_USER_CREATED,
    )))
}

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Login credentials are invalid"),
        (status = 422, description = "Validation error"),
        (status = 500, description = "Could not create token")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let token = state
        .auth_service
        .login(payload.email, payload.password)
        .await?;

    Ok(Json(LoginResponse {
        success: true,
        token,
    }))
}

/// Revoke the token used for this request
#[utoipa::path(
    post,
    path = "/api/logout",
    tag = "Authentication",
    responses(
        (status = 200, description = "User has been logged out"),
        (status = 401, description = "Missing, invalid or revoked token"),
        (status = 500, description = "User cannot be logged out")
    ),
    security(("bearer_auth" = []))
)]
pub async fn logout(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.auth_service.logout(&current.token).await?;
    Ok(Json(ApiResponse::message(MSG_LOGGED_OUT)))
}

/// Get the authenticated user
#[utoipa::path(
    get,
    path = "/api/profile",
    tag = "Authentication",
    responses(
        (status = 200, description = "Current user", body = ProfileResponse),
        (status = 401, description = "Missing, invalid or revoked token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn profile(Extension(current): Extension<CurrentUser>) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        user: UserResponse::from(current.user),
    })
}
