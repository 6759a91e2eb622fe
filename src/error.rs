/// Error Handling Module
///
/// Unified error handling for the service:
/// 1. Domain-specific error types (validation, store, credentials, access, config)
/// 2. A central `AppError` used for control flow
/// 3. HTTP response mapping with structured logging
///
/// Access failures are deliberately rendered with a single body so a caller
/// cannot tell a missing session from a forged token or a wrong role.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::error::Error as StdError;
use std::fmt;

use crate::account::AccountId;

/// Body of every access-denied response.
pub const PERMISSION_DENIED: &str = "permission denied";

/// Body of every failed login.
pub const NOT_AUTHENTICATED: &str = "not authenticated";

/// ============================================================================
/// 1. DOMAIN-SPECIFIC ERROR TYPES
/// ============================================================================

/// Validation errors for request input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyField(String),
    TooLong(String, usize),
    TooManyBytes(String, usize),
    InvalidFormat(String),
    InvalidId(String),
    MalformedBody(String),
    RoleNotAllowed(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyField(field) => write!(f, "{} is empty", field),
            ValidationError::TooLong(field, max) => {
                write!(f, "{} is too long (maximum {} characters)", field, max)
            }
            ValidationError::TooManyBytes(field, max) => {
                write!(f, "{} is too long (maximum {} bytes)", field, max)
            }
            ValidationError::InvalidFormat(field) => write!(f, "{} has invalid format", field),
            ValidationError::InvalidId(raw) => write!(f, "invalid id given {}", raw),
            ValidationError::MalformedBody(msg) => write!(f, "malformed request body: {}", msg),
            ValidationError::RoleNotAllowed(role) => {
                write!(f, "role {} cannot be requested at signup", role)
            }
        }
    }
}

impl StdError for ValidationError {}

/// Account store errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound(String),
    DuplicateUsername(String),
    Timeout,
    Backend(String),
}

impl StoreError {
    pub fn account_not_found(id: AccountId) -> Self {
        StoreError::NotFound(format!("account {} not found", id))
    }

    pub fn username_not_found(username: &str) -> Self {
        StoreError::NotFound(format!("account with username {} not found", username))
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(msg) => write!(f, "{}", msg),
            StoreError::DuplicateUsername(name) => {
                write!(f, "username {} is already taken", name)
            }
            StoreError::Timeout => write!(f, "account store did not answer in time"),
            StoreError::Backend(msg) => write!(f, "account store error: {}", msg),
        }
    }
}

impl StdError for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StoreError::NotFound("record not found".to_string()),
            // 23505 = unique_violation
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                StoreError::DuplicateUsername(db.message().to_string())
            }
            _ => StoreError::Backend(err.to_string()),
        }
    }
}

/// Login failures. One variant only: whether the username exists is never revealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    InvalidCredentials,
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::InvalidCredentials => write!(f, "{}", NOT_AUTHENTICATED),
        }
    }
}

impl StdError for CredentialError {}

/// Session verification and authorization failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    TokenInvalid,
    InsufficientRole,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "Missing session token"),
            AuthError::TokenInvalid => write!(f, "Invalid session token"),
            AuthError::InsufficientRole => write!(f, "Role does not grant access"),
        }
    }
}

impl StdError for AuthError {}

/// Configuration errors. These only occur at startup and are fatal.
#[derive(Debug)]
pub enum ConfigError {
    MissingRequired(String),
    InvalidValue(String),
    Load(config::ConfigError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingRequired(msg) => write!(f, "Missing required config: {}", msg),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid config value: {}", msg),
            ConfigError::Load(e) => write!(f, "Config load error: {}", e),
        }
    }
}

impl StdError for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Load(err)
    }
}

/// ============================================================================
/// 2. UNIFIED APPLICATION ERROR TYPE
/// ============================================================================

/// Central error type returned by handlers and the account service
#[derive(Debug)]
pub enum AppError {
    Validation(ValidationError),
    Store(StoreError),
    Credentials(CredentialError),
    Auth(AuthError),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "{}", e),
            AppError::Store(e) => write!(f, "{}", e),
            AppError::Credentials(e) => write!(f, "{}", e),
            AppError::Auth(e) => write!(f, "{}", e),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl StdError for AppError {}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Store(err)
    }
}

impl From<CredentialError> for AppError {
    fn from(err: CredentialError) -> Self {
        AppError::Credentials(err)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}

// ============================================================================
// 3. HTTP RESPONSE MAPPING
// ============================================================================

/// Error body returned to clients
#[derive(Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// The single response every denied request receives.
pub fn permission_denied() -> HttpResponse {
    HttpResponse::Forbidden().json(ErrorResponse::new(PERMISSION_DENIED))
}

impl AppError {
    /// Message exposed to the client. Store and internal details stay in the logs.
    fn client_message(&self) -> String {
        match self {
            AppError::Validation(e) => e.to_string(),
            AppError::Store(StoreError::NotFound(msg)) => msg.clone(),
            AppError::Store(e @ StoreError::DuplicateUsername(_)) => e.to_string(),
            AppError::Store(_) => "request could not be completed".to_string(),
            AppError::Credentials(_) => NOT_AUTHENTICATED.to_string(),
            AppError::Auth(_) => PERMISSION_DENIED.to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }

    fn log_error(&self, request_id: &str) {
        match self {
            AppError::Validation(e) => {
                tracing::warn!(request_id = request_id, error = %e, "Validation error");
            }
            AppError::Store(StoreError::NotFound(_)) => {
                tracing::info!(request_id = request_id, error = %self, "Account not found");
            }
            AppError::Store(StoreError::DuplicateUsername(_)) => {
                tracing::warn!(request_id = request_id, error = %self, "Duplicate username attempt");
            }
            AppError::Store(e) => {
                tracing::error!(request_id = request_id, error = %e, "Account store error");
            }
            AppError::Credentials(_) => {
                tracing::warn!(request_id = request_id, "Invalid credentials attempt");
            }
            AppError::Auth(e) => {
                tracing::warn!(request_id = request_id, reason = %e, "Access denied");
            }
            AppError::Internal(msg) => {
                tracing::error!(request_id = request_id, error = %msg, "Internal error");
            }
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let request_id = uuid::Uuid::new_v4().to_string();
        self.log_error(&request_id);

        if let AppError::Auth(_) = self {
            return permission_denied();
        }

        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.client_message()))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Store(e) => match e {
                StoreError::NotFound(_) => StatusCode::NOT_FOUND,
                StoreError::DuplicateUsername(_) => StatusCode::CONFLICT,
                _ => StatusCode::BAD_REQUEST,
            },
            AppError::Credentials(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(_) => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
