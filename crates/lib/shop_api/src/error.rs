//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shop_core::auth::AuthError;
use shop_core::store::StoreError;
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
///
/// `RoleLookupFailed` and `MissingIdentity` render exactly like `Internal`;
/// they exist so logs say what actually went wrong.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Role lookup failed: {0}")]
    RoleLookupFailed(String),

    #[error("No authenticated identity on a protected route")]
    MissingIdentity,

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) | AppError::InsufficientStock(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::RoleLookupFailed(_) | AppError::MissingIdentity | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (error, message) = match &self {
            AppError::Validation(m) => ("validation_error", m.as_str()),
            AppError::NotFound(m) => ("not_found", m.as_str()),
            AppError::Conflict(m) => ("conflict", m.as_str()),
            AppError::InsufficientStock(m) => ("insufficient_stock", m.as_str()),
            AppError::Unauthorized(m) => ("unauthorized", m.as_str()),
            AppError::Forbidden(m) => ("forbidden", m.as_str()),
            AppError::RoleLookupFailed(detail) | AppError::Internal(detail) => {
                error!(kind = %self, detail = %detail, "request failed");
                ("internal_error", "Internal server error")
            }
            AppError::MissingIdentity => {
                error!("protected handler reached without an authenticated identity");
                ("internal_error", "Internal server error")
            }
        };
        let body = Json(ErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
        });
        (self.status(), body).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(msg) => AppError::Conflict(msg),
            StoreError::ProductNotFound(id) => AppError::NotFound(format!("Product {id} not found")),
            e @ StoreError::InsufficientStock { .. } => AppError::InsufficientStock(e.to_string()),
            StoreError::AdminExists => {
                AppError::Forbidden("Admin self-registration is disabled".into())
            }
            StoreError::StaleStatus(id) => {
                AppError::Conflict(format!("Order {id} was updated concurrently, retry"))
            }
            StoreError::Decode(msg) => AppError::Internal(msg),
            StoreError::Db(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::CredentialError => AppError::Unauthorized("Invalid credentials".into()),
            AuthError::TokenError(msg) => AppError::Unauthorized(msg),
            AuthError::Internal(msg) => AppError::Internal(msg),
        }
    }
}
