//! Authentication middleware: Bearer token extraction and JWT verification.
//!
//! Every protected route runs [`require_auth`] before its handler. The only
//! way to obtain an [`AuthenticatedUser`] is through this middleware; a
//! handler that cannot find one fails closed with a server error.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderValue, request::Parts};
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use tracing::debug;

use crate::AppState;
use crate::error::AppError;

const BEARER_PREFIX: &str = "Bearer ";

/// Identity resolved from a verified token, stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    username: String,
}

impl AuthenticatedUser {
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::MissingIdentity)
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header value.
fn extract_bearer(header: Option<&HeaderValue>) -> Result<&str, AppError> {
    let header = header
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".into()))?
        .to_str()
        .map_err(|_| AppError::Unauthorized("Malformed authorization header".into()))?;

    let token = header
        .strip_prefix(BEARER_PREFIX)
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization scheme".into()))?
        .trim();

    if token.is_empty() {
        return Err(AppError::Unauthorized("Missing bearer token".into()));
    }
    Ok(token)
}

/// Axum middleware: extracts `Authorization: Bearer <token>`, verifies the JWT,
/// and injects `AuthenticatedUser` into request extensions.
///
/// Touches no storage.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer(request.headers().get(AUTHORIZATION))?;

    let claims = state.tokens.verify(token, Utc::now()).map_err(|e| {
        debug!(error = %e, "rejected access token");
        AppError::Unauthorized("Invalid or expired token".into())
    })?;

    request.extensions_mut().insert(AuthenticatedUser {
        username: claims.sub,
    });

    Ok(next.run(request).await)
}

#[cfg(test)]
pub(crate) fn test_user(username: &str) -> AuthenticatedUser {
    AuthenticatedUser {
        username: username.to_string(),
    }
}
