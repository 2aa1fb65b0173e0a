//! Authentication request handlers.

use axum::extract::State;

use crate::AppState;
use crate::error::AppResult;
use crate::extract::Json;
use crate::models::{LoginRequest, MessageResponse, RegisterRequest, TokenResponse};
use crate::services::auth;

/// `POST /login`: authenticate with username or email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let resp = auth::login(state.store.as_ref(), &state.tokens, body).await?;
    Ok(Json(resp))
}

/// `POST /registration`: create a new account.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<Json<MessageResponse>> {
    let resp = auth::register(state.store.as_ref(), &state.config, body).await?;
    Ok(Json(resp))
}
