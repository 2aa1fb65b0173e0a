//! Profile request handler.

use axum::extract::State;
use shop_core::models::auth::Profile;

use crate::AppState;
use crate::error::AppResult;
use crate::extract::Json;
use crate::middleware::auth::AuthenticatedUser;
use crate::services::auth;

/// `GET /profile`
pub async fn profile_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<Profile>> {
    let profile = auth::profile(state.store.as_ref(), &user).await?;
    Ok(Json(profile))
}
