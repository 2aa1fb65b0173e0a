//! Authorization gate and identity resolution.

use shop_core::store::ShopStore;
use tracing::{error, warn};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;

/// Proof that the caller held the admin role when the gate ran.
#[derive(Debug)]
pub struct AdminUser {
    username: String,
}

impl AdminUser {
    pub fn username(&self) -> &str {
        &self.username
    }
}

/// Require the caller to currently be an admin.
///
/// The role is read from the store on every call so a demotion takes effect
/// on the next request. A failed or empty lookup denies with
/// [`AppError::RoleLookupFailed`] (rendered as a server error); a
/// non-admin role denies with [`AppError::Forbidden`].
pub async fn require_admin(
    store: &dyn ShopStore,
    user: &AuthenticatedUser,
) -> AppResult<AdminUser> {
    let role = store
        .find_role(user.username())
        .await
        .map_err(|e| AppError::RoleLookupFailed(e.to_string()))?
        .ok_or_else(|| {
            AppError::RoleLookupFailed(format!("no user record for {}", user.username()))
        })?;

    if !role.is_admin() {
        warn!(username = user.username(), role = %role, "admin operation denied");
        return Err(AppError::Forbidden("Admin role required".into()));
    }

    Ok(AdminUser {
        username: user.username().to_string(),
    })
}

/// Resolve the caller's internal user id.
///
/// A verified token for a user that no longer exists is an internal error.
pub async fn resolve_user_id(store: &dyn ShopStore, user: &AuthenticatedUser) -> AppResult<i64> {
    store.find_user_id(user.username()).await?.ok_or_else(|| {
        error!(username = user.username(), "token references a missing user");
        AppError::Internal(format!("no user record for {}", user.username()))
    })
}

#[cfg(test)]
pub(crate) fn test_admin(username: &str) -> AdminUser {
    AdminUser {
        username: username.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use shop_core::models::auth::{NewUser, Role};
    use shop_core::store::UserStore;
    use shop_core::store::memory::MemoryStore;

    use super::*;
    use crate::middleware::auth::test_user;

    async fn store_with(username: &str, role: Role) -> MemoryStore {
        let store = MemoryStore::new();
        store
            .create_user(&NewUser {
                username: username.into(),
                email: format!("{username}@x.com"),
                password_hash: "hash".into(),
                role,
            })
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn admin_passes_the_gate() {
        let store = store_with("root", Role::Admin).await;
        let admin = require_admin(&store, &test_user("root")).await.unwrap();
        assert_eq!(admin.username(), "root");
    }

    #[tokio::test]
    async fn customer_is_forbidden() {
        let store = store_with("alice", Role::Customer).await;
        let err = require_admin(&store, &test_user("alice")).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn demotion_takes_effect_on_the_next_check() {
        let store = store_with("root", Role::Admin).await;
        let root = test_user("root");
        require_admin(&store, &root).await.unwrap();

        assert!(store.set_role("root", Role::Customer).await);
        let err = require_admin(&store, &root).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        assert!(store.set_role("root", Role::Admin).await);
        require_admin(&store, &root).await.unwrap();
    }

    #[tokio::test]
    async fn missing_user_is_a_lookup_failure_not_a_permission_error() {
        let store = MemoryStore::new();
        let err = require_admin(&store, &test_user("ghost")).await.unwrap_err();
        assert!(matches!(err, AppError::RoleLookupFailed(_)));
        assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn resolves_user_id_or_fails_internally() {
        let store = store_with("alice", Role::Customer).await;
        assert!(resolve_user_id(&store, &test_user("alice")).await.is_ok());
        assert!(matches!(
            resolve_user_id(&store, &test_user("ghost")).await,
            Err(AppError::Internal(_))
        ));
    }
}
