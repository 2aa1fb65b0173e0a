//! Account flows: registration, login, profile.

use chrono::Utc;
use shop_core::auth::AuthError;
use shop_core::auth::jwt::TokenCodec;
use shop_core::auth::password::{hash_password, verify_password};
use shop_core::models::auth::{NewUser, Profile, Role};
use shop_core::store::{ShopStore, StoreError};
use tracing::{info, warn};

use crate::config::ApiConfig;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{LoginRequest, MessageResponse, RegisterRequest, TokenResponse};

fn invalid_credentials() -> AppError {
    AuthError::CredentialError.into()
}

/// Register a new account.
///
/// Self-registering as admin is only honored while no admin exists, unless
/// `allow_admin_signup` is set.
pub async fn register(
    store: &dyn ShopStore,
    config: &ApiConfig,
    req: RegisterRequest,
) -> AppResult<MessageResponse> {
    let username = req.username.trim();
    let email = req.email.trim();

    if username.is_empty() {
        return Err(AppError::Validation("Username is required".into()));
    }
    if req.password.is_empty() {
        return Err(AppError::Validation("Password is required".into()));
    }
    if !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".into()));
    }

    let role = match req.role.as_deref() {
        None => Role::Customer,
        Some(raw) if raw.trim().is_empty() => Role::Customer,
        Some(raw) => raw
            .parse::<Role>()
            .map_err(|e| AppError::Validation(e.to_string()))?,
    };

    let password_hash = hash_password(&req.password)?;
    let user = NewUser {
        username: username.to_string(),
        email: email.to_string(),
        password_hash,
        role,
    };

    if role.is_admin() && !config.allow_admin_signup {
        store
            .create_user_unless_admin_exists(&user)
            .await
            .inspect_err(|e| {
                if matches!(e, StoreError::AdminExists) {
                    warn!(username, "admin self-registration refused");
                }
            })?;
    } else {
        store.create_user(&user).await?;
    }

    info!(username, role = %role, "user registered");
    Ok(MessageResponse::new("User registered!"))
}

/// Check credentials and issue an access token.
///
/// Unknown users and wrong passwords fail the same way.
pub async fn login(
    store: &dyn ShopStore,
    tokens: &TokenCodec,
    req: LoginRequest,
) -> AppResult<TokenResponse> {
    let lookup = req.username_or_email.trim();
    if lookup.is_empty() || req.password.is_empty() {
        return Err(invalid_credentials());
    }

    let Some(creds) = store.find_credentials(lookup).await? else {
        return Err(invalid_credentials());
    };

    if !verify_password(&req.password, &creds.password_hash)? {
        return Err(invalid_credentials());
    }

    let token = tokens.issue(&creds.username, Utc::now())?;
    info!(username = %creds.username, "user logged in");
    Ok(TokenResponse { token })
}

/// Public profile of the caller.
pub async fn profile(store: &dyn ShopStore, user: &AuthenticatedUser) -> AppResult<Profile> {
    store
        .find_profile(user.username())
        .await?
        .ok_or_else(|| AppError::Internal(format!("no user record for {}", user.username())))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use shop_core::store::UserStore;
    use shop_core::store::memory::MemoryStore;

    use super::*;

    fn config(allow_admin_signup: bool) -> ApiConfig {
        ApiConfig {
            bind_addr: "127.0.0.1:0".into(),
            database_url: String::new(),
            jwt_secret: "test-secret".into(),
            allow_admin_signup,
        }
    }

    fn request(username: &str, role: Option<&str>) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            password: "pw1".into(),
            email: format!("{username}@x.com"),
            role: role.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn register_then_login() {
        let store = MemoryStore::new();
        let tokens = TokenCodec::new(b"test-secret");

        let resp = register(&store, &config(false), request("alice", None))
            .await
            .unwrap();
        assert_eq!(resp.message, "User registered!");

        let token = login(
            &store,
            &tokens,
            LoginRequest {
                username_or_email: "alice@x.com".into(),
                password: "pw1".into(),
            },
        )
        .await
        .unwrap()
        .token;
        let claims = tokens.verify(&token, Utc::now()).unwrap();
        assert_eq!(claims.sub, "alice");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() {
        let store = MemoryStore::new();
        let tokens = TokenCodec::new(b"test-secret");
        register(&store, &config(false), request("alice", None))
            .await
            .unwrap();

        for (who, pw) in [("alice", "nope"), ("nobody", "pw1")] {
            let err = login(
                &store,
                &tokens,
                LoginRequest {
                    username_or_email: who.into(),
                    password: pw.into(),
                },
            )
            .await
            .unwrap_err();
            assert!(matches!(err, AppError::Unauthorized(ref m) if m == "Invalid credentials"));
        }
    }

    #[tokio::test]
    async fn registration_validates_input() {
        let store = MemoryStore::new();
        let mut bad_email = request("bob", None);
        bad_email.email = "bob".into();
        let mut no_password = request("bob", None);
        no_password.password.clear();

        for req in [request("  ", None), bad_email, no_password, request("bob", Some("root"))] {
            let err = register(&store, &config(false), req).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{err:?}");
        }
    }

    #[tokio::test]
    async fn only_the_first_admin_may_self_register() {
        let store = MemoryStore::new();
        register(&store, &config(false), request("root", Some("admin")))
            .await
            .unwrap();

        let err = register(&store, &config(false), request("mallory", Some("admin")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        register(&store, &config(true), request("deputy", Some("admin")))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let store = MemoryStore::new();
        register(&store, &config(false), request("alice", None))
            .await
            .unwrap();
        let err = register(&store, &config(false), request("alice", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_admin_registrations_create_one_admin() {
        let store = Arc::new(MemoryStore::new());
        let config = config(false);

        let attempts = (0..4).map(|i| {
            let store = Arc::clone(&store);
            let config = config.clone();
            tokio::spawn(async move {
                register(
                    store.as_ref(),
                    &config,
                    request(&format!("admin{i}"), Some("admin")),
                )
                .await
            })
        });

        let mut created = 0;
        for attempt in attempts.collect::<Vec<_>>() {
            match attempt.await.unwrap() {
                Ok(_) => created += 1,
                Err(err) => assert!(matches!(err, AppError::Forbidden(_)), "{err:?}"),
            }
        }
        assert_eq!(created, 1);
        assert!(store.admin_exists().await.unwrap());
    }
}
