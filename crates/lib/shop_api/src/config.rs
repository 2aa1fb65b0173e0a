//! API server configuration.

use std::fmt;

use shop_core::auth::jwt::generate_secret;
use tracing::warn;

/// Configuration for the API server.
#[derive(Clone)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "0.0.0.0:8080").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Token signing secret. Read once at startup; changing it invalidates
    /// every outstanding token.
    pub jwt_secret: String,
    /// Let anyone self-register with the `admin` role. When off, an admin
    /// account can only be self-registered while no admin exists yet.
    pub allow_admin_signup: bool,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable             | Default                                    |
    /// |----------------------|--------------------------------------------|
    /// | `BIND_ADDR`          | `0.0.0.0:8080`                             |
    /// | `DATABASE_URL`       | `postgres://postgres@localhost:5432/shop`  |
    /// | `JWT_SECRET` / `JWT` | random, per process                        |
    /// | `ALLOW_ADMIN_SIGNUP` | `false`                                    |
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://postgres@localhost:5432/shop".into()),
            jwt_secret: resolve_jwt_secret(),
            allow_admin_signup: std::env::var("ALLOW_ADMIN_SIGNUP")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        }
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &self.database_url)
            .field("jwt_secret", &"<redacted>")
            .field("allow_admin_signup", &self.allow_admin_signup)
            .finish()
    }
}

/// Resolve the signing secret: env var `JWT_SECRET` → `JWT` → random.
///
/// A random secret lives only as long as the process, so tokens stop
/// verifying after a restart.
pub fn resolve_jwt_secret() -> String {
    for var in ["JWT_SECRET", "JWT"] {
        if let Ok(secret) = std::env::var(var)
            && !secret.is_empty()
        {
            return secret;
        }
    }
    warn!("JWT_SECRET not set, using a random per-process signing secret");
    generate_secret()
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
