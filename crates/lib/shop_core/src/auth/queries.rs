//! Auth-related database queries.

use sqlx::{PgPool, Postgres, Transaction};

use crate::models::auth::{Credentials, NewUser, Profile, Role};
use crate::store::StoreError;

fn parse_role(raw: &str) -> Result<Role, StoreError> {
    raw.parse::<Role>()
        .map_err(|e| StoreError::Decode(e.to_string()))
}

/// Advisory lock key serialising admin bootstrap registrations.
const ADMIN_BOOTSTRAP_LOCK: i64 = 0x5348_4f50_4144_4d4e;

async fn insert_user<'e, E>(executor: E, user: &NewUser) -> Result<i64, StoreError>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let inserted = sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (username, password_hash, email, role) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(&user.username)
    .bind(&user.password_hash)
    .bind(&user.email)
    .bind(user.role.as_str())
    .fetch_one(executor)
    .await;

    match inserted {
        Ok(id) => Ok(id),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(StoreError::Conflict(
            "Username or email already exists".into(),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Create a new user, returning the user ID.
pub async fn create_user(pool: &PgPool, user: &NewUser) -> Result<i64, StoreError> {
    insert_user(pool, user).await
}

/// Create a user only while no admin exists.
///
/// Concurrent callers serialise on a transaction-scoped advisory lock, so
/// the existence check and the insert cannot interleave.
pub async fn create_user_unless_admin_exists(
    pool: &PgPool,
    user: &NewUser,
) -> Result<i64, StoreError> {
    let mut tx: Transaction<'_, Postgres> = pool.begin().await?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(ADMIN_BOOTSTRAP_LOCK)
        .execute(&mut *tx)
        .await?;

    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE role = 'admin')")
            .fetch_one(&mut *tx)
            .await?;
    if exists {
        return Err(StoreError::AdminExists);
    }

    let id = insert_user(&mut *tx, user).await?;
    tx.commit().await?;
    Ok(id)
}

/// Fetch username and password hash by username or email.
///
/// A username match wins over an email match.
pub async fn find_credentials(
    pool: &PgPool,
    username_or_email: &str,
) -> Result<Option<Credentials>, StoreError> {
    let row = sqlx::query_as::<_, (String, String)>(
        "SELECT username, password_hash FROM users \
         WHERE username = $1 OR email = $1 \
         ORDER BY (username = $1) DESC \
         LIMIT 1",
    )
    .bind(username_or_email)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|(username, password_hash)| Credentials {
        username,
        password_hash,
    }))
}

/// Fetch the public profile of a user.
pub async fn find_profile(pool: &PgPool, username: &str) -> Result<Option<Profile>, StoreError> {
    let row = sqlx::query_as::<_, (String, String, String)>(
        "SELECT username, email, role FROM users WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    row.map(|(username, email, role)| {
        Ok(Profile {
            username,
            email,
            role: parse_role(&role)?,
        })
    })
    .transpose()
}

/// Resolve a username to its internal id.
pub async fn find_user_id(pool: &PgPool, username: &str) -> Result<Option<i64>, StoreError> {
    let id = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(id)
}

/// Fetch the current role of a user.
pub async fn find_role(pool: &PgPool, username: &str) -> Result<Option<Role>, StoreError> {
    let role = sqlx::query_scalar::<_, String>("SELECT role FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    role.as_deref().map(parse_role).transpose()
}

/// Check whether any admin user exists.
pub async fn admin_exists(pool: &PgPool) -> Result<bool, StoreError> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE role = 'admin')")
            .fetch_one(pool)
            .await?;
    Ok(exists)
}
