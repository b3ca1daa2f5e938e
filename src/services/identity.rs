use sqlx::PgPool;
use uuid::Uuid;

use crate::auth;
use crate::database::models::{Profile, Role};

/// Reads the stored role attribute for a profile. `Ok(None)` covers both a
/// missing profile and an unrecognized role string; callers deny in either
/// case.
pub async fn fetch_role(pool: &PgPool, profile_id: Uuid) -> Result<Option<Role>, sqlx::Error> {
    let row: Option<(String,)> = sqlx::query_as("SELECT role FROM profiles WHERE id = $1")
        .bind(profile_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.and_then(|(role,)| Role::parse(&role)))
}

pub async fn fetch_profile(pool: &PgPool, profile_id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>(
        "SELECT id, email, password_hash, role, created_at FROM profiles WHERE id = $1",
    )
    .bind(profile_id)
    .fetch_optional(pool)
    .await
}

/// Digest comparison against the stored hash. Returns the profile on match,
/// `None` for unknown email or wrong password; callers answer 401 for both so
/// the response does not reveal which part failed.
pub async fn verify_credentials(
    pool: &PgPool,
    email: &str,
    password: &str,
) -> Result<Option<Profile>, sqlx::Error> {
    let profile = sqlx::query_as::<_, Profile>(
        "SELECT id, email, password_hash, role, created_at FROM profiles WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(profile.filter(|p| p.password_hash == auth::hash_password(password)))
}
