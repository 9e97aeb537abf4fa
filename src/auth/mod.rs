pub mod extractor;
pub mod jwt;
pub mod password;

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::error::AppError;

/// Minimal identity handed to the session layer on a successful login.
/// Never carries the stored hash.
#[derive(Debug, Clone, Serialize)]
pub struct Identity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Check a credential pair against the store. Unknown account, missing
/// password hash and wrong password all collapse to `None` so callers
/// cannot tell which one applied.
pub async fn verify_credentials(
    pool: &PgPool,
    email: &str,
    password: &str,
) -> Result<Option<Identity>, AppError> {
    if email.is_empty() || password.is_empty() {
        return Ok(None);
    }

    let Some(user) = db::users::find_by_email(pool, email).await? else {
        return Ok(None);
    };

    let Some(stored_hash) = user.password_hash.as_deref() else {
        return Ok(None);
    };

    let valid = password::verify(password, stored_hash).map_err(AppError::Internal)?;
    if !valid {
        return Ok(None);
    }

    Ok(Some(Identity {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
    }))
}
