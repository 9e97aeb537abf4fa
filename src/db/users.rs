use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{NewUser, ProfileChanges, User, UserKey};

/// Predicates applied by `list`. `None` means "no constraint". Values are
/// already validated/normalized by the caller.
#[derive(Debug, Default)]
pub struct DirectoryFilter {
    pub role: Option<String>,
    pub location: Option<String>,
    pub pet_type: Option<String>,
}

pub async fn create(pool: &PgPool, new: &NewUser) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (name, email, password_hash, role, location, phone, image,
                            availability_from, availability_to,
                            pet_type, pet_name, pet_age, pet_breed, pet_gender, pet_image)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
         RETURNING *",
    )
    .bind(&new.name)
    .bind(&new.email)
    .bind(&new.password_hash)
    .bind(&new.role)
    .bind(&new.location)
    .bind(&new.phone)
    .bind(&new.image)
    .bind(new.availability_from)
    .bind(new.availability_to)
    .bind(&new.pet_type)
    .bind(&new.pet_name)
    .bind(new.pet_age)
    .bind(&new.pet_breed)
    .bind(&new.pet_gender)
    .bind(&new.pet_image)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_key(pool: &PgPool, key: &UserKey) -> Result<Option<User>, sqlx::Error> {
    match key {
        UserKey::Id(id) => find_by_id(pool, *id).await,
        UserKey::Email(email) => find_by_email(pool, email).await,
    }
}

/// Directory listing with the filters evaluated by the store. "other" buckets
/// every record whose pet type is absent or not one of the recognized kinds.
pub async fn list(pool: &PgPool, filter: &DirectoryFilter) -> Result<Vec<User>, sqlx::Error> {
    let location = filter.location.as_deref().map(escape_like);

    sqlx::query_as::<_, User>(
        "SELECT * FROM users
         WHERE ($1 IS NULL OR role = $1)
           AND ($2 IS NULL OR location ILIKE '%' || $2 || '%')
           AND ($3 IS NULL
                OR CASE WHEN $3 = 'other'
                        THEN pet_type IS NULL
                             OR lower(pet_type) NOT IN ('dog', 'cat', 'rabbit')
                        ELSE lower(pet_type) = $3
                   END)
         ORDER BY created_at DESC",
    )
    .bind(&filter.role)
    .bind(location)
    .bind(&filter.pet_type)
    .fetch_all(pool)
    .await
}

/// Field-sparse update. Returns `RowNotFound` if the id vanished between the
/// caller's existence check and this statement.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    changes: &ProfileChanges,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "UPDATE users SET
             name = COALESCE($2, name),
             location = COALESCE($3, location),
             phone = COALESCE($4, phone),
             availability_from = CASE WHEN $5 THEN $6 ELSE availability_from END,
             availability_to = CASE WHEN $7 THEN $8 ELSE availability_to END,
             pet_type = COALESCE($9, pet_type),
             pet_name = COALESCE($10, pet_name),
             pet_age = CASE WHEN $11 THEN $12 ELSE pet_age END,
             pet_breed = COALESCE($13, pet_breed),
             pet_gender = COALESCE($14, pet_gender),
             image = COALESCE($15, image),
             pet_image = COALESCE($16, pet_image)
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(&changes.name)
    .bind(&changes.location)
    .bind(&changes.phone)
    .bind(changes.availability_from.is_some())
    .bind(changes.availability_from.flatten())
    .bind(changes.availability_to.is_some())
    .bind(changes.availability_to.flatten())
    .bind(&changes.pet_type)
    .bind(&changes.pet_name)
    .bind(changes.pet_age.is_some())
    .bind(changes.pet_age.flatten())
    .bind(&changes.pet_breed)
    .bind(&changes.pet_gender)
    .bind(&changes.image)
    .bind(&changes.pet_image)
    .fetch_one(pool)
    .await
}

/// Returns the number of rows removed (0 when the id was already gone).
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

// Keeps user-supplied location text a literal substring match: backslash
// first, then the LIKE wildcards.
fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}
