use chrono::NaiveDate;

use crate::auth::password;
use crate::db;
use crate::error::AppError;
use crate::models::{NewUser, Role, User};
use crate::state::SharedState;

use super::parser::{self, FilePart, ParsedForm};

pub const MIN_PASSWORD_LEN: usize = 6;

/// A registration request after validation, ready to hash and persist.
#[derive(Debug)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub location: String,
    pub phone: Option<String>,
    pub availability_from: Option<NaiveDate>,
    pub availability_to: Option<NaiveDate>,
    pub pet_type: Option<String>,
    pub pet_name: Option<String>,
    pub pet_age: Option<i32>,
    pub pet_breed: Option<String>,
    pub pet_gender: Option<String>,
    pub image: Option<FilePart>,
    pub pet_image: Option<FilePart>,
}

impl Registration {
    /// Apply the field rules to a parsed body. Pet fields are only read for
    /// owners; a caretaker submitting them gets them dropped.
    pub fn from_form(form: &ParsedForm) -> Result<Registration, AppError> {
        let name = required(form, "name")?;
        let email = required(form, "email")?;
        let password = required(form, "password")?;
        let location = required(form, "location")?;

        if !email.contains('@') {
            return Err(AppError::BadRequest("Invalid email address".to_string()));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::BadRequest(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let role_raw = required(form, "role")?;
        let role = Role::parse(&role_raw).ok_or_else(|| {
            AppError::BadRequest("Role must be either \"owner\" or \"caretaker\"".to_string())
        })?;

        let pet_type = optional(form, "pet_type");
        if role == Role::Owner && pet_type.is_none() {
            return Err(AppError::BadRequest(
                "Pet type is required for pet owners".to_string(),
            ));
        }

        let (pet_type, pet_name, pet_age, pet_breed, pet_gender, pet_image) = match role {
            Role::Owner => (
                pet_type,
                optional(form, "pet_name"),
                optional(form, "pet_age").and_then(|raw| parser::parse_age(&raw)),
                optional(form, "pet_breed"),
                optional(form, "pet_gender"),
                form.file("pet_image").cloned(),
            ),
            Role::Caretaker => (None, None, None, None, None, None),
        };

        Ok(Registration {
            name,
            email,
            password,
            role,
            location,
            phone: optional(form, "phone"),
            availability_from: optional(form, "availability_from")
                .and_then(|raw| parser::parse_date(&raw)),
            availability_to: optional(form, "availability_to")
                .and_then(|raw| parser::parse_date(&raw)),
            pet_type,
            pet_name,
            pet_age,
            pet_breed,
            pet_gender,
            image: form.file("image").cloned(),
            pet_image,
        })
    }
}

/// Validate a parsed body, store any image uploads, and insert the account.
/// Duplicate emails surface as a conflict whether caught by the pre-check or
/// by the unique index.
pub async fn register(state: &SharedState, form: &ParsedForm) -> Result<User, AppError> {
    let registration = Registration::from_form(form)?;

    if db::users::find_by_email(&state.pool, &registration.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "User with this email already exists".to_string(),
        ));
    }

    let image = store_image(state, registration.image.as_ref()).await?;
    let pet_image = store_image(state, registration.pet_image.as_ref()).await?;

    let password_hash = password::hash(&registration.password).map_err(AppError::Internal)?;

    let new_user = NewUser {
        name: registration.name,
        email: registration.email,
        password_hash,
        role: registration.role.as_str().to_string(),
        location: registration.location,
        phone: registration.phone,
        image,
        availability_from: registration.availability_from,
        availability_to: registration.availability_to,
        pet_type: registration.pet_type,
        pet_name: registration.pet_name,
        pet_age: registration.pet_age,
        pet_breed: registration.pet_breed,
        pet_gender: registration.pet_gender,
        pet_image,
    };

    db::users::create(&state.pool, &new_user)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("User with this email already exists".to_string())
            }
            _ => AppError::Database(e),
        })
}

/// Store an uploaded part if it is an image. Non-image uploads are skipped
/// silently; the record keeps whatever path it already had.
pub async fn store_image(
    state: &SharedState,
    part: Option<&FilePart>,
) -> Result<Option<String>, AppError> {
    let Some(part) = part else {
        return Ok(None);
    };
    if !part.is_image() {
        tracing::debug!("Skipping non-image upload {}", part.file_name);
        return Ok(None);
    }
    let path = state.uploads.save(&part.file_name, &part.bytes).await?;
    Ok(Some(path))
}

fn required(form: &ParsedForm, key: &str) -> Result<String, AppError> {
    optional(form, key)
        .ok_or_else(|| AppError::BadRequest(format!("Missing required field: {key}")))
}

fn optional(form: &ParsedForm, key: &str) -> Option<String> {
    form.text(key).filter(|value| !value.is_empty())
}
