use crate::db;
use crate::error::AppError;
use crate::models::{ProfileChanges, User};
use crate::state::SharedState;

use super::parser::{self, ParsedForm};
use super::registration::store_image;

/// Assemble field-sparse changes from a parsed body. Fields absent from the
/// payload keep their stored values; date and age fields that are present
/// but unreadable clear the column. Identity fields (id, email, role,
/// password, created_at) are not writable here.
pub fn changes_from_form(form: &ParsedForm) -> ProfileChanges {
    let mut changes = ProfileChanges::default();

    if form.has("name") {
        changes.name = form.text("name");
    }
    if form.has("location") {
        changes.location = form.text("location");
    }
    if form.has("phone") {
        changes.phone = form.text("phone");
    }
    if form.has("image") {
        changes.image = form.text("image");
    }
    if form.has("pet_type") {
        changes.pet_type = form.text("pet_type");
    }
    if form.has("pet_name") {
        changes.pet_name = form.text("pet_name");
    }
    if form.has("pet_breed") {
        changes.pet_breed = form.text("pet_breed");
    }
    if form.has("pet_gender") {
        changes.pet_gender = form.text("pet_gender");
    }
    if form.has("pet_image") {
        changes.pet_image = form.text("pet_image");
    }

    if form.has("availability_from") {
        changes.availability_from = Some(
            form.text("availability_from")
                .and_then(|raw| parser::parse_date(&raw)),
        );
    }
    if form.has("availability_to") {
        changes.availability_to = Some(
            form.text("availability_to")
                .and_then(|raw| parser::parse_date(&raw)),
        );
    }
    if form.has("pet_age") {
        changes.pet_age = Some(
            form.text("pet_age")
                .and_then(|raw| parser::parse_age(&raw)),
        );
    }

    changes
}

/// Apply an update to `target`: store any replacement images, write the row,
/// then drop the files the update displaced.
pub async fn apply_update(
    state: &SharedState,
    target: &User,
    form: &ParsedForm,
) -> Result<User, AppError> {
    let mut changes = changes_from_form(form);

    if let Some(path) = store_image(state, form.file("image")).await? {
        changes.image = Some(path);
    }
    if let Some(path) = store_image(state, form.file("pet_image")).await? {
        changes.pet_image = Some(path);
    }

    let updated = db::users::update(&state.pool, target.id, &changes)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::NotFound("User not found".to_string()),
            _ => AppError::Database(e),
        })?;

    // The row now points at the replacements; the old files are unreferenced.
    if changes.image.is_some() && changes.image.as_deref() != target.image.as_deref() {
        if let Some(old) = &target.image {
            state.uploads.remove(old).await;
        }
    }
    if changes.pet_image.is_some() && changes.pet_image.as_deref() != target.pet_image.as_deref() {
        if let Some(old) = &target.pet_image {
            state.uploads.remove(old).await;
        }
    }

    Ok(updated)
}
