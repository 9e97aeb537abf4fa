use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    pub role: String,
    pub location: String,
    pub phone: Option<String>,
    pub image: Option<String>,
    pub availability_from: Option<NaiveDate>,
    pub availability_to: Option<NaiveDate>,
    pub pet_type: Option<String>,
    pub pet_name: Option<String>,
    pub pet_age: Option<i32>,
    pub pet_breed: Option<String>,
    pub pet_gender: Option<String>,
    pub pet_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Directory projection: the fields safe to expose in bulk listings.
/// Email, phone and the availability window stay out of it.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub role: String,
    pub location: String,
    pub image: Option<String>,
    pub pet_type: Option<String>,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        UserSummary {
            id: user.id,
            name: user.name,
            role: user.role,
            location: user.location,
            image: user.image,
            pet_type: user.pet_type,
        }
    }
}

/// Insert payload assembled by the registration pipeline. The password is
/// already hashed by the time this struct exists.
#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub location: String,
    pub phone: Option<String>,
    pub image: Option<String>,
    pub availability_from: Option<NaiveDate>,
    pub availability_to: Option<NaiveDate>,
    pub pet_type: Option<String>,
    pub pet_name: Option<String>,
    pub pet_age: Option<i32>,
    pub pet_breed: Option<String>,
    pub pet_gender: Option<String>,
    pub pet_image: Option<String>,
}

/// Field-sparse update payload: `None` leaves the column untouched. The
/// lenient fields (availability window, pet age) are double-wrapped so that
/// a provided-but-unparsable value clears the column instead of erroring.
#[derive(Debug, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub availability_from: Option<Option<NaiveDate>>,
    pub availability_to: Option<Option<NaiveDate>>,
    pub pet_type: Option<String>,
    pub pet_name: Option<String>,
    pub pet_age: Option<Option<i32>>,
    pub pet_breed: Option<String>,
    pub pet_gender: Option<String>,
    pub image: Option<String>,
    pub pet_image: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Owner,
    Caretaker,
}

impl Role {
    pub fn parse(raw: &str) -> Option<Role> {
        match raw {
            "owner" => Some(Role::Owner),
            "caretaker" => Some(Role::Caretaker),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Caretaker => "caretaker",
        }
    }
}

/// Lookup key for single-user operations: the canonical id, or the email as
/// a documented secondary key. Anything that parses as a UUID is an id.
#[derive(Debug, Clone)]
pub enum UserKey {
    Id(Uuid),
    Email(String),
}

impl UserKey {
    pub fn parse(raw: &str) -> UserKey {
        match Uuid::parse_str(raw) {
            Ok(id) => UserKey::Id(id),
            Err(_) => UserKey::Email(raw.to_string()),
        }
    }
}
