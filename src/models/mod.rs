pub mod user;

pub use user::{NewUser, ProfileChanges, Role, User, UserKey, UserSummary};
