use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account. Credentials are checked by the user directory at
/// login; bookings reference the user by id only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password: String,
}

impl User {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            password: password.into(),
        }
    }
}
