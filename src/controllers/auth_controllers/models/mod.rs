use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::user_models::User;

#[derive(Deserialize)]
pub struct CredentialsRequest {
    #[serde(alias = "userName", default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// A user as shown to clients; never carries the password hash.
#[derive(Serialize, Deserialize, Debug)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_hex(),
            username: user.username,
            created_at: user.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    pub success: bool,
    pub user: UserResponse,
    pub token: String,
}
