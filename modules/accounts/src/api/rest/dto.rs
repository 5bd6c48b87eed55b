use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::contract::model::NewUser;

/// REST DTO for the registration request body.
///
/// Fields are optional so that missing ones surface as a 400 validation
/// error rather than a deserialization rejection.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RegisterReq {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// REST DTO for the login request body.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoginReq {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// REST DTO for a successful registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResp {
    pub message: String,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
}

/// REST DTO for a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResp {
    pub message: String,
    pub token: String,
}

impl RegisterReq {
    /// Both fields present, or no request at all.
    pub fn into_new_user(self) -> Option<NewUser> {
        match (self.username, self.password) {
            (Some(username), Some(password)) => Some(NewUser { username, password }),
            _ => None,
        }
    }
}
