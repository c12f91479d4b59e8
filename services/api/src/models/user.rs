//! User management payloads

use common::models::{Role, User};
use common::validators::{
    FieldError, NAME_MAX_LENGTH, validate_email_address, validate_max_length, validate_username,
};
use serde::{Deserialize, Serialize};

/// User as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: Role,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            bio: user.bio,
            role: user.role,
        }
    }
}

/// Request for user creation by an admin
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub role: Role,
}

impl CreateUser {
    pub fn validate(&self) -> Result<(), FieldError> {
        validate_username(&self.username)?;
        validate_email_address(&self.email)?;
        validate_max_length("first_name", &self.first_name, NAME_MAX_LENGTH)?;
        validate_max_length("last_name", &self.last_name, NAME_MAX_LENGTH)?;
        Ok(())
    }
}

/// Request for a partial user update
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<Role>,
}

impl UpdateUser {
    pub fn validate(&self) -> Result<(), FieldError> {
        if let Some(username) = &self.username {
            validate_username(username)?;
        }
        if let Some(email) = &self.email {
            validate_email_address(email)?;
        }
        if let Some(first_name) = &self.first_name {
            validate_max_length("first_name", first_name, NAME_MAX_LENGTH)?;
        }
        if let Some(last_name) = &self.last_name {
            validate_max_length("last_name", last_name, NAME_MAX_LENGTH)?;
        }
        Ok(())
    }
}
