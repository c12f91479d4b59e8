//! User model and role derivation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// Role stored on every user record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Moderator,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Role::User),
            "moderator" => Ok(Role::Moderator),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

/// Where a user stands in the sign-up flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationState {
    /// A code has been issued but never exchanged for a token
    Pending,
    /// A code has been exchanged at least once
    Confirmed,
}

/// User entity
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: Role,
    pub is_superuser: bool,
    pub is_staff: bool,
    pub confirmation_code_hash: Option<String>,
    pub confirmation_issued_at: Option<DateTime<Utc>>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Column list matching the [`User`] row layout
    pub const COLUMNS: &'static str = "id, username, email, first_name, last_name, bio, role, \
         is_superuser, is_staff, confirmation_code_hash, confirmation_issued_at, \
         confirmed_at, created_at, updated_at";

    /// Admins are role=admin, superusers and staff accounts
    pub fn is_admin(&self) -> bool {
        self.is_superuser || self.is_staff || self.role == Role::Admin
    }

    /// Moderators are role=moderator and superusers
    pub fn is_moderator(&self) -> bool {
        self.role == Role::Moderator || self.is_superuser
    }

    pub fn confirmation_state(&self) -> ConfirmationState {
        if self.confirmed_at.is_some() {
            ConfirmationState::Confirmed
        } else {
            ConfirmationState::Pending
        }
    }

    /// Build a plain user for tests and fixtures
    pub fn with_role(id: i64, username: &str, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id,
            username: username.to_string(),
            email: format!("{username}@example.com"),
            first_name: String::new(),
            last_name: String::new(),
            bio: String::new(),
            role,
            is_superuser: false,
            is_staff: false,
            confirmation_code_hash: None,
            confirmation_issued_at: None,
            confirmed_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}
