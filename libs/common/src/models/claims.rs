//! Access token claims shared by the issuing and verifying services

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::Role;

/// Token type enum
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Access token
    Access,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// User ID
    pub sub: i64,
    /// Username at issue time
    pub username: String,
    /// Role at issue time; the API re-reads the user record on each request
    pub role: Role,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
    /// Unique token identifier
    pub jti: Uuid,
    /// Token type
    pub token_type: TokenType,
}
