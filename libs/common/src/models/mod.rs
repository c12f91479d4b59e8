//! Models shared across services

pub mod claims;
pub mod user;

// Re-export for convenience
pub use claims::{Claims, TokenType};
pub use user::{ConfirmationState, Role, User};
