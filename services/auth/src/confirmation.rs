//! Confirmation code issuance and verification
//!
//! Only an Argon2 hash of each code is stored. A code stays valid until its
//! TTL runs out or a new sign-up request replaces it.

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use chrono::{DateTime, Duration, Utc};
use common::models::User;
use rand::{Rng, distributions::Alphanumeric};

/// Length of generated confirmation codes
const CODE_LENGTH: usize = 16;

/// A freshly issued code; `code` is mailed, `hash` is stored
#[derive(Debug)]
pub struct IssuedCode {
    pub code: String,
    pub hash: String,
    pub issued_at: DateTime<Utc>,
}

/// Issues and checks confirmation codes
#[derive(Debug, Clone)]
pub struct ConfirmationCodes {
    ttl: Duration,
}

impl ConfirmationCodes {
    pub fn new(ttl_seconds: u64) -> Self {
        // Duration::seconds panics above i64::MAX / 1000
        let ttl_seconds = i64::try_from(ttl_seconds)
            .unwrap_or(i64::MAX)
            .min(i64::MAX / 1_000);
        Self {
            ttl: Duration::seconds(ttl_seconds),
        }
    }

    /// Generate a new random code and its hash
    pub fn issue(&self) -> Result<IssuedCode> {
        let code: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(CODE_LENGTH)
            .map(char::from)
            .collect();

        let salt = SaltString::generate(&mut rand::thread_rng());
        let hash = Argon2::default()
            .hash_password(code.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash confirmation code: {}", e))?
            .to_string();

        Ok(IssuedCode {
            code,
            hash,
            issued_at: Utc::now(),
        })
    }

    /// Check `presented` against the code currently stored for `user`
    pub fn verify(&self, user: &User, presented: &str, now: DateTime<Utc>) -> bool {
        let (Some(stored), Some(issued_at)) =
            (&user.confirmation_code_hash, user.confirmation_issued_at)
        else {
            return false;
        };

        if now.signed_duration_since(issued_at) > self.ttl {
            return false;
        }

        let Ok(parsed_hash) = PasswordHash::new(stored) else {
            return false;
        };

        Argon2::default()
            .verify_password(presented.as_bytes(), &parsed_hash)
            .is_ok()
    }
}
