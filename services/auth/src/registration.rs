//! Sign-up collision rules

use common::models::User;

use crate::error::AuthError;

/// What a sign-up request resolves to once existing accounts are known
#[derive(Debug)]
pub enum SignupTarget {
    /// Neither the username nor the email is taken
    New,
    /// The pair already belongs to one account; re-issue its code
    Existing(User),
}

/// Pick out the accounts owning `username` and `email` from the rows
/// returned by a single lookup on either
pub fn split_owners(
    owners: Vec<User>,
    username: &str,
    email: &str,
) -> (Option<User>, Option<User>) {
    let by_username = owners.iter().find(|user| user.username == username).cloned();
    let by_email = owners.into_iter().find(|user| user.email == email);
    (by_username, by_email)
}

/// Decide how to handle a sign-up given the accounts that already own the
/// requested username and email.
pub fn resolve_signup(
    by_username: Option<User>,
    by_email: Option<User>,
) -> Result<SignupTarget, AuthError> {
    match (by_username, by_email) {
        (None, None) => Ok(SignupTarget::New),
        (Some(user), Some(other)) if user.id == other.id => Ok(SignupTarget::Existing(user)),
        (Some(_), Some(_)) => Err(AuthError::Conflict(
            "Username and email belong to different accounts".to_string(),
        )),
        (Some(user), None) => Err(AuthError::Conflict(format!(
            "Username {} is already registered with another email",
            user.username
        ))),
        (None, Some(_)) => Err(AuthError::Conflict(
            "Email is already registered with another username".to_string(),
        )),
    }
}
