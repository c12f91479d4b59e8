//! Access control predicates
//!
//! Each predicate answers one question about an actor and a request method.
//! Handlers evaluate the collection-level predicate before loading anything
//! and the object-level one after loading the target, then hand the answer
//! to [`require`] to get the right error for the caller.

use axum::http::Method;
use common::models::User;

use crate::error::{ApiError, ApiResult};

/// GET, HEAD and OPTIONS
pub fn is_safe(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Authenticated admins only
pub fn admin_only(actor: Option<&User>) -> bool {
    actor.is_some_and(User::is_admin)
}

/// Anyone may read; only admins may write
pub fn admin_or_read_only(actor: Option<&User>, method: &Method) -> bool {
    is_safe(method) || admin_only(actor)
}

/// Anyone may read; writes need an authenticated caller
pub fn authenticated_or_read_only(actor: Option<&User>, method: &Method) -> bool {
    is_safe(method) || actor.is_some()
}

/// Anyone may read; writes need the author, a moderator or an admin
pub fn author_or_admin_or_moderator(actor: Option<&User>, method: &Method, author_id: i64) -> bool {
    if is_safe(method) {
        return true;
    }
    actor.is_some_and(|user| user.id == author_id || user.is_moderator() || user.is_admin())
}

/// Any authenticated caller
pub fn authenticated(actor: Option<&User>) -> bool {
    actor.is_some()
}

/// Turn a predicate outcome into a result; anonymous callers get
/// `Unauthorized`, authenticated ones `PermissionDenied`.
pub fn require(allowed: bool, actor: Option<&User>) -> ApiResult<()> {
    match (allowed, actor) {
        (true, _) => Ok(()),
        (false, None) => Err(ApiError::Unauthorized),
        (false, Some(_)) => Err(ApiError::PermissionDenied),
    }
}
