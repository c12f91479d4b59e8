//! Authentication middleware and identity extractors
//!
//! The middleware never rejects a request for lacking credentials. It only
//! rejects credentials that are present but invalid; anonymous requests pass
//! through and the permission predicates decide what they may do.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use common::models::{Claims, TokenType, User};
use jsonwebtoken::{DecodingKey, Validation};
use std::env;
use tracing::{debug, warn};

use crate::{
    error::{ApiError, ApiResult},
    permissions::{authenticated, require},
    state::AppState,
};

/// Verifies access tokens issued by the authentication service
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    /// Build a verifier from a PEM encoded RSA public key
    pub fn new(public_key_pem: &str) -> anyhow::Result<Self> {
        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())?;
        let mut validation = Validation::new(jsonwebtoken::Algorithm::RS256);
        validation.validate_exp = true;

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Create a verifier from `JWT_PUBLIC_KEY`, which holds either the PEM
    /// text or a path to it (tried relative to the CWD, then the crate root)
    pub fn from_env() -> anyhow::Result<Self> {
        let public_key = env::var("JWT_PUBLIC_KEY")
            .map_err(|_| anyhow::anyhow!("JWT_PUBLIC_KEY environment variable not set"))?;

        let public_key = if public_key.starts_with("-----BEGIN") {
            public_key
        } else {
            std::fs::read_to_string(&public_key)
                .or_else(|_| {
                    let mut path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
                    path.push(&public_key);
                    std::fs::read_to_string(path)
                })
                .map_err(|e| anyhow::anyhow!("Failed to read public key file: {}", e))?
                .trim()
                .to_string()
        };

        Self::new(&public_key)
    }

    /// Validate a token and return its claims
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let token_data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }
}

/// Resolve the caller from an optional bearer token
///
/// On success the current [`User`] record is inserted into the request
/// extensions, so role changes take effect without re-issuing tokens.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> ApiResult<Response> {
    let header = req
        .headers()
        .typed_try_get::<Authorization<Bearer>>()
        .map_err(|_| {
            warn!("Malformed Authorization header");
            ApiError::Unauthorized
        })?;

    if let Some(Authorization(bearer)) = header {
        let claims = state.jwt_verifier.verify(bearer.token()).map_err(|e| {
            warn!("Failed to validate token: {}", e);
            ApiError::Unauthorized
        })?;

        if claims.token_type != TokenType::Access {
            return Err(ApiError::Unauthorized);
        }

        let user = state
            .user_repository
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| {
                warn!("Token subject {} no longer exists", claims.sub);
                ApiError::Unauthorized
            })?;

        debug!("Authenticated request for user: {}", user.username);
        req.extensions_mut().insert(user);
    }

    Ok(next.run(req).await)
}

/// Authenticated user extractor; anonymous callers are rejected
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts.extensions.get::<User>();
        require(authenticated(user), user)?;

        user.cloned().map(AuthUser).ok_or(ApiError::Unauthorized)
    }
}

/// Optional authenticated user extractor
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

impl MaybeUser {
    pub fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<User>().cloned()))
    }
}
