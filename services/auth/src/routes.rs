//! Authentication service routes

use axum::{
    Json, Router,
    extract::{FromRequest, State},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use common::{
    models::{ConfirmationState, User},
    validators::{FieldError, validate_email_address, validate_username},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::{
    AppState,
    error::AuthError,
    registration::{SignupTarget, resolve_signup, split_owners},
};

/// JSON body extractor that reports malformed input as a field error
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AuthError))]
pub struct AppJson<T>(pub T);

/// Request for sign-up
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
}

/// Response for sign-up
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub username: String,
    pub email: String,
}

/// Request for token exchange
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub confirmation_code: String,
}

/// Response for token exchange
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/v1/auth/signup", post(signup))
        .route("/v1/auth/token", post(token))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "auth-service"
    }))
}

/// Sign-up endpoint
///
/// Creates a pending user (or finds the one already owning this exact
/// username and email), stores a fresh confirmation code and mails it.
pub async fn signup(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SignupRequest>,
) -> Result<Json<SignupResponse>, AuthError> {
    let username = validate_username(&payload.username)?;
    let email = validate_email_address(&payload.email)?;

    info!("Sign-up request for user: {}", username);

    let user = claim_account(&state, username, email).await?;

    let issued = state.confirmation_codes.issue().map_err(|e| {
        error!("Failed to issue confirmation code: {}", e);
        AuthError::InternalServerError
    })?;

    state
        .user_repository
        .store_confirmation(user.id, &issued.hash, issued.issued_at)
        .await?;

    state
        .mailer
        .send(
            &user.email,
            "YaMDb confirmation code",
            &format!(
                "Hello {},\n\nYour confirmation code is: {}\n\nExchange it for an access token at /v1/auth/token.\n",
                user.username, issued.code
            ),
        )
        .await?;

    Ok(Json(SignupResponse {
        username: user.username,
        email: user.email,
    }))
}

/// Find or create the account a sign-up refers to
///
/// A unique violation on insert means a concurrent sign-up created the row
/// first, so the owners are read again and resolved once more.
async fn claim_account(state: &AppState, username: &str, email: &str) -> Result<User, AuthError> {
    let owners = state.user_repository.find_owners(username, email).await?;
    let (by_username, by_email) = split_owners(owners, username, email);

    let error = match resolve_signup(by_username, by_email)? {
        SignupTarget::Existing(user) => {
            info!("Re-issuing confirmation code for user: {}", user.username);
            return Ok(user);
        }
        SignupTarget::New => match state.user_repository.create(username, email).await {
            Ok(user) => return Ok(user),
            Err(error) => error,
        },
    };

    if !matches!(
        error.unique_constraint(),
        Some("users_username_key" | "users_email_key")
    ) {
        return Err(error.into());
    }

    warn!("Concurrent sign-up for user {}, resolving again", username);
    let owners = state.user_repository.find_owners(username, email).await?;
    let (by_username, by_email) = split_owners(owners, username, email);

    match resolve_signup(by_username, by_email)? {
        SignupTarget::Existing(user) => Ok(user),
        SignupTarget::New => Err(error.into()),
    }
}

/// Token exchange endpoint
pub async fn token(
    State(state): State<AppState>,
    AppJson(payload): AppJson<TokenRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    if payload.username.is_empty() {
        return Err(FieldError::new("username", "Username is required").into());
    }
    if payload.confirmation_code.is_empty() {
        return Err(FieldError::new("confirmation_code", "Confirmation code is required").into());
    }

    let user = state
        .user_repository
        .find_by_username(&payload.username)
        .await?
        .ok_or_else(|| AuthError::NotFound(format!("User {} not found", payload.username)))?;

    if !state
        .confirmation_codes
        .verify(&user, &payload.confirmation_code, Utc::now())
    {
        warn!("Invalid confirmation code for user: {}", user.username);
        return Err(AuthError::InvalidCredentials);
    }

    if user.confirmation_state() == ConfirmationState::Pending {
        info!("Confirming user: {}", user.username);
        state.user_repository.mark_confirmed(user.id).await?;
    }

    let token = state.jwt_service.generate_access_token(&user).map_err(|e| {
        error!("Failed to generate access token: {}", e);
        AuthError::InternalServerError
    })?;

    Ok(Json(TokenResponse { token }))
}
