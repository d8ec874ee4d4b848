//! Browser authentication endpoints
//!
//! Registration and login here set the `token` cookie. The mobile
//! equivalents in [`super::mobile`] share the same flows and return the
//! token in the body instead.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use super::error::{ApiError, ApiResult};
use super::extract::WebIdentity;
use super::routes::{parse_body, MessageResponse};
use super::server::{AppState, SharedState};
use crate::auth::models::{LoginRequest, RegisterRequest, User, UserProfile, UserSummary};
use crate::auth::session::{clear_session_cookie, session_cookie};
use crate::auth::validation::{validate_login, validate_password, validate_registration};
use crate::error::Error;

/// Message for every failed login, whichever part was wrong
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    pub user: UserSummary,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: UserProfile,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// Validate, store, and issue a token for a new account.
///
/// Each storage and crypto step reports its own failure reason.
pub(crate) async fn register_account(
    state: &AppState,
    body: &[u8],
    ttl: chrono::Duration,
) -> ApiResult<(User, String)> {
    let req: RegisterRequest = parse_body(body)?;
    let new = validate_registration(req)?;

    match state.store.users.email_exists(&new.email).await {
        Ok(false) => {}
        Ok(true) => return Err(ApiError::conflict(Error::EmailTaken.to_string())),
        Err(e) => return Err(ApiError::storage("Error checking user existence", e)),
    }

    let password_hash = state
        .passwords
        .hash(&new.password)
        .await
        .map_err(|e| ApiError::internal("Error processing password", e))?;

    let user = User::new(new.name, new.email, password_hash);
    state.store.users.insert(&user).await.map_err(|e| match e {
        Error::EmailTaken => ApiError::conflict(Error::EmailTaken.to_string()),
        e => ApiError::storage("Error creating user account", e),
    })?;

    let token = state
        .tokens
        .issue(&user, ttl)
        .map_err(|e| ApiError::internal("Error generating authentication token", e))?;

    tracing::info!(user_id = %user.id, "Registered user");
    Ok((user, token))
}

/// Check credentials, answering unknown emails and wrong passwords alike
pub(crate) async fn authenticate(state: &AppState, body: &[u8]) -> ApiResult<User> {
    let req: LoginRequest = parse_body(body)?;
    let credentials = validate_login(req)?;

    let user = state
        .store
        .users
        .find_by_email(&credentials.email)
        .await
        .map_err(|e| ApiError::storage("Error looking up user", e))?;

    let Some(user) = user else {
        state.passwords.verify_dummy(&credentials.password).await;
        tracing::debug!("Login failed: unknown email");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    let valid = state
        .passwords
        .verify(&credentials.password, &user.password_hash)
        .await
        .map_err(|e| ApiError::internal("Error verifying password", e))?;

    if !valid {
        tracing::debug!(user_id = %user.id, "Login failed: wrong password");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    Ok(user)
}

pub async fn register(State(state): State<SharedState>, body: Bytes) -> ApiResult<impl IntoResponse> {
    let ttl = state.config.auth.web_token_ttl();
    let (user, token) = register_account(&state, &body, ttl).await?;

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, session_cookie(&token, ttl, state.secure_cookies()))],
        Json(AuthResponse {
            message: "User created successfully",
            user: UserSummary::from(&user),
        }),
    ))
}

pub async fn login(State(state): State<SharedState>, body: Bytes) -> ApiResult<impl IntoResponse> {
    let user = authenticate(&state, &body).await?;

    let ttl = state.config.auth.web_token_ttl();
    let token = state
        .tokens
        .issue(&user, ttl)
        .map_err(|e| ApiError::internal("Error generating authentication token", e))?;

    tracing::info!(user_id = %user.id, "User logged in");
    Ok((
        [(header::SET_COOKIE, session_cookie(&token, ttl, state.secure_cookies()))],
        Json(AuthResponse {
            message: "Login successful",
            user: UserSummary::from(&user),
        }),
    ))
}

pub async fn logout(State(state): State<SharedState>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, clear_session_cookie(state.secure_cookies()))],
        MessageResponse::new("Logged out successfully"),
    )
}

pub async fn me(
    State(state): State<SharedState>,
    WebIdentity(identity): WebIdentity,
) -> ApiResult<Json<ProfileResponse>> {
    let user = state
        .store
        .users
        .find_by_id(identity.user_id)
        .await
        .map_err(|e| ApiError::storage("Error fetching user", e))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(ProfileResponse {
        user: UserProfile::from(&user),
    }))
}

pub async fn update_me(
    State(state): State<SharedState>,
    WebIdentity(identity): WebIdentity,
    body: Bytes,
) -> ApiResult<Json<ProfileResponse>> {
    let req: UpdateProfileRequest = parse_body(&body)?;
    let name = req
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::validation("Name is required"))?;

    let user = state
        .store
        .users
        .update_name(identity.user_id, &name)
        .await
        .map_err(|e| ApiError::storage("Error updating user", e))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(ProfileResponse {
        user: UserProfile::from(&user),
    }))
}

pub async fn change_password(
    State(state): State<SharedState>,
    WebIdentity(identity): WebIdentity,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let req: ChangePasswordRequest = parse_body(&body)?;
    let (Some(current), Some(new)) = (
        req.current_password.filter(|p| !p.is_empty()),
        req.new_password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::validation("Current and new password are required"));
    };
    validate_password(&new)?;

    let user = state
        .store
        .users
        .find_by_id(identity.user_id)
        .await
        .map_err(|e| ApiError::storage("Error fetching user", e))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let valid = state
        .passwords
        .verify(&current, &user.password_hash)
        .await
        .map_err(|e| ApiError::internal("Error verifying password", e))?;
    if !valid {
        return Err(ApiError::validation("Current password is incorrect"));
    }

    let password_hash = state
        .passwords
        .hash(&new)
        .await
        .map_err(|e| ApiError::internal("Error processing password", e))?;

    let updated = state
        .store
        .users
        .update_password(user.id, &password_hash)
        .await
        .map_err(|e| ApiError::storage("Error updating password", e))?;
    if !updated {
        return Err(ApiError::not_found("User not found"));
    }

    tracing::info!(user_id = %user.id, "Password changed");
    Ok(MessageResponse::new("Password updated successfully"))
}
