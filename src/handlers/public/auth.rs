use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::auth::{self, Claims};
use crate::config;
use crate::database::models::{NewUser, User, UserRole};
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::storage::UserStore;

/// Default password minimum length
const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: User,
    pub expires_in: u64,
}

/// POST /auth/register - create an account. Self-registration always yields
/// the student role; promotions happen out of band.
pub async fn register(Json(payload): Json<NewUser>) -> ApiResult<SessionResponse> {
    let mut field_errors = HashMap::new();
    if let Err(msg) = validate_username(&payload.username) {
        field_errors.insert("username".to_string(), msg);
    }
    if let Err(msg) = validate_email(&payload.email) {
        field_errors.insert("email".to_string(), msg);
    }
    if payload.password.len() < MIN_PASSWORD_LENGTH {
        field_errors.insert(
            "password".to_string(),
            format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
        );
    }
    if !field_errors.is_empty() {
        return Err(ApiError::validation_error(
            "Invalid registration request",
            Some(field_errors),
        ));
    }

    let password_hash = auth::hash_password(&payload.password).map_err(|e| {
        tracing::error!("Password hashing failed: {}", e);
        ApiError::internal_server_error("Failed to create account")
    })?;

    let store = UserStore::new().await?;

    if store.get_by_username(&payload.username).await?.is_some() {
        return Err(ApiError::conflict("Username is already taken"));
    }

    let user = store
        .insert(
            &payload.username,
            &payload.email,
            &password_hash,
            payload.first_name.as_deref(),
            payload.last_name.as_deref(),
            UserRole::Student,
        )
        .await?;

    let session = issue_session(user)?;
    Ok(ApiResponse::created(session))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /auth/login - verify credentials and return a JWT plus the user
pub async fn login(Json(payload): Json<LoginRequest>) -> ApiResult<SessionResponse> {
    let store = UserStore::new().await?;

    let user = store
        .get_by_username(&payload.username)
        .await?
        .ok_or_else(invalid_credentials)?;

    let matches = auth::verify_password(&payload.password, &user.password).map_err(|e| {
        tracing::error!("Password verification failed: {}", e);
        ApiError::internal_server_error("Failed to verify credentials")
    })?;

    if !matches {
        return Err(invalid_credentials());
    }

    let session = issue_session(user)?;
    Ok(ApiResponse::success(session))
}

fn invalid_credentials() -> ApiError {
    // Same message whether the username or the password was wrong
    ApiError::unauthorized("Invalid username or password")
}

fn issue_session(user: User) -> Result<SessionResponse, ApiError> {
    let claims = Claims::new(user.id, user.username.clone(), user.role);
    let token = auth::generate_jwt(&claims).map_err(|e| {
        tracing::error!("JWT generation failed: {}", e);
        ApiError::internal_server_error("Failed to create session")
    })?;

    Ok(SessionResponse {
        token,
        user,
        expires_in: config::config().security.jwt_expiry_hours * 3600,
    })
}

fn validate_username(username: &str) -> Result<(), String> {
    if username.len() < 3 {
        return Err("Username must be at least 3 characters".to_string());
    }
    if username.len() > 50 {
        return Err("Username must be less than 50 characters".to_string());
    }
    if !username.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err(
            "Username can only contain letters, numbers, underscore, and hyphen".to_string(),
        );
    }
    match username.chars().next() {
        Some(c) if c.is_alphanumeric() => Ok(()),
        _ => Err("Username must start with a letter or number".to_string()),
    }
}

fn validate_email(email: &str) -> Result<(), String> {
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() || !parts[1].contains('.') {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules() {
        assert!(validate_username("maria_k").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("_leading").is_err());
        assert!(validate_username("has space").is_err());
    }

    #[test]
    fn email_rules() {
        assert!(validate_email("maria@example.com").is_ok());
        assert!(validate_email("maria@localhost").is_err());
        assert!(validate_email("no-at-sign.com").is_err());
        assert!(validate_email("@example.com").is_err());
    }
}
