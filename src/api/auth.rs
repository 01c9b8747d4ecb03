//! Credential verification and token handling.
//!
//! Passwords are stored as Argon2 hashes. A successful login issues an HS256
//! JWT whose subject is the user's email; protected handlers receive the
//! verified email through the [`Identity`] extractor.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::request::Parts,
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use super::error::ApiError;
use super::{results, JsonBody};
use crate::db::{DbPool, LoginRequest, User};
use crate::AppState;

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// JWT claims for access tokens. The subject carries the user's email.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Issue a signed access token for the given email
pub fn issue_token(
    email: &str,
    secret: &str,
    ttl_hours: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: email.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(ttl_hours)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify a token and return the email it was issued for
pub fn verify_token(token: &str, secret: &str) -> Result<String, ApiError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;
    Ok(data.claims.sub)
}

/// The verified identity behind a bearer token
#[derive(Debug, Clone)]
pub struct Identity {
    pub email: String,
}

/// Extract the token from request headers
fn extract_token(headers: &axum::http::HeaderMap) -> Option<&str> {
    let auth_header = headers.get("Authorization")?.to_str().ok()?;
    auth_header.strip_prefix("Bearer ")
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers)
            .ok_or_else(|| ApiError::unauthorized("Missing bearer token"))?;
        let email = verify_token(token, &state.config.auth.jwt_secret)?;
        Ok(Identity { email })
    }
}

/// Look up the user a favorite-scoped request targets and enforce that the
/// token identity owns it. The user is resolved before the identity is
/// compared, so a bogus `user_id` reads as not-found rather than forbidden.
pub async fn require_owner(
    pool: &DbPool,
    user_id: i64,
    identity: &Identity,
) -> Result<User, ApiError> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    let user = user.ok_or_else(|| ApiError::not_found("User does not exist"))?;

    if identity.email != user.email {
        return Err(ApiError::unauthorized("Not access allowed!"));
    }
    Ok(user)
}

/// Login endpoint
///
/// POST /login
pub async fn login(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    if request.email.is_empty() {
        return Err(ApiError::validation("Email field can not be empty"));
    }
    if request.password.is_empty() {
        return Err(ApiError::validation("Password field can not be empty"));
    }

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
        .bind(&request.email)
        .fetch_optional(&state.db)
        .await?;
    let user = user.ok_or_else(|| ApiError::not_found("User does not exist"))?;

    if !verify_password(&request.password, &user.password_hash) {
        return Err(ApiError::unauthorized("Bad email or password"));
    }

    let token = issue_token(
        &user.email,
        &state.config.auth.jwt_secret,
        state.config.auth.token_ttl_hours,
    )
    .map_err(|e| {
        tracing::error!("Failed to sign access token: {}", e);
        ApiError::internal("Failed to issue access token")
    })?;

    Ok(results(json!({ "access_token": token })))
}
