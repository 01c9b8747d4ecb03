//! User listing and signup endpoints.

use axum::{extract::State, Json};
use serde_json::Value;
use std::sync::Arc;

use super::auth::hash_password;
use super::error::ApiError;
use super::{results, JsonBody};
use crate::db::{RegisterRequest, User, UserResponse};
use crate::AppState;

/// List all users (public fields only)
///
/// GET /user
pub async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let users: Vec<User> = sqlx::query_as("SELECT * FROM users ORDER BY id")
        .fetch_all(&state.db)
        .await?;

    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(results(users))
}

/// Register a new user
///
/// POST /user
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> Result<Json<Value>, ApiError> {
    if request.name.is_empty() {
        return Err(ApiError::validation("Name field can not be empty"));
    }
    if request.email.is_empty() {
        return Err(ApiError::validation("Email field can not be empty"));
    }
    if request.password.is_empty() {
        return Err(ApiError::validation("Password field can not be empty"));
    }

    let existing: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
        .bind(&request.email)
        .fetch_optional(&state.db)
        .await?;
    if existing.is_some() {
        return Err(ApiError::conflict("Email not available"));
    }

    let password_hash = hash_password(&request.password).map_err(|e| {
        tracing::error!("Failed to hash password: {}", e);
        ApiError::internal("Failed to hash password")
    })?;
    let now = chrono::Utc::now().to_rfc3339();

    // The UNIQUE constraint on email backs up the availability check above;
    // a racing duplicate insert converts to a conflict error.
    let result = sqlx::query(
        "INSERT INTO users (name, email, password_hash, is_active, created_at) VALUES (?, ?, ?, 1, ?)",
    )
    .bind(&request.name)
    .bind(&request.email)
    .bind(&password_hash)
    .bind(&now)
    .execute(&state.db)
    .await?;

    let user: User = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(result.last_insert_rowid())
        .fetch_one(&state.db)
        .await?;

    tracing::info!(email = %user.email, "Registered user");
    Ok(results(UserResponse::from(user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ErrorKind;
    use crate::test_state;

    fn register(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn signup_returns_public_fields_only() {
        let state = test_state().await;
        let body = create_user(
            State(state),
            JsonBody(register("Leia", "leia@rebel.org", "secret")),
        )
        .await
        .unwrap();

        let user = &body.0["results"];
        assert_eq!(user["name"], "Leia");
        assert_eq!(user["email"], "leia@rebel.org");
        assert!(user["id"].as_i64().unwrap() >= 1);
        assert!(user.get("password").is_none());
        assert!(user.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn signup_rejects_missing_fields() {
        let state = test_state().await;
        let err = create_user(State(state), JsonBody(register("", "leia@rebel.org", "secret")))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let state = test_state().await;
        create_user(
            State(state.clone()),
            JsonBody(register("Leia", "leia@rebel.org", "secret")),
        )
        .await
        .unwrap();

        let err = create_user(
            State(state),
            JsonBody(register("Impostor", "leia@rebel.org", "other")),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn list_never_exposes_hashes() {
        let state = test_state().await;
        create_user(
            State(state.clone()),
            JsonBody(register("Leia", "leia@rebel.org", "secret")),
        )
        .await
        .unwrap();

        let body = list_users(State(state)).await.unwrap();
        let listed = body.0["results"].as_array().unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].get("password_hash").is_none());
    }
}
