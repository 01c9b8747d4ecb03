//! Per-user favorites over the catalog entities.
//!
//! All three favorite kinds share one set of handlers; the `:kind` path
//! segment picks the join table and foreign-key column. Every endpoint here
//! is scoped to the user named in the request: the token identity must match
//! that user's email or the call is rejected.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use std::sync::Arc;

use super::auth::{require_owner, Identity};
use super::error::ApiError;
use super::{results, JsonBody};
use crate::db::{AddFavoriteRequest, Character, Favorite, FavoriteKind, Planet, Vehicle};
use crate::AppState;

/// List the catalog entities a user has favorited
///
/// GET /user/favorites/:kind/:user_id
pub async fn list_favorites(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path((kind, user_id)): Path<(FavoriteKind, i64)>,
) -> Result<Json<Value>, ApiError> {
    require_owner(&state.db, user_id, &identity).await?;

    let sql = format!(
        "SELECT e.* FROM {} e JOIN {} f ON f.{} = e.id WHERE f.user_id = ?",
        kind.entity_table(),
        kind.table(),
        kind.id_column(),
    );

    let payload = match kind {
        FavoriteKind::Planets => {
            let rows: Vec<Planet> = sqlx::query_as(&sql).bind(user_id).fetch_all(&state.db).await?;
            serde_json::to_value(rows)
        }
        FavoriteKind::Characters => {
            let rows: Vec<Character> =
                sqlx::query_as(&sql).bind(user_id).fetch_all(&state.db).await?;
            serde_json::to_value(rows)
        }
        FavoriteKind::Vehicles => {
            let rows: Vec<Vehicle> =
                sqlx::query_as(&sql).bind(user_id).fetch_all(&state.db).await?;
            serde_json::to_value(rows)
        }
    }
    .map_err(|e| {
        tracing::error!("Failed to serialize favorites: {}", e);
        ApiError::internal("Failed to serialize favorites")
    })?;

    Ok(results(payload))
}

/// Favorite a catalog entity for a user
///
/// POST /user/favorites/:kind
pub async fn add_favorite(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(kind): Path<FavoriteKind>,
    JsonBody(request): JsonBody<AddFavoriteRequest>,
) -> Result<Json<Value>, ApiError> {
    let user_id = request
        .user_id
        .ok_or_else(|| ApiError::validation("user_id field can not be empty"))?;
    let entity_id = request.entity_id(kind).ok_or_else(|| {
        ApiError::validation(format!("{} field can not be empty", kind.id_column()))
    })?;

    require_owner(&state.db, user_id, &identity).await?;

    let existing: Option<(i64,)> = sqlx::query_as(&format!(
        "SELECT id FROM {} WHERE {} = ? AND user_id = ?",
        kind.table(),
        kind.id_column(),
    ))
    .bind(entity_id)
    .bind(user_id)
    .fetch_optional(&state.db)
    .await?;
    if existing.is_some() {
        return Err(ApiError::conflict(format!(
            "User already liked this {}",
            kind.label()
        )));
    }

    let entity: Option<(i64,)> =
        sqlx::query_as(&format!("SELECT id FROM {} WHERE id = ?", kind.entity_table()))
            .bind(entity_id)
            .fetch_optional(&state.db)
            .await?;
    if entity.is_none() {
        return Err(ApiError::not_found(format!(
            "{} does not exist",
            kind.entity_name()
        )));
    }

    // The UNIQUE(user_id, entity) constraint turns a racing duplicate insert
    // into a conflict instead of a second row.
    let result = sqlx::query(&format!(
        "INSERT INTO {} ({}, user_id) VALUES (?, ?)",
        kind.table(),
        kind.id_column(),
    ))
    .bind(entity_id)
    .bind(user_id)
    .execute(&state.db)
    .await?;

    let favorite = Favorite {
        id: result.last_insert_rowid(),
        entity_id,
        user_id,
    };

    tracing::info!(user_id, entity_id, kind = %kind, "Favorite added");
    Ok(results(favorite.to_json(kind)))
}

/// Remove a favorite owned by the user
///
/// DELETE /user/favorites/:kind/:fav_id/:user_id
pub async fn delete_favorite(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path((kind, fav_id, user_id)): Path<(FavoriteKind, i64, i64)>,
) -> Result<Json<Value>, ApiError> {
    require_owner(&state.db, user_id, &identity).await?;

    let favorite: Option<Favorite> = sqlx::query_as(&format!(
        "SELECT id, {} AS entity_id, user_id FROM {} WHERE id = ?",
        kind.id_column(),
        kind.table(),
    ))
    .bind(fav_id)
    .fetch_optional(&state.db)
    .await?;
    let favorite = favorite.ok_or_else(|| ApiError::not_found("Favorite does not exist"))?;

    if favorite.user_id != user_id {
        return Err(ApiError::validation("User do not have this favorite"));
    }

    sqlx::query(&format!("DELETE FROM {} WHERE id = ?", kind.table()))
        .bind(fav_id)
        .execute(&state.db)
        .await?;

    tracing::info!(user_id, fav_id, kind = %kind, "Favorite removed");
    Ok(results("ok"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::auth::{login, verify_token};
    use crate::api::error::ErrorKind;
    use crate::api::users::create_user;
    use crate::db::{seed_catalog, LoginRequest, RegisterRequest};
    use crate::test_state;

    async fn signup(state: &Arc<AppState>, name: &str, email: &str) -> (i64, Identity) {
        let body = create_user(
            State(state.clone()),
            JsonBody(RegisterRequest {
                name: name.to_string(),
                email: email.to_string(),
                password: "secret".to_string(),
            }),
        )
        .await
        .unwrap();
        let user_id = body.0["results"]["id"].as_i64().unwrap();
        (
            user_id,
            Identity {
                email: email.to_string(),
            },
        )
    }

    fn add_request(kind: FavoriteKind, user_id: i64, entity_id: i64) -> AddFavoriteRequest {
        let mut request = AddFavoriteRequest {
            user_id: Some(user_id),
            planet_id: None,
            character_id: None,
            vehicle_id: None,
        };
        match kind {
            FavoriteKind::Planets => request.planet_id = Some(entity_id),
            FavoriteKind::Characters => request.character_id = Some(entity_id),
            FavoriteKind::Vehicles => request.vehicle_id = Some(entity_id),
        }
        request
    }

    #[tokio::test]
    async fn add_returns_ids_matching_input() {
        let state = test_state().await;
        seed_catalog(&state.db).await.unwrap();
        let (user_id, identity) = signup(&state, "Leia", "leia@rebel.org").await;

        let body = add_favorite(
            State(state),
            identity,
            Path(FavoriteKind::Planets),
            JsonBody(add_request(FavoriteKind::Planets, user_id, 1)),
        )
        .await
        .unwrap();

        let favorite = &body.0["results"];
        assert_eq!(favorite["planet_id"], 1);
        assert_eq!(favorite["user_id"], user_id);
        assert!(favorite["id"].as_i64().unwrap() >= 1);
    }

    #[tokio::test]
    async fn adding_twice_conflicts() {
        let state = test_state().await;
        seed_catalog(&state.db).await.unwrap();
        let (user_id, identity) = signup(&state, "Leia", "leia@rebel.org").await;

        add_favorite(
            State(state.clone()),
            identity.clone(),
            Path(FavoriteKind::Planets),
            JsonBody(add_request(FavoriteKind::Planets, user_id, 1)),
        )
        .await
        .unwrap();

        let err = add_favorite(
            State(state),
            identity,
            Path(FavoriteKind::Planets),
            JsonBody(add_request(FavoriteKind::Planets, user_id, 1)),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn absent_entity_is_not_found() {
        let state = test_state().await;
        seed_catalog(&state.db).await.unwrap();
        let (user_id, identity) = signup(&state, "Leia", "leia@rebel.org").await;

        let err = add_favorite(
            State(state),
            identity,
            Path(FavoriteKind::Vehicles),
            JsonBody(add_request(FavoriteKind::Vehicles, user_id, 9999)),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.message(), "Vehicle does not exist");
    }

    #[tokio::test]
    async fn absent_target_user_is_not_found_before_identity_check() {
        let state = test_state().await;
        seed_catalog(&state.db).await.unwrap();
        let (_, identity) = signup(&state, "Leia", "leia@rebel.org").await;

        // Valid token, nonexistent target user: not-found, not a crash or 401
        let err = add_favorite(
            State(state),
            identity,
            Path(FavoriteKind::Planets),
            JsonBody(add_request(FavoriteKind::Planets, 9999, 1)),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.message(), "User does not exist");
    }

    #[tokio::test]
    async fn foreign_identity_is_rejected() {
        let state = test_state().await;
        seed_catalog(&state.db).await.unwrap();
        let (leia_id, _) = signup(&state, "Leia", "leia@rebel.org").await;
        let (_, han) = signup(&state, "Han", "han@rebel.org").await;

        let err = list_favorites(
            State(state.clone()),
            han.clone(),
            Path((FavoriteKind::Planets, leia_id)),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Auth);

        let err = add_favorite(
            State(state),
            han,
            Path(FavoriteKind::Planets),
            JsonBody(add_request(FavoriteKind::Planets, leia_id, 1)),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Auth);
    }

    #[tokio::test]
    async fn delete_requires_matching_owner_field() {
        let state = test_state().await;
        seed_catalog(&state.db).await.unwrap();
        let (leia_id, leia) = signup(&state, "Leia", "leia@rebel.org").await;
        let (han_id, han) = signup(&state, "Han", "han@rebel.org").await;

        let body = add_favorite(
            State(state.clone()),
            leia,
            Path(FavoriteKind::Characters),
            JsonBody(add_request(FavoriteKind::Characters, leia_id, 2)),
        )
        .await
        .unwrap();
        let fav_id = body.0["results"]["id"].as_i64().unwrap();

        // Han authorizes as himself but names Leia's favorite: ownership mismatch
        let err = delete_favorite(
            State(state),
            han,
            Path((FavoriteKind::Characters, fav_id, han_id)),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.message(), "User do not have this favorite");
    }

    #[tokio::test]
    async fn deleted_favorite_leaves_the_listing() {
        let state = test_state().await;
        seed_catalog(&state.db).await.unwrap();
        let (user_id, identity) = signup(&state, "Leia", "leia@rebel.org").await;

        let body = add_favorite(
            State(state.clone()),
            identity.clone(),
            Path(FavoriteKind::Vehicles),
            JsonBody(add_request(FavoriteKind::Vehicles, user_id, 3)),
        )
        .await
        .unwrap();
        let fav_id = body.0["results"]["id"].as_i64().unwrap();

        let body = delete_favorite(
            State(state.clone()),
            identity.clone(),
            Path((FavoriteKind::Vehicles, fav_id, user_id)),
        )
        .await
        .unwrap();
        assert_eq!(body.0["results"], "ok");

        let body = list_favorites(
            State(state.clone()),
            identity.clone(),
            Path((FavoriteKind::Vehicles, user_id)),
        )
        .await
        .unwrap();
        assert!(body.0["results"].as_array().unwrap().is_empty());

        let err = delete_favorite(
            State(state),
            identity,
            Path((FavoriteKind::Vehicles, fav_id, user_id)),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn signup_login_favorite_list_scenario() {
        let state = test_state().await;
        seed_catalog(&state.db).await.unwrap();

        let body = create_user(
            State(state.clone()),
            JsonBody(RegisterRequest {
                name: "Leia".to_string(),
                email: "leia@rebel.org".to_string(),
                password: "secret".to_string(),
            }),
        )
        .await
        .unwrap();
        let user_id = body.0["results"]["id"].as_i64().unwrap();

        let body = login(
            State(state.clone()),
            JsonBody(LoginRequest {
                email: "leia@rebel.org".to_string(),
                password: "secret".to_string(),
            }),
        )
        .await
        .unwrap();
        let token = body.0["results"]["access_token"].as_str().unwrap().to_string();

        let email = verify_token(&token, &state.config.auth.jwt_secret).unwrap();
        assert_eq!(email, "leia@rebel.org");
        let identity = Identity { email };

        add_favorite(
            State(state.clone()),
            identity.clone(),
            Path(FavoriteKind::Planets),
            JsonBody(add_request(FavoriteKind::Planets, user_id, 1)),
        )
        .await
        .unwrap();

        let body = list_favorites(
            State(state),
            identity,
            Path((FavoriteKind::Planets, user_id)),
        )
        .await
        .unwrap();
        let planets = body.0["results"].as_array().unwrap();
        assert_eq!(planets.len(), 1);
        assert_eq!(planets[0]["id"], 1);
        assert!(planets[0]["population"].is_i64() || planets[0]["population"].is_u64());
    }
}
