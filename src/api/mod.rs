pub mod auth;
mod catalog;
pub mod error;
mod favorites;
mod users;

use axum::{
    extract::FromRequest,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use self::error::ApiError;
use crate::AppState;

/// Wrap a success payload in the `{"results": ...}` envelope
pub(crate) fn results<T: Serialize>(payload: T) -> Json<Value> {
    Json(json!({ "results": payload }))
}

/// JSON body extractor whose rejection uses the standard `{"message"}` error
/// envelope instead of axum's plain-text responses
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub(crate) struct JsonBody<T>(pub T);

/// The route table, used both for routing and the sitemap endpoint
const ROUTES: &[(&str, &str)] = &[
    ("GET", "/"),
    ("GET", "/health"),
    ("GET", "/user"),
    ("POST", "/user"),
    ("POST", "/login"),
    ("GET", "/planets"),
    ("GET", "/planets/:id"),
    ("GET", "/characters"),
    ("GET", "/characters/:id"),
    ("GET", "/vehicles"),
    ("GET", "/vehicles/:id"),
    ("GET", "/user/favorites/:kind/:user_id"),
    ("POST", "/user/favorites/:kind"),
    ("DELETE", "/user/favorites/:kind/:fav_id/:user_id"),
];

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(sitemap))
        .route("/health", get(health_check))
        // Users & auth
        .route("/user", get(users::list_users))
        .route("/user", post(users::create_user))
        .route("/login", post(auth::login))
        // Catalog
        .route("/planets", get(catalog::list_planets))
        .route("/planets/:id", get(catalog::get_planet))
        .route("/characters", get(catalog::list_characters))
        .route("/characters/:id", get(catalog::get_character))
        .route("/vehicles", get(catalog::list_vehicles))
        .route("/vehicles/:id", get(catalog::get_vehicle))
        // Favorites (token-scoped, kind in {planets, characters, vehicles})
        .route("/user/favorites/:kind/:user_id", get(favorites::list_favorites))
        .route("/user/favorites/:kind", post(favorites::add_favorite))
        .route(
            "/user/favorites/:kind/:fav_id/:user_id",
            delete(favorites::delete_favorite),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Diagnostic listing of the available routes
async fn sitemap() -> Json<Value> {
    let routes: Vec<String> = ROUTES
        .iter()
        .map(|(method, path)| format!("{} {}", method, path))
        .collect();
    results(routes)
}

async fn health_check() -> &'static str {
    "OK"
}
