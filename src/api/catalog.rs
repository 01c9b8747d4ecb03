//! Read-only catalog endpoints for planets, characters and vehicles.
//!
//! The catalog is reference data: listings come back in primary-key order
//! and single lookups validate the id before touching the store.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use std::sync::Arc;

use super::error::ApiError;
use super::results;
use crate::db::{Character, Planet, Vehicle};
use crate::AppState;

fn check_id(id: i64, label: &str) -> Result<(), ApiError> {
    if id < 1 {
        return Err(ApiError::validation(format!("{} id is not valid", label)));
    }
    Ok(())
}

/// GET /planets
pub async fn list_planets(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let planets: Vec<Planet> = sqlx::query_as("SELECT * FROM planets ORDER BY id")
        .fetch_all(&state.db)
        .await?;
    Ok(results(planets))
}

/// GET /planets/:id
pub async fn get_planet(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    check_id(id, "Planet")?;

    let planet: Option<Planet> = sqlx::query_as("SELECT * FROM planets WHERE id = ?")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    let planet = planet.ok_or_else(|| ApiError::not_found("Planet does not exist"))?;
    Ok(results(planet))
}

/// GET /characters
pub async fn list_characters(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let characters: Vec<Character> = sqlx::query_as("SELECT * FROM characters ORDER BY id")
        .fetch_all(&state.db)
        .await?;
    Ok(results(characters))
}

/// GET /characters/:id
pub async fn get_character(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    check_id(id, "Character")?;

    let character: Option<Character> = sqlx::query_as("SELECT * FROM characters WHERE id = ?")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    let character = character.ok_or_else(|| ApiError::not_found("Character does not exist"))?;
    Ok(results(character))
}

/// GET /vehicles
pub async fn list_vehicles(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let vehicles: Vec<Vehicle> = sqlx::query_as("SELECT * FROM vehicles ORDER BY id")
        .fetch_all(&state.db)
        .await?;
    Ok(results(vehicles))
}

/// GET /vehicles/:id
pub async fn get_vehicle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    check_id(id, "Vehicle")?;

    let vehicle: Option<Vehicle> = sqlx::query_as("SELECT * FROM vehicles WHERE id = ?")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    let vehicle = vehicle.ok_or_else(|| ApiError::not_found("Vehicle does not exist"))?;
    Ok(results(vehicle))
}
