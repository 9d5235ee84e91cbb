//! Plant collection handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use super::AppState;
use crate::auth::AuthUser;
use crate::core::error::AppError;
use crate::features::plants::{NewPlant, Plant, UpdatePlant};

/// GET /api/plants — the caller's whole collection, newest first.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Plant>>, AppError> {
    Ok(Json(state.db.plants_for_user(user.user_id)?))
}

/// POST /api/plants
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(plant): Json<NewPlant>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if plant.name.trim().is_empty() {
        return Err(AppError::InvalidInput("Plant name is required.".to_string()));
    }

    let plant_id = state.db.insert_plant(user.user_id, &plant)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Plant added successfully!", "plant_id": plant_id })),
    ))
}

/// GET /api/plants/:id
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Path(plant_id): Path<i64>,
) -> Result<Json<Plant>, AppError> {
    state
        .db
        .plant_for_user(plant_id, user.user_id)?
        .map(Json)
        .ok_or(AppError::NotFound("Plant"))
}

/// PATCH /api/plants/:id — partial update, absent fields untouched.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(plant_id): Path<i64>,
    Json(update): Json<UpdatePlant>,
) -> Result<Json<Value>, AppError> {
    if update.is_empty() {
        return Err(AppError::InvalidInput("No fields to update.".to_string()));
    }
    if let Some(name) = &update.name {
        if name.trim().is_empty() {
            return Err(AppError::InvalidInput("Plant name must not be empty.".to_string()));
        }
    }

    let changed = state.db.update_plant(plant_id, user.user_id, &update)?;
    if changed == 0 {
        return Err(AppError::NotFound("Plant"));
    }
    Ok(Json(json!({ "message": "Plant details updated successfully." })))
}

/// DELETE /api/plants/:id — removes the plant and everything attached.
pub async fn remove(
    State(state): State<AppState>,
    user: AuthUser,
    Path(plant_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    if !state.db.delete_plant_cascade(plant_id, user.user_id)? {
        return Err(AppError::NotFound("Plant"));
    }
    Ok(Json(json!({
        "message": "Plant and all associated data deleted successfully."
    })))
}
