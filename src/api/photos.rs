//! Growth photo handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use super::AppState;
use crate::auth::AuthUser;
use crate::core::error::AppError;
use crate::features::photos::{GrowthPhoto, NewPhoto};

/// POST /api/plants/:id/photos
pub async fn add(
    State(state): State<AppState>,
    user: AuthUser,
    Path(plant_id): Path<i64>,
    Json(photo): Json<NewPhoto>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if photo.image_url.trim().is_empty() {
        return Err(AppError::InvalidInput("Image data is required.".to_string()));
    }
    if !state.db.user_owns_plant(plant_id, user.user_id)? {
        return Err(AppError::NotFound("Plant"));
    }

    let photo_id = state.db.insert_photo(
        plant_id,
        &photo.image_url,
        state.clock.today(),
        photo.notes.as_deref(),
    )?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Photo added successfully!", "photo_id": photo_id })),
    ))
}

/// GET /api/plants/:id/photos — newest first.
pub async fn list_for_plant(
    State(state): State<AppState>,
    user: AuthUser,
    Path(plant_id): Path<i64>,
) -> Result<Json<Vec<GrowthPhoto>>, AppError> {
    if !state.db.user_owns_plant(plant_id, user.user_id)? {
        return Err(AppError::NotFound("Plant"));
    }
    Ok(Json(state.db.photos_for_plant(plant_id)?))
}
