//! Identification proxy handlers

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use super::AppState;
use crate::auth::AuthUser;
use crate::core::error::AppError;

#[derive(Debug, Deserialize)]
pub struct IdentifyRequest {
    /// Raw base64 image data, without a `data:image/...` prefix.
    #[serde(alias = "base64Image")]
    pub base64_image: String,
}

/// POST /api/identify — forward an image to the identification service.
pub async fn identify(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(req): Json<IdentifyRequest>,
) -> Result<Json<Value>, AppError> {
    let data = state.plant_api.identify(&req.base64_image).await?;
    Ok(Json(data))
}

/// GET /api/plant-details/:scientific_name — supplemental species data.
pub async fn plant_details(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(scientific_name): Path<String>,
) -> Result<Json<Value>, AppError> {
    let data = state.plant_api.plant_details(&scientific_name).await?;
    Ok(Json(data))
}
