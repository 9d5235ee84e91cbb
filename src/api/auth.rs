//! Registration and login handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::AppState;
use crate::core::error::AppError;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// POST /api/register
pub async fn register(
    State(state): State<AppState>,
    Json(creds): Json<Credentials>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    state.auth.register(&creds.email, &creds.password)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Registration successful! Redirecting to login." })),
    ))
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    Json(creds): Json<Credentials>,
) -> Result<Json<Value>, AppError> {
    let issued = state.auth.login(&creds.email, &creds.password)?;
    Ok(Json(json!({
        "message": "Login successful.",
        "token": issued.token,
        "user": { "id": issued.user.user_id, "email": issued.user.email },
    })))
}
