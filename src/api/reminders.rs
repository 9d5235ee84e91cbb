//! Reminder lifecycle and due-task handlers
//!
//! The thin HTTP face of the reminder engine: every route resolves the
//! caller, hands off to the engine or the due-task query, and shapes the
//! confirmation JSON. No date math happens here.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};

use super::AppState;
use crate::auth::AuthUser;
use crate::core::error::AppError;
use crate::features::reminders::{DueTask, NewReminder, ReminderView};

#[derive(Debug, Default, Deserialize)]
pub struct CompleteRequest {
    /// Defaults to today when the body or the field is omitted.
    #[serde(default)]
    pub completion_date: Option<NaiveDate>,
}

/// POST /api/reminders
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<NewReminder>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let reminder_id = state.engine.create(user.user_id, &req)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Reminder set successfully!", "reminder_id": reminder_id })),
    ))
}

/// GET /api/plants/:id/reminders — soonest due first, classified.
pub async fn list_for_plant(
    State(state): State<AppState>,
    user: AuthUser,
    Path(plant_id): Path<i64>,
) -> Result<Json<Vec<ReminderView>>, AppError> {
    Ok(Json(state.engine.list_for_plant(user.user_id, plant_id)?))
}

/// GET /api/reminders/due — everything due or overdue across all plants.
pub async fn due(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<DueTask>>, AppError> {
    Ok(Json(state.due.due_tasks(user.user_id)?))
}

/// POST /api/reminders/:id/complete
pub async fn complete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(reminder_id): Path<i64>,
    body: Option<Json<CompleteRequest>>,
) -> Result<Json<Value>, AppError> {
    let completion_date = body.and_then(|Json(req)| req.completion_date);
    let reminder = state.engine.complete(user.user_id, reminder_id, completion_date)?;
    Ok(Json(json!({
        "message": "Reminder completed and next due date updated.",
        "reminder": reminder,
    })))
}

/// DELETE /api/reminders/:id
pub async fn remove(
    State(state): State<AppState>,
    user: AuthUser,
    Path(reminder_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    state.engine.delete(user.user_id, reminder_id)?;
    Ok(Json(json!({ "message": "Reminder deleted successfully." })))
}
