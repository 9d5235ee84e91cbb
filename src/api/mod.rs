//! # API Layer
//!
//! Axum router, shared request state, the bearer-token extractor, and the
//! mapping from the application error taxonomy onto HTTP statuses. Handlers
//! live in one module per feature and stay thin: parse, call the service,
//! shape the JSON.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

pub mod auth;
pub mod extract;
pub mod identify;
pub mod photos;
pub mod plants;
pub mod reminders;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use log::error;
use serde_json::json;

use crate::auth::AuthService;
use crate::core::clock::Clock;
use crate::core::config::Config;
use crate::core::error::AppError;
use crate::database::Database;
use crate::features::identify::PlantApi;
use crate::features::reminders::{DueTaskQuery, ReminderEngine};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub auth: AuthService,
    pub engine: ReminderEngine,
    pub due: DueTaskQuery,
    pub plant_api: PlantApi,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(db: Database, clock: Arc<dyn Clock>, config: &Config) -> Self {
        Self {
            auth: AuthService::new(db.clone(), config.session_ttl_hours),
            engine: ReminderEngine::new(db.clone(), clock.clone()),
            due: DueTaskQuery::new(db.clone(), clock.clone()),
            plant_api: PlantApi::new(
                config.plant_id_api_key.clone(),
                config.trefle_api_key.clone(),
            ),
            db,
            clock,
        }
    }
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/identify", post(identify::identify))
        .route(
            "/api/plant-details/:scientific_name",
            get(identify::plant_details),
        )
        .route("/api/plants", get(plants::list).post(plants::create))
        .route(
            "/api/plants/:id",
            get(plants::get).patch(plants::update).delete(plants::remove),
        )
        .route("/api/plants/:id/reminders", get(reminders::list_for_plant))
        .route(
            "/api/plants/:id/photos",
            get(photos::list_for_plant).post(photos::add),
        )
        .route("/api/reminders", post(reminders::create))
        .route("/api/reminders/due", get(reminders::due))
        .route("/api/reminders/:id/complete", post(reminders::complete))
        .route("/api/reminders/:id", delete(reminders::remove))
        .with_state(state)
}

/// Store liveness probe.
async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.db.health_check()?;
    Ok(Json(json!({"status": "ok"})))
}

/// JSON body used for every error response.
pub(crate) fn message_body(message: &str) -> Json<serde_json::Value> {
    Json(json!({ "message": message }))
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::InvalidInput(_) | AppError::InvalidFrequency(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, self.to_string()),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Conflict(_) => (StatusCode::CONFLICT, self.to_string()),
            AppError::Upstream(upstream) => {
                let status = upstream
                    .status
                    .and_then(|code| StatusCode::from_u16(code).ok())
                    .unwrap_or(StatusCode::SERVICE_UNAVAILABLE);
                (status, upstream.message.clone())
            }
            AppError::Store(e) => {
                // Persistence faults are logged in full but surface generically.
                error!("Storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };
        (status, message_body(&message)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            status_of(AppError::InvalidInput("bad".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(AppError::InvalidFrequency(0)), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(AppError::Unauthorized("no token")),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status_of(AppError::Forbidden("bad token")), StatusCode::FORBIDDEN);
        assert_eq!(status_of(AppError::NotFound("Plant")), StatusCode::NOT_FOUND);
        assert_eq!(status_of(AppError::Conflict("taken")), StatusCode::CONFLICT);
    }

    #[test]
    fn test_upstream_status_pass_through_and_unreachable() {
        assert_eq!(
            status_of(AppError::upstream_status(429, "slow down")),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            status_of(AppError::upstream_unreachable("connect refused")),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_store_error_is_generic_500() {
        let err = AppError::Store(rusqlite::Error::InvalidQuery);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
