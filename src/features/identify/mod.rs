//! # Plant Identification Feature
//!
//! Proxies to the two external plant-data services: plant.id for
//! image-based identification and Trefle for supplemental species details.
//! Both are consumed as opaque request/response calls — upstream JSON is
//! passed through untouched, and nothing is cached or retried.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true

use std::time::Duration;

use log::{debug, error};
use serde_json::json;

use crate::core::error::AppError;

// ============================================================================
// Constants
// ============================================================================

/// plant.id identification endpoint.
const PLANT_ID_URL: &str = "https://plant.id/api/v2/identify";

/// Trefle species search endpoint.
const TREFLE_SEARCH_URL: &str = "https://trefle.io/api/v1/plants/search";

/// Trefle species detail endpoint prefix.
const TREFLE_DETAIL_URL: &str = "https://trefle.io/api/v1/plants";

/// Detail fields requested from plant.id alongside the match itself.
const IDENTIFY_DETAILS: [&str; 8] = [
    "common_names",
    "url",
    "wiki_description",
    "taxonomy",
    "edible_parts",
    "propagation_methods",
    "watering",
    "sunlight",
];

/// Timeout for a single upstream call.
const UPSTREAM_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Client
// ============================================================================

/// Shared client for both upstream plant-data services.
#[derive(Clone)]
pub struct PlantApi {
    http: reqwest::Client,
    plant_id_api_key: Option<String>,
    trefle_api_key: Option<String>,
}

impl PlantApi {
    pub fn new(plant_id_api_key: Option<String>, trefle_api_key: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(UPSTREAM_TIMEOUT_SECS))
            .build()
            // Builder only fails on TLS backend misconfiguration.
            .unwrap_or_default();
        Self {
            http,
            plant_id_api_key,
            trefle_api_key,
        }
    }

    /// Submit a base64 image to plant.id and return the upstream JSON.
    pub async fn identify(&self, base64_image: &str) -> Result<serde_json::Value, AppError> {
        let api_key = self.plant_id_api_key.as_deref().ok_or_else(|| {
            AppError::InvalidInput("PLANT_ID_API_KEY is missing from server environment.".to_string())
        })?;
        if base64_image.is_empty() {
            return Err(AppError::InvalidInput(
                "No image data provided for identification.".to_string(),
            ));
        }

        let body = json!({
            "images": [base64_image],
            "details": IDENTIFY_DETAILS,
        });

        let response = self
            .http
            .post(PLANT_ID_URL)
            .header("Api-Key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::upstream_unreachable(describe_network_error(&e)))?;

        let status = response.status();
        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::upstream_unreachable(format!("invalid upstream body: {e}")))?;

        if status.is_success() {
            debug!("plant.id identification succeeded");
            Ok(data)
        } else {
            error!("plant.id returned {status}: {data}");
            let message = data
                .get("detail")
                .and_then(|d| d.as_str())
                .unwrap_or("External identification API failed.")
                .to_string();
            Err(AppError::upstream_status(status.as_u16(), message))
        }
    }

    /// Two-step Trefle lookup: search by scientific name, then fetch the
    /// first hit's full record.
    pub async fn plant_details(&self, scientific_name: &str) -> Result<serde_json::Value, AppError> {
        let api_key = self.trefle_api_key.as_deref().ok_or_else(|| {
            AppError::InvalidInput("TREFLE_API_KEY is missing from server environment.".to_string())
        })?;
        if scientific_name.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Scientific name is required for detail lookup.".to_string(),
            ));
        }

        let search: serde_json::Value = self
            .http
            .get(TREFLE_SEARCH_URL)
            .query(&[("token", api_key), ("q", scientific_name)])
            .send()
            .await
            .map_err(|e| AppError::upstream_unreachable(describe_network_error(&e)))?
            .json()
            .await
            .map_err(|e| AppError::upstream_unreachable(format!("invalid upstream body: {e}")))?;

        let Some(trefle_id) = search
            .get("data")
            .and_then(|d| d.as_array())
            .and_then(|hits| hits.first())
            .and_then(|hit| hit.get("id"))
            .and_then(|id| id.as_i64())
        else {
            return Err(AppError::NotFound("Supplemental details"));
        };

        let detail: serde_json::Value = self
            .http
            .get(format!("{TREFLE_DETAIL_URL}/{trefle_id}"))
            .query(&[("token", api_key)])
            .send()
            .await
            .map_err(|e| AppError::upstream_unreachable(describe_network_error(&e)))?
            .json()
            .await
            .map_err(|e| AppError::upstream_unreachable(format!("invalid upstream body: {e}")))?;

        match detail.get("data") {
            Some(data) if !data.is_null() => Ok(data.clone()),
            _ => Err(AppError::NotFound("Supplemental details")),
        }
    }
}

fn describe_network_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out after {UPSTREAM_TIMEOUT_SECS} seconds")
    } else if e.is_connect() {
        "could not connect to the server".to_string()
    } else {
        format!("HTTP request failed: {e}")
    }
}
