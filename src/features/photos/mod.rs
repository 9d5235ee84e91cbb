//! # Growth Photos Feature
//!
//! Photo log per plant. Image bytes live behind a URL (or inline data URL);
//! the server stores the reference, never the blob.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One entry in a plant's growth log.
#[derive(Debug, Clone, Serialize)]
pub struct GrowthPhoto {
    pub id: i64,
    pub plant_id: i64,
    pub image_url: String,
    pub date_taken: NaiveDate,
    pub notes: Option<String>,
}

/// Request body for logging a photo. `date_taken` is stamped server-side.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPhoto {
    pub image_url: String,
    #[serde(default)]
    pub notes: Option<String>,
}
