//! # Plants Feature
//!
//! The user's plant collection — the ownership anchor for reminders and
//! growth photos. Deleting a plant cascades to both.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

use serde::{Deserialize, Serialize};

/// A plant record as stored and served.
#[derive(Debug, Clone, Serialize)]
pub struct Plant {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub scientific_name: Option<String>,
    pub common_name: Option<String>,
    pub image_url: Option<String>,
    pub notes: Option<String>,
    /// Raw identification payload from the upstream API, kept opaque.
    pub identification_data: Option<String>,
    pub trefle_id: Option<String>,
    pub date_added: String,
}

/// Request body for adding a plant to the collection.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPlant {
    pub name: String,
    #[serde(default)]
    pub scientific_name: Option<String>,
    #[serde(default)]
    pub common_name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub identification_data: Option<String>,
    #[serde(default)]
    pub trefle_id: Option<String>,
}

/// Partial update for a plant. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePlant {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub scientific_name: Option<String>,
    #[serde(default)]
    pub common_name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl UpdatePlant {
    /// True when no field is present at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.scientific_name.is_none()
            && self.common_name.is_none()
            && self.image_url.is_none()
            && self.notes.is_none()
    }
}
