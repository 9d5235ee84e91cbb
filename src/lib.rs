// Core layer - configuration, errors, clock
pub mod core;

// Features layer - reminders (the stateful core), plants, photos, identify
pub mod features;

// Infrastructure - SQLite persistence
pub mod database;

// Auth - credential store and bearer-token sessions
pub mod auth;

// API layer - axum router and handlers
pub mod api;

// Re-export core config for convenience
pub use core::Config;

// Re-export the pieces the binary and tests wire together
pub use api::{router, AppState};
pub use auth::AuthService;
pub use core::{Clock, FixedClock, SystemClock};
pub use database::Database;
pub use features::{
    // Reminders
    DueTask, DueTaskQuery, NewReminder, Reminder, ReminderEngine, TaskStatus,
    // Plants & photos
    GrowthPhoto, NewPhoto, NewPlant, Plant, UpdatePlant,
    // Identification
    PlantApi,
};
