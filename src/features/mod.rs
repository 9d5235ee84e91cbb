//! # Features Layer
//!
//! One module per application feature. The reminders module is the stateful
//! core; plants anchor ownership; photos and identify are thin additions on
//! top of the same store and upstream APIs.

pub mod identify;
pub mod photos;
pub mod plants;
pub mod reminders;

// Re-export feature items used across layers
pub use identify::PlantApi;
pub use photos::{GrowthPhoto, NewPhoto};
pub use plants::{NewPlant, Plant, UpdatePlant};
pub use reminders::{DueTask, DueTaskQuery, NewReminder, Reminder, ReminderEngine, TaskStatus};
