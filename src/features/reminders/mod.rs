//! # Reminders Feature
//!
//! Recurring care tasks with fixed-day intervals. This is the stateful heart
//! of the application: the lifecycle engine owns every reminder transition,
//! the schedule module owns the date math, and the due-task query aggregates
//! what needs doing across a user's whole collection.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod due;
pub mod engine;
pub mod schedule;

pub use due::{DueTask, DueTaskQuery};
pub use engine::{NewReminder, ReminderEngine, ReminderView};
pub use schedule::{next_due_date, TaskStatus};

use chrono::NaiveDate;
use serde::Serialize;

/// A recurring care task attached to one plant.
///
/// `next_due` is always `last_completed + frequency_days`; the pair is only
/// ever written together (see [`engine::ReminderEngine`]).
#[derive(Debug, Clone, Serialize)]
pub struct Reminder {
    pub id: i64,
    pub plant_id: i64,
    /// Free-text task label ("water", "feed", ...) — not an enum by design.
    #[serde(rename = "type")]
    pub task_type: String,
    pub frequency_days: i64,
    pub last_completed: NaiveDate,
    pub next_due: NaiveDate,
}
