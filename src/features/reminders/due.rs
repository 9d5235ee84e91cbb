//! Cross-plant due-task query
//!
//! Read-only aggregation of everything a user needs to do today: all
//! reminders whose `next_due` is on or before today, joined with the plant
//! name, most overdue first. Uses the same classification boundary as the
//! lifecycle engine — a reminder due exactly today is included, one due
//! tomorrow is not.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use super::schedule::TaskStatus;
use crate::core::clock::Clock;
use crate::core::error::AppError;
use crate::database::Database;

/// Raw row from the due-reminder join, before classification.
#[derive(Debug, Clone)]
pub struct DueTaskRow {
    pub reminder_id: i64,
    pub plant_id: i64,
    pub task_type: String,
    pub next_due: NaiveDate,
    pub frequency_days: i64,
    pub plant_name: String,
}

/// One entry in the "what needs doing" feed.
#[derive(Debug, Clone, Serialize)]
pub struct DueTask {
    pub reminder_id: i64,
    pub plant_id: i64,
    #[serde(rename = "type")]
    pub task_type: String,
    pub next_due: NaiveDate,
    pub frequency_days: i64,
    pub plant_name: String,
    /// Overdue or DueToday — Scheduled never appears here.
    pub status: TaskStatus,
}

/// Read-only service answering "what is due for this user?".
#[derive(Clone)]
pub struct DueTaskQuery {
    db: Database,
    clock: Arc<dyn Clock>,
}

impl DueTaskQuery {
    pub fn new(db: Database, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// Every due or overdue reminder across the user's plants, most overdue
    /// first. An empty list means "all caught up", not an error.
    pub fn due_tasks(&self, user_id: i64) -> Result<Vec<DueTask>, AppError> {
        let today = self.clock.today();
        let tasks = self
            .db
            .due_reminders(user_id, today)?
            .into_iter()
            .map(|row| DueTask {
                status: TaskStatus::classify(row.next_due, today),
                reminder_id: row.reminder_id,
                plant_id: row.plant_id,
                task_type: row.task_type,
                next_due: row.next_due,
                frequency_days: row.frequency_days,
                plant_name: row.plant_name,
            })
            .collect();
        Ok(tasks)
    }
}
