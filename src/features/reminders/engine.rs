//! Reminder lifecycle engine
//!
//! Owns every state transition a reminder can make: creation, completion,
//! deletion, and the per-plant listing. Ownership is checked before any
//! mutation, frequency validation happens here at the boundary (never inside
//! the date arithmetic), and `last_completed`/`next_due` are only ever
//! written as a pair.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use std::sync::Arc;

use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::schedule::{next_due_date, TaskStatus};
use super::Reminder;
use crate::core::clock::Clock;
use crate::core::error::AppError;
use crate::database::Database;

/// Request body for creating a reminder.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReminder {
    pub plant_id: i64,
    #[serde(rename = "type")]
    pub task_type: String,
    pub frequency_days: i64,
    /// Defaults to today when omitted.
    #[serde(default)]
    pub last_completed: Option<NaiveDate>,
}

/// A reminder together with its classification against today.
#[derive(Debug, Clone, Serialize)]
pub struct ReminderView {
    #[serde(flatten)]
    pub reminder: Reminder,
    pub status: TaskStatus,
}

/// All reminder state transitions go through this engine.
#[derive(Clone)]
pub struct ReminderEngine {
    db: Database,
    clock: Arc<dyn Clock>,
}

impl ReminderEngine {
    pub fn new(db: Database, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// Validate a raw frequency at the boundary.
    ///
    /// Rejects zero, negative, and absurdly large values before any date
    /// arithmetic runs.
    fn checked_frequency(frequency_days: i64) -> Result<u32, AppError> {
        u32::try_from(frequency_days)
            .ok()
            .filter(|days| *days > 0)
            .ok_or(AppError::InvalidFrequency(frequency_days))
    }

    /// Create a reminder for a plant the user owns.
    ///
    /// Returns the new reminder's id. `last_completed` defaults to today;
    /// `next_due` is derived, never caller-supplied.
    pub fn create(&self, user_id: i64, req: &NewReminder) -> Result<i64, AppError> {
        if req.task_type.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Reminder type must not be empty.".to_string(),
            ));
        }
        let frequency = Self::checked_frequency(req.frequency_days)?;

        if !self.db.user_owns_plant(req.plant_id, user_id)? {
            return Err(AppError::NotFound("Plant"));
        }

        let last_completed = req.last_completed.unwrap_or_else(|| self.clock.today());
        let next_due = next_due_date(last_completed, frequency);
        let reminder_id = self.db.insert_reminder(
            req.plant_id,
            req.task_type.trim(),
            i64::from(frequency),
            last_completed,
            next_due,
        )?;

        info!(
            "Created reminder {reminder_id} ({}, every {frequency} days) for plant {}",
            req.task_type.trim(),
            req.plant_id
        );
        Ok(reminder_id)
    }

    /// Record a completion and roll the schedule forward.
    ///
    /// Re-completing on the same date writes the same pair again — the state
    /// is idempotent, and no per-completion history is kept.
    pub fn complete(
        &self,
        user_id: i64,
        reminder_id: i64,
        completion_date: Option<NaiveDate>,
    ) -> Result<Reminder, AppError> {
        let mut reminder = self
            .db
            .reminder_for_user(reminder_id, user_id)?
            .ok_or(AppError::NotFound("Reminder"))?;

        let frequency = Self::checked_frequency(reminder.frequency_days)?;
        let completed_on = completion_date.unwrap_or_else(|| self.clock.today());
        let next_due = next_due_date(completed_on, frequency);

        self.db
            .update_reminder_schedule(reminder_id, completed_on, next_due)?;
        debug!("Completed reminder {reminder_id} on {completed_on}, next due {next_due}");

        reminder.last_completed = completed_on;
        reminder.next_due = next_due;
        Ok(reminder)
    }

    /// Permanently remove a reminder the user owns.
    pub fn delete(&self, user_id: i64, reminder_id: i64) -> Result<(), AppError> {
        if self.db.delete_reminder(reminder_id, user_id)? {
            info!("Deleted reminder {reminder_id} for user {user_id}");
            Ok(())
        } else {
            Err(AppError::NotFound("Reminder"))
        }
    }

    /// All reminders of one owned plant, soonest due first, classified
    /// against today.
    pub fn list_for_plant(
        &self,
        user_id: i64,
        plant_id: i64,
    ) -> Result<Vec<ReminderView>, AppError> {
        if !self.db.user_owns_plant(plant_id, user_id)? {
            return Err(AppError::NotFound("Plant"));
        }

        let today = self.clock.today();
        let views = self
            .db
            .reminders_for_plant(plant_id)?
            .into_iter()
            .map(|reminder| {
                let status = TaskStatus::classify(reminder.next_due, today);
                ReminderView { reminder, status }
            })
            .collect();
        Ok(views)
    }
}
