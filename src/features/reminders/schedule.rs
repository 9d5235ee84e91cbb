//! Due-date arithmetic and classification
//!
//! The one place recurring-care dates are computed and labeled. The rest of
//! the crate never does calendar math: the engine and the due-task query both
//! call [`next_due_date`] and [`TaskStatus::classify`], and SQL is limited to
//! plain comparisons on the canonical `YYYY-MM-DD` encoding.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use chrono::{Days, NaiveDate};
use serde::Serialize;

/// Advance a completion date by a whole number of calendar days.
///
/// Pure function: month and year rollover are handled by the calendar type
/// (Jan 30 + 3 days = Feb 2). Saturates at the calendar ceiling rather than
/// overflowing; the engine rejects out-of-range frequencies before calling.
pub fn next_due_date(last_completed: NaiveDate, frequency_days: u32) -> NaiveDate {
    last_completed
        .checked_add_days(Days::new(u64::from(frequency_days)))
        .unwrap_or(NaiveDate::MAX)
}

/// Where a reminder stands relative to today.
///
/// Exactly one state holds for any `(next_due, today)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// `next_due` is in the past.
    Overdue,
    /// `next_due` is today.
    DueToday,
    /// `next_due` is in the future.
    Scheduled,
}

impl TaskStatus {
    /// Classify a reminder by its next due date.
    ///
    /// Shared by the per-plant listing and the cross-plant due-task query so
    /// both surfaces always agree on the label.
    pub fn classify(next_due: NaiveDate, today: NaiveDate) -> Self {
        if next_due < today {
            TaskStatus::Overdue
        } else if next_due == today {
            TaskStatus::DueToday
        } else {
            TaskStatus::Scheduled
        }
    }

    /// Whether the task should appear in the due-task feed.
    pub fn is_due(&self) -> bool {
        matches!(self, TaskStatus::Overdue | TaskStatus::DueToday)
    }

    /// String form used in JSON payloads and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Overdue => "overdue",
            TaskStatus::DueToday => "due_today",
            TaskStatus::Scheduled => "scheduled",
        }
    }
}
