//! Calendar clock abstraction
//!
//! All date math in the reminder subsystem runs against a single injected
//! clock rather than ad-hoc system time calls, so tests can pin "today"
//! without touching the host clock. Dates are calendar days in UTC — the one
//! canonical zone for the whole application.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use chrono::{NaiveDate, Utc};
use parking_lot::Mutex;

/// Source of the current calendar date.
pub trait Clock: Send + Sync {
    /// The current date in UTC, with no time-of-day component.
    fn today(&self) -> NaiveDate;
}

/// Production clock backed by the system time, read in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Test clock pinned to a settable date.
///
/// Scenario tests hold on to the `Arc<FixedClock>` they built the app state
/// with and advance it between requests.
#[derive(Debug)]
pub struct FixedClock {
    today: Mutex<NaiveDate>,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Mutex::new(today),
        }
    }

    /// Move the pinned date.
    pub fn set(&self, today: NaiveDate) {
        *self.today.lock() = today;
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        *self.today.lock()
    }
}
