//! # Core Module
//!
//! Configuration, error taxonomy, and the injectable calendar clock shared
//! by every layer above.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod clock;
pub mod config;
pub mod error;

// Re-export commonly used items
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use error::AppError;
