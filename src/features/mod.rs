//! # Features Module
//!
//! Feature modules for the reminder bot, one directory per feature.
//!
//! - **Version**: 2.1.0
//! - **Since**: 0.1.0

pub mod facts;
pub mod reminders;
pub mod sessions;
pub mod streaks;
pub mod templates;

// Re-export feature items for backwards compatibility
pub use facts::random_fact;
pub use reminders::{Clock, ReminderJob, ReminderScheduler, SystemClock, TriggerEngine};
pub use sessions::{PendingInput, SessionMap};
pub use streaks::{StreakEntry, StreakService, StreakUpdate};
pub use templates::{MessageTemplates, TemplateSource};
