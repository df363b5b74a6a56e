//! # Reminders Feature
//!
//! Daily recurring reminder scheduling and delivery: an in-process trigger
//! engine, the scheduler facade that keeps exactly one trigger per
//! (user, category), and the dispatch job that renders and sends at fire
//! time.
//!
//! - **Version**: 2.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 2.1.0: Custom-label reminders
//! - 2.0.0: Injected collaborators replace process-wide statics
//! - 1.0.0: Initial daily scheduler

pub mod clock;
pub mod engine;
pub mod job;
pub mod scheduler;

pub use clock::{Clock, SystemClock};
pub use engine::{TriggerCallback, TriggerEngine};
pub use job::ReminderJob;
pub use scheduler::ReminderScheduler;

#[cfg(test)]
pub(crate) mod testing;
