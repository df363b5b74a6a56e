//! Wall-clock abstraction for the trigger engine
//!
//! The engine plans in naive local time: "daily at HH:MM" is a wall-clock
//! promise to the user, not a UTC one. Tests substitute a simulated clock
//! driven by tokio's pausable timer.

use chrono::{Local, NaiveDateTime};

/// Source of the current local wall-clock time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Production clock backed by `chrono::Local`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
