//! Error taxonomy for the reminder core
//!
//! Scheduling failures surface synchronously to the caller; delivery
//! failures are caught and logged at dispatch time and never reach the
//! scheduling cycle; lookup misses are soft (`Option` / default values)
//! and carry documented fallbacks instead of appearing here.

use thiserror::Error;

/// The engine could not arm or cancel a trigger
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulingError {
    /// Hour or minute outside 0..=23 / 0..=59
    #[error("invalid fire time {hour:02}:{minute:02}")]
    InvalidTime { hour: u32, minute: u32 },

    /// Chat input that does not parse as strict `HH:MM`
    #[error("unparsable fire time `{0}`, expected HH:MM")]
    UnparsableTime(String),

    /// The engine already holds a trigger under this id
    ///
    /// De-duplication by reminder key is the scheduler facade's job; the
    /// engine only refuses to silently replace an id it was handed twice.
    #[error("trigger `{0}` is already armed")]
    DuplicateTrigger(String),
}

/// A message could not be handed to the chat transport at fire time
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("delivery to user {user_id} failed: {reason}")]
pub struct DeliveryError {
    pub user_id: i64,
    pub reason: String,
}

impl DeliveryError {
    pub fn new(user_id: i64, reason: impl Into<String>) -> Self {
        Self {
            user_id,
            reason: reason.into(),
        }
    }
}

/// The repository could not serve a read or write
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlite::Error),

    /// A persisted row that no longer parses (bad fire time, unknown
    /// category)
    #[error("malformed record: {0}")]
    Malformed(String),
}
