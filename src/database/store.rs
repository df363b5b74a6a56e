//! Repository contract for users, reminders, streaks, and custom labels
//!
//! Lookup misses are `Ok(None)` or a default value, never errors; `Err`
//! means the store itself failed.

use async_trait::async_trait;

use crate::core::error::StorageError;
use crate::core::types::{Category, ReminderSpec, ReminderTime};

/// Persistence seam consumed by the scheduler, dispatch job, and streak
/// service
#[async_trait]
pub trait ReminderStore: Send + Sync {
    /// Register a user, keeping the existing record on conflict
    async fn add_user(&self, user_id: i64, display_name: &str) -> Result<(), StorageError>;

    /// Display name for a user, if known
    async fn display_name(&self, user_id: i64) -> Result<Option<String>, StorageError>;

    /// Fire time currently persisted for a key
    async fn reminder_time(
        &self,
        user_id: i64,
        category: Category,
    ) -> Result<Option<ReminderTime>, StorageError>;

    /// Create or replace the persisted fire time for a key
    async fn upsert_reminder(
        &self,
        user_id: i64,
        category: Category,
        time: ReminderTime,
    ) -> Result<(), StorageError>;

    /// Remove a key's persisted reminder; absent rows are a no-op
    async fn delete_reminder(&self, user_id: i64, category: Category) -> Result<(), StorageError>;

    /// Every persisted reminder, for engine bootstrap at process start
    async fn all_reminders(&self) -> Result<Vec<ReminderSpec>, StorageError>;

    /// One user's reminders paired with their current streaks
    async fn reminders_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<(ReminderSpec, i64)>, StorageError>;

    /// Free-text label backing the user's custom reminder
    async fn custom_label(&self, user_id: i64) -> Result<Option<String>, StorageError>;

    /// Store or replace the user's custom reminder label
    async fn set_custom_label(&self, user_id: i64, label: &str) -> Result<(), StorageError>;

    /// Current streak counter, 0 when the key is unknown
    async fn streak(&self, user_id: i64, category: Category) -> Result<i64, StorageError>;

    /// Bump the streak counter and return the new value
    async fn increment_streak(
        &self,
        user_id: i64,
        category: Category,
    ) -> Result<i64, StorageError>;

    /// Reset the streak counter to zero
    async fn reset_streak(&self, user_id: i64, category: Category) -> Result<(), StorageError>;
}
