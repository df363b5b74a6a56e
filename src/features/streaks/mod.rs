//! # Streaks Feature
//!
//! Consecutive-completion counters, adjusted from the done/missed response
//! tags a dispatched reminder carries. Dispatch itself never touches the
//! counters; they only move when the user answers.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.5.0
//! - **Toggleable**: true

use std::sync::Arc;

use log::info;

use crate::core::error::StorageError;
use crate::core::types::{Category, ReminderTime};
use crate::database::ReminderStore;
use crate::delivery::{ResponseKind, ResponseTag};

/// Result of applying one reminder response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    pub category: Category,
    /// Counter after the response was applied
    pub streak: i64,
    /// Counter before the response was applied
    pub previous: i64,
}

/// One row of a user's streak overview
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakEntry {
    pub category: Category,
    pub time: ReminderTime,
    pub streak: i64,
}

/// Applies reminder responses to the persisted streak counters
#[derive(Clone)]
pub struct StreakService {
    store: Arc<dyn ReminderStore>,
}

impl StreakService {
    pub fn new(store: Arc<dyn ReminderStore>) -> Self {
        Self { store }
    }

    /// Apply a done/missed response to the user's counter
    pub async fn apply_response(
        &self,
        user_id: i64,
        tag: ResponseTag,
    ) -> Result<StreakUpdate, StorageError> {
        match tag.kind {
            ResponseKind::Done => {
                let streak = self.store.increment_streak(user_id, tag.category).await?;
                info!("User {user_id} kept the {} streak going: {streak}", tag.category);
                Ok(StreakUpdate {
                    category: tag.category,
                    streak,
                    previous: streak - 1,
                })
            }
            ResponseKind::Missed => {
                let previous = self.store.streak(user_id, tag.category).await?;
                self.store.reset_streak(user_id, tag.category).await?;
                info!("User {user_id} broke the {} streak at {previous}", tag.category);
                Ok(StreakUpdate {
                    category: tag.category,
                    streak: 0,
                    previous,
                })
            }
        }
    }

    /// Every reminder the user has, with current streaks
    pub async fn overview(&self, user_id: i64) -> Result<Vec<StreakEntry>, StorageError> {
        let rows = self.store.reminders_for_user(user_id).await?;
        Ok(rows
            .into_iter()
            .map(|(spec, streak)| StreakEntry {
                category: spec.key.category,
                time: spec.time,
                streak,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;

    fn time(hour: u32, minute: u32) -> ReminderTime {
        ReminderTime::new(hour, minute).unwrap()
    }

    async fn seeded_service() -> StreakService {
        let db = Database::in_memory().unwrap();
        db.add_user(42, "Alice").await.unwrap();
        db.upsert_reminder(42, Category::Water, time(8, 0)).await.unwrap();
        StreakService::new(Arc::new(db))
    }

    #[tokio::test]
    async fn test_done_response_increments() {
        let service = seeded_service().await;

        let update = service
            .apply_response(42, ResponseTag::done(Category::Water))
            .await
            .unwrap();
        assert_eq!(update.streak, 1);
        assert_eq!(update.previous, 0);

        let update = service
            .apply_response(42, ResponseTag::done(Category::Water))
            .await
            .unwrap();
        assert_eq!(update.streak, 2);
        assert_eq!(update.previous, 1);
    }

    #[tokio::test]
    async fn test_missed_response_resets_and_reports_previous() {
        let service = seeded_service().await;
        for _ in 0..3 {
            service
                .apply_response(42, ResponseTag::done(Category::Water))
                .await
                .unwrap();
        }

        let update = service
            .apply_response(42, ResponseTag::missed(Category::Water))
            .await
            .unwrap();
        assert_eq!(update.streak, 0);
        assert_eq!(update.previous, 3);
    }

    #[tokio::test]
    async fn test_overview_lists_reminders_with_streaks() {
        let db = Database::in_memory().unwrap();
        db.add_user(42, "Alice").await.unwrap();
        db.upsert_reminder(42, Category::Water, time(8, 0)).await.unwrap();
        db.upsert_reminder(42, Category::Sleep, time(23, 0)).await.unwrap();
        let service = StreakService::new(Arc::new(db));

        service
            .apply_response(42, ResponseTag::done(Category::Sleep))
            .await
            .unwrap();

        let mut overview = service.overview(42).await.unwrap();
        overview.sort_by_key(|entry| entry.time);
        assert_eq!(overview.len(), 2);
        assert_eq!(overview[0].category, Category::Water);
        assert_eq!(overview[0].streak, 0);
        assert_eq!(overview[1].category, Category::Sleep);
        assert_eq!(overview[1].streak, 1);
    }
}
