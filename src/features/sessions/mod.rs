//! # Sessions Feature
//!
//! Per-user pending-input state for the two-step reminder setup flow: pick
//! a category, then type an HH:MM time (custom reminders add a label step
//! in between). Keyed by user id so concurrent conversations never bleed
//! into each other.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.6.0
//! - **Toggleable**: false

use std::sync::Arc;

use dashmap::DashMap;

use crate::core::types::Category;

/// What the bot is waiting for from one user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingInput {
    /// Waiting for the free-text label of a custom reminder
    AwaitingCustomLabel,
    /// Waiting for an HH:MM fire time for this category
    AwaitingFireTime { category: Category },
}

/// Concurrent map of in-progress setup conversations
#[derive(Clone, Default)]
pub struct SessionMap {
    inner: Arc<DashMap<i64, PendingInput>>,
}

impl SessionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a category was picked and a fire time is expected next
    pub fn expect_fire_time(&self, user_id: i64, category: Category) {
        self.inner
            .insert(user_id, PendingInput::AwaitingFireTime { category });
    }

    /// Record that a custom label is expected next
    pub fn expect_custom_label(&self, user_id: i64) {
        self.inner.insert(user_id, PendingInput::AwaitingCustomLabel);
    }

    /// Consume the user's pending state, if any
    pub fn take(&self, user_id: i64) -> Option<PendingInput> {
        self.inner.remove(&user_id).map(|(_, pending)| pending)
    }

    /// Peek at the pending state without consuming it
    pub fn pending(&self, user_id: i64) -> Option<PendingInput> {
        self.inner.get(&user_id).map(|entry| entry.value().clone())
    }

    /// Drop the user's pending state, e.g. when the menu is reopened
    pub fn clear(&self, user_id: i64) {
        self.inner.remove(&user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_users_do_not_share_state() {
        let sessions = SessionMap::new();
        sessions.expect_fire_time(1, Category::Water);
        sessions.expect_fire_time(2, Category::Sleep);

        assert_eq!(
            sessions.pending(1),
            Some(PendingInput::AwaitingFireTime {
                category: Category::Water
            })
        );
        assert_eq!(
            sessions.pending(2),
            Some(PendingInput::AwaitingFireTime {
                category: Category::Sleep
            })
        );
    }

    #[test]
    fn test_take_consumes_pending_state() {
        let sessions = SessionMap::new();
        sessions.expect_custom_label(7);

        assert_eq!(sessions.take(7), Some(PendingInput::AwaitingCustomLabel));
        assert_eq!(sessions.take(7), None);
    }

    #[test]
    fn test_later_expectation_replaces_earlier() {
        let sessions = SessionMap::new();
        sessions.expect_custom_label(7);
        sessions.expect_fire_time(7, Category::Custom);

        assert_eq!(
            sessions.pending(7),
            Some(PendingInput::AwaitingFireTime {
                category: Category::Custom
            })
        );
    }

    #[test]
    fn test_clear_removes_state() {
        let sessions = SessionMap::new();
        sessions.expect_fire_time(7, Category::Read);
        sessions.clear(7);
        assert_eq!(sessions.pending(7), None);
    }
}
