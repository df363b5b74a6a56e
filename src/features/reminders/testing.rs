//! Shared test doubles for the reminder feature

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use crate::core::error::{DeliveryError, StorageError};
use crate::core::types::{Category, ReminderSpec, ReminderTime};
use crate::database::ReminderStore;
use crate::delivery::{Delivery, ResponseAffordances};
use crate::features::reminders::clock::Clock;

/// Simulated wall clock derived from tokio's pausable timer
///
/// With `#[tokio::test(start_paused = true)]`, `tokio::time::sleep` in a
/// test advances both the runtime and this clock, so "wait a day" runs in
/// microseconds.
pub(crate) struct SimClock {
    epoch: NaiveDateTime,
    started: tokio::time::Instant,
}

impl SimClock {
    /// Fixed calendar date all simulated clocks start on
    pub fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    /// Clock reading `hour:minute` on the fixed test date
    pub fn starting_at(hour: u32, minute: u32) -> Arc<Self> {
        let epoch = Self::test_date().and_hms_opt(hour, minute, 0).unwrap();
        Arc::new(Self {
            epoch,
            started: tokio::time::Instant::now(),
        })
    }

    pub fn epoch(&self) -> NaiveDateTime {
        self.epoch
    }
}

impl Clock for SimClock {
    fn now(&self) -> NaiveDateTime {
        let elapsed = chrono::Duration::from_std(self.started.elapsed())
            .unwrap_or_else(|_| chrono::Duration::zero());
        self.epoch + elapsed
    }
}

#[derive(Clone)]
pub(crate) struct StoredRow {
    pub user_id: i64,
    pub category: Category,
    pub time: ReminderTime,
    pub streak: i64,
}

/// In-memory store; reminder rows live in a Vec so tests can inject data
/// anomalies such as duplicate keys
#[derive(Default)]
pub(crate) struct MockStore {
    pub users: Mutex<HashMap<i64, String>>,
    pub rows: Mutex<Vec<StoredRow>>,
    pub customs: Mutex<HashMap<i64, String>>,
    lookups_fail: AtomicBool,
}

impl MockStore {
    pub fn insert_user(&self, user_id: i64, name: &str) {
        self.users.lock().unwrap().insert(user_id, name.to_string());
    }

    pub fn insert_custom_label(&self, user_id: i64, label: &str) {
        self.customs.lock().unwrap().insert(user_id, label.to_string());
    }

    pub fn push_row(&self, user_id: i64, category: Category, time: ReminderTime) {
        self.rows.lock().unwrap().push(StoredRow {
            user_id,
            category,
            time,
            streak: 0,
        });
    }

    /// Make every lookup return a storage error
    pub fn fail_lookups(&self) {
        self.lookups_fail.store(true, Ordering::SeqCst);
    }

    fn check_failure(&self) -> Result<(), StorageError> {
        if self.lookups_fail.load(Ordering::SeqCst) {
            Err(StorageError::Malformed("simulated store failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ReminderStore for MockStore {
    async fn add_user(&self, user_id: i64, display_name: &str) -> Result<(), StorageError> {
        self.users
            .lock()
            .unwrap()
            .entry(user_id)
            .or_insert_with(|| display_name.to_string());
        Ok(())
    }

    async fn display_name(&self, user_id: i64) -> Result<Option<String>, StorageError> {
        self.check_failure()?;
        Ok(self.users.lock().unwrap().get(&user_id).cloned())
    }

    async fn reminder_time(
        &self,
        user_id: i64,
        category: Category,
    ) -> Result<Option<ReminderTime>, StorageError> {
        self.check_failure()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.user_id == user_id && row.category == category)
            .map(|row| row.time))
    }

    async fn upsert_reminder(
        &self,
        user_id: i64,
        category: Category,
        time: ReminderTime,
    ) -> Result<(), StorageError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows
            .iter_mut()
            .find(|row| row.user_id == user_id && row.category == category)
        {
            row.time = time;
        } else {
            rows.push(StoredRow {
                user_id,
                category,
                time,
                streak: 0,
            });
        }
        Ok(())
    }

    async fn delete_reminder(&self, user_id: i64, category: Category) -> Result<(), StorageError> {
        self.rows
            .lock()
            .unwrap()
            .retain(|row| !(row.user_id == user_id && row.category == category));
        Ok(())
    }

    async fn all_reminders(&self) -> Result<Vec<ReminderSpec>, StorageError> {
        self.check_failure()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .map(|row| ReminderSpec::new(row.user_id, row.category, row.time))
            .collect())
    }

    async fn reminders_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<(ReminderSpec, i64)>, StorageError> {
        self.check_failure()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.user_id == user_id)
            .map(|row| (ReminderSpec::new(row.user_id, row.category, row.time), row.streak))
            .collect())
    }

    async fn custom_label(&self, user_id: i64) -> Result<Option<String>, StorageError> {
        self.check_failure()?;
        Ok(self.customs.lock().unwrap().get(&user_id).cloned())
    }

    async fn set_custom_label(&self, user_id: i64, label: &str) -> Result<(), StorageError> {
        self.customs.lock().unwrap().insert(user_id, label.to_string());
        Ok(())
    }

    async fn streak(&self, user_id: i64, category: Category) -> Result<i64, StorageError> {
        self.check_failure()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.user_id == user_id && row.category == category)
            .map(|row| row.streak)
            .unwrap_or(0))
    }

    async fn increment_streak(
        &self,
        user_id: i64,
        category: Category,
    ) -> Result<i64, StorageError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows
            .iter_mut()
            .find(|row| row.user_id == user_id && row.category == category)
        {
            row.streak += 1;
            Ok(row.streak)
        } else {
            Ok(0)
        }
    }

    async fn reset_streak(&self, user_id: i64, category: Category) -> Result<(), StorageError> {
        if let Some(row) = self
            .rows
            .lock()
            .unwrap()
            .iter_mut()
            .find(|row| row.user_id == user_id && row.category == category)
        {
            row.streak = 0;
        }
        Ok(())
    }
}

#[derive(Clone)]
pub(crate) struct SentMessage {
    pub user_id: i64,
    pub text: String,
    pub affordances: Option<ResponseAffordances>,
}

/// Recording delivery stub; can fail the first N sends
#[derive(Default)]
pub(crate) struct MockDelivery {
    pub sent: Mutex<Vec<SentMessage>>,
    failures_remaining: AtomicUsize,
}

impl MockDelivery {
    pub fn failing_first(count: usize) -> Arc<Self> {
        let delivery = Self::default();
        delivery.failures_remaining.store(count, Ordering::SeqCst);
        Arc::new(delivery)
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Delivery for MockDelivery {
    async fn send(
        &self,
        user_id: i64,
        text: &str,
        affordances: Option<ResponseAffordances>,
    ) -> Result<(), DeliveryError> {
        self.sent.lock().unwrap().push(SentMessage {
            user_id,
            text: text.to_string(),
            affordances,
        });
        let remaining = self.failures_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_remaining.store(remaining - 1, Ordering::SeqCst);
            return Err(DeliveryError::new(user_id, "recipient unreachable"));
        }
        Ok(())
    }
}
