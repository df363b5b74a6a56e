//! # Reminder Scheduler
//!
//! Key registry and public facade over the trigger engine: exactly one
//! active trigger per (user, category), cancel-before-arm replacement, and
//! restart bootstrap from the persisted reminder set.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Injected store/delivery/templates replace process-wide statics
//! - 1.0.0: Initial cancel-before-arm scheduling

use std::sync::Arc;

use dashmap::DashMap;
use log::{debug, info, warn};
use tokio::sync::Mutex;

use crate::core::error::{SchedulingError, StorageError};
use crate::core::types::{Category, ReminderKey, ReminderTime};
use crate::database::ReminderStore;
use crate::delivery::Delivery;
use crate::features::templates::TemplateSource;

use super::engine::{TriggerCallback, TriggerEngine};
use super::job::ReminderJob;

/// Public scheduling entry point used by command-handling code
///
/// Holds its collaborators explicitly; nothing lives in process-wide
/// statics, so two schedulers in one process stay fully independent.
#[derive(Clone)]
pub struct ReminderScheduler {
    engine: TriggerEngine,
    store: Arc<dyn ReminderStore>,
    delivery: Arc<dyn Delivery>,
    templates: Arc<dyn TemplateSource>,
    key_locks: Arc<DashMap<ReminderKey, Arc<Mutex<()>>>>,
}

impl ReminderScheduler {
    pub fn new(
        engine: TriggerEngine,
        store: Arc<dyn ReminderStore>,
        delivery: Arc<dyn Delivery>,
        templates: Arc<dyn TemplateSource>,
    ) -> Self {
        Self {
            engine,
            store,
            delivery,
            templates,
            key_locks: Arc::new(DashMap::new()),
        }
    }

    /// The underlying trigger engine
    pub fn engine(&self) -> &TriggerEngine {
        &self.engine
    }

    /// Arm (or re-arm) the daily trigger for one key
    ///
    /// Idempotent: the latest call wins and exactly one trigger stays
    /// armed. Concurrent calls for the same key serialize on a per-key
    /// lock; calls for different keys proceed in parallel. On failure the
    /// prior trigger stays cancelled and the caller decides what to tell
    /// the user.
    pub async fn schedule_or_replace(
        &self,
        user_id: i64,
        category: Category,
        time: ReminderTime,
    ) -> Result<(), SchedulingError> {
        let key = ReminderKey::new(user_id, category);
        let lock = self.key_lock(key);
        let _guard = lock.lock().await;

        let trigger_id = key.trigger_id();
        if self.engine.exists(&trigger_id) {
            self.engine.cancel(&trigger_id);
            debug!("Replacing trigger {trigger_id}");
        }

        let job = ReminderJob::new(
            key,
            Arc::clone(&self.store),
            Arc::clone(&self.delivery),
            Arc::clone(&self.templates),
        );
        let callback: TriggerCallback = Arc::new(move || {
            let job = job.clone();
            Box::pin(async move {
                job.run().await;
                Ok(())
            })
        });

        self.engine.arm(&trigger_id, time, callback)?;
        info!("Scheduled daily reminder {trigger_id} at {time}");
        Ok(())
    }

    /// Disarm the trigger for one key; absent triggers are a no-op
    pub async fn cancel(&self, user_id: i64, category: Category) -> bool {
        let key = ReminderKey::new(user_id, category);
        let lock = self.key_lock(key);
        let _guard = lock.lock().await;

        let removed = self.engine.cancel(&key.trigger_id());
        if removed {
            info!("Cancelled daily reminder {}", key.trigger_id());
        } else {
            debug!("No active trigger for {}, nothing to cancel", key.trigger_id());
        }
        removed
    }

    /// Re-arm every persisted reminder after a restart
    ///
    /// The engine holds no state across restarts. A record that fails to
    /// schedule is logged and skipped so it cannot sink the remaining ones;
    /// duplicate keys in the stored set collapse to a single trigger.
    pub async fn bootstrap_from_storage(&self) -> Result<usize, StorageError> {
        let reminders = self.store.all_reminders().await?;
        let total = reminders.len();

        let mut armed = 0;
        for spec in reminders {
            match self
                .schedule_or_replace(spec.key.user_id, spec.key.category, spec.time)
                .await
            {
                Ok(()) => armed += 1,
                Err(err) => {
                    warn!("Skipping persisted reminder {}: {err}", spec.key.trigger_id())
                }
            }
        }

        info!("Re-armed {armed} of {total} persisted reminders");
        Ok(armed)
    }

    fn key_lock(&self, key: ReminderKey) -> Arc<Mutex<()>> {
        self.key_locks.entry(key).or_default().value().clone()
    }
}
