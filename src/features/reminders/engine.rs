//! # Trigger Engine
//!
//! Named daily-recurring triggers over a single background scheduling loop.
//!
//! The engine owns trigger lifecycle only: it knows nothing about reminder
//! keys or de-duplication (the scheduler facade's job) and holds no state
//! across restarts. The loop sleeps until the nearest due time and is woken
//! early when a trigger is armed or cancelled. A fired trigger advances its
//! due time before the callback runs, so a cancel that lands mid-dispatch
//! always wins over the in-flight re-arm.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Plain string trigger ids and an injected clock
//! - 1.0.0: Initial daily loop

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use anyhow::Result;
use chrono::NaiveDateTime;
use log::{debug, warn};
use tokio::sync::Notify;

use crate::core::error::SchedulingError;
use crate::core::types::ReminderTime;

use super::clock::Clock;

/// Future returned by a trigger callback
pub type TriggerFuture = Pin<Box<dyn Future<Output = Result<()>> + Send>>;

/// Callback invoked each time a trigger fires
pub type TriggerCallback = Arc<dyn Fn() -> TriggerFuture + Send + Sync>;

/// How long the loop parks when no triggers are armed
const IDLE_PARK: Duration = Duration::from_secs(3600);

struct TriggerEntry {
    next_due: NaiveDateTime,
    callback: TriggerCallback,
}

struct EngineInner {
    clock: Arc<dyn Clock>,
    triggers: Mutex<HashMap<String, TriggerEntry>>,
    wake: Arc<Notify>,
}

impl EngineInner {
    fn lock_triggers(&self) -> MutexGuard<'_, HashMap<String, TriggerEntry>> {
        self.triggers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// In-process table of named daily triggers
///
/// Cheap to clone; all clones share one trigger table and one scheduling
/// loop. The loop exits once every clone has been dropped.
#[derive(Clone)]
pub struct TriggerEngine {
    inner: Arc<EngineInner>,
}

impl TriggerEngine {
    /// Start an engine and its scheduling loop on the current runtime
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let inner = Arc::new(EngineInner {
            clock,
            triggers: Mutex::new(HashMap::new()),
            wake: Arc::new(Notify::new()),
        });
        tokio::spawn(scheduling_loop(Arc::downgrade(&inner)));
        Self { inner }
    }

    /// Arm a daily trigger
    ///
    /// The first fire lands today if `time` is still ahead of the wall
    /// clock, otherwise tomorrow; after that the trigger re-fires every day
    /// until cancelled. Arming an id that is already armed is an error;
    /// replace-by-key semantics live in the scheduler facade.
    pub fn arm(
        &self,
        trigger_id: &str,
        time: ReminderTime,
        callback: TriggerCallback,
    ) -> Result<(), SchedulingError> {
        let next_due = first_occurrence(self.inner.clock.now(), time);
        {
            let mut triggers = self.inner.lock_triggers();
            if triggers.contains_key(trigger_id) {
                return Err(SchedulingError::DuplicateTrigger(trigger_id.to_string()));
            }
            triggers.insert(trigger_id.to_string(), TriggerEntry { next_due, callback });
        }
        self.inner.wake.notify_one();
        debug!("Armed trigger {trigger_id}, first fire at {next_due}");
        Ok(())
    }

    /// Cancel a trigger; returns whether one was armed under this id
    pub fn cancel(&self, trigger_id: &str) -> bool {
        let removed = self.inner.lock_triggers().remove(trigger_id).is_some();
        if removed {
            self.inner.wake.notify_one();
            debug!("Cancelled trigger {trigger_id}");
        }
        removed
    }

    /// Whether a trigger is armed under this id
    pub fn exists(&self, trigger_id: &str) -> bool {
        self.inner.lock_triggers().contains_key(trigger_id)
    }

    /// Next due time of an armed trigger
    pub fn next_due(&self, trigger_id: &str) -> Option<NaiveDateTime> {
        self.inner
            .lock_triggers()
            .get(trigger_id)
            .map(|entry| entry.next_due)
    }

    /// Number of armed triggers
    pub fn armed_count(&self) -> usize {
        self.inner.lock_triggers().len()
    }
}

impl Drop for TriggerEngine {
    fn drop(&mut self) {
        // Wake the loop so the last drop ends it promptly instead of at the
        // end of its current sleep.
        self.inner.wake.notify_one();
    }
}

async fn scheduling_loop(engine: Weak<EngineInner>) {
    loop {
        let Some(inner) = engine.upgrade() else { break };
        let now = inner.clock.now();

        // Fire everything due. Each entry advances before its callback runs,
        // so a cancel during dispatch can never re-insert it.
        let due: Vec<(String, TriggerCallback)> = {
            let mut triggers = inner.lock_triggers();
            triggers
                .iter_mut()
                .filter(|(_, entry)| entry.next_due <= now)
                .map(|(id, entry)| {
                    entry.next_due = advance_daily(entry.next_due, now);
                    (id.clone(), Arc::clone(&entry.callback))
                })
                .collect()
        };

        for (trigger_id, callback) in due {
            debug!("Trigger {trigger_id} fired");
            if let Err(err) = callback().await {
                warn!("Trigger {trigger_id} callback failed: {err:#}");
            }
        }

        // Sleep until the nearest due time; arm/cancel wakes us early.
        let sleep_for = {
            let triggers = inner.lock_triggers();
            triggers
                .values()
                .map(|entry| entry.next_due)
                .min()
                .map(|next| (next - inner.clock.now()).to_std().unwrap_or(Duration::ZERO))
                .unwrap_or(IDLE_PARK)
        };
        let wake = Arc::clone(&inner.wake);
        drop(inner);

        tokio::select! {
            _ = tokio::time::sleep(sleep_for) => {}
            _ = wake.notified() => {}
        }
    }
    debug!("Scheduling loop stopped");
}

/// First wall-clock occurrence of `time`: today if still ahead, else tomorrow
fn first_occurrence(now: NaiveDateTime, time: ReminderTime) -> NaiveDateTime {
    let today = now.date().and_time(time.as_naive());
    if today > now {
        today
    } else {
        today + chrono::Duration::days(1)
    }
}

/// Advance a due time by whole days until it is in the future
///
/// After an outage spanning several day boundaries this yields one catch-up
/// fire, not a stacked burst.
fn advance_daily(mut due: NaiveDateTime, now: NaiveDateTime) -> NaiveDateTime {
    while due <= now {
        due += chrono::Duration::days(1);
    }
    due
}
