//! # Reminder Dispatch Job
//!
//! The callback body bound to one (user, category) pair: resolve the
//! display name, render the message, attach the done/missed affordances,
//! send. Failures here are logged and swallowed; the engine's daily cycle
//! must survive any single bad dispatch.
//!
//! - **Version**: 2.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.1.0: Custom reminders interpolate the stored label
//! - 2.0.0: Injected collaborators replace process-wide statics
//! - 1.0.0: Initial dispatch with inline response buttons

use std::sync::Arc;

use log::{debug, info, warn};
use uuid::Uuid;

use crate::core::types::{Category, ReminderKey};
use crate::database::ReminderStore;
use crate::delivery::{Delivery, ResponseAffordances};
use crate::features::templates::TemplateSource;

/// Name used when the user record has no display name to offer
const FALLBACK_NAME: &str = "friend";

/// Fire-time dispatch bound to one reminder key
#[derive(Clone)]
pub struct ReminderJob {
    key: ReminderKey,
    store: Arc<dyn ReminderStore>,
    delivery: Arc<dyn Delivery>,
    templates: Arc<dyn TemplateSource>,
}

impl ReminderJob {
    pub fn new(
        key: ReminderKey,
        store: Arc<dyn ReminderStore>,
        delivery: Arc<dyn Delivery>,
        templates: Arc<dyn TemplateSource>,
    ) -> Self {
        Self {
            key,
            store,
            delivery,
            templates,
        }
    }

    /// Render and send one reminder
    ///
    /// Lookup misses fall back (a missing name never cancels a reminder)
    /// and delivery failures end here with a log line; tomorrow's fire is
    /// the retry.
    pub async fn run(&self) {
        let dispatch_id = Uuid::new_v4();
        let ReminderKey { user_id, category } = self.key;
        debug!("[{dispatch_id}] Dispatching {category} reminder to user {user_id}");

        let display_name = self.resolve_display_name(dispatch_id).await;
        let text = self.render_text(dispatch_id, &display_name).await;
        let affordances = ResponseAffordances::for_category(category);

        match self.delivery.send(user_id, &text, Some(affordances)).await {
            Ok(()) => info!("[{dispatch_id}] Reminder delivered to user {user_id}"),
            Err(err) => warn!("[{dispatch_id}] {err}"),
        }
    }

    async fn resolve_display_name(&self, dispatch_id: Uuid) -> String {
        match self.store.display_name(self.key.user_id).await {
            Ok(Some(name)) => name,
            Ok(None) => {
                debug!(
                    "[{dispatch_id}] No display name for user {}, using fallback",
                    self.key.user_id
                );
                FALLBACK_NAME.to_string()
            }
            Err(err) => {
                warn!(
                    "[{dispatch_id}] Display name lookup failed for user {}: {err}",
                    self.key.user_id
                );
                FALLBACK_NAME.to_string()
            }
        }
    }

    async fn render_text(&self, dispatch_id: Uuid, display_name: &str) -> String {
        if self.key.category == Category::Custom {
            match self.store.custom_label(self.key.user_id).await {
                Ok(Some(label)) => return self.templates.render_custom(&label, display_name),
                Ok(None) => debug!(
                    "[{dispatch_id}] No custom label stored for user {}",
                    self.key.user_id
                ),
                Err(err) => warn!(
                    "[{dispatch_id}] Custom label lookup failed for user {}: {err}",
                    self.key.user_id
                ),
            }
        }
        self.templates.render(self.key.category, display_name)
    }
}
