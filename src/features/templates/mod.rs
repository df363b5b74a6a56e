//! # Message Templates
//!
//! Render pools for reminder messages, three per stock category, picked
//! uniformly at random. Custom reminders interpolate the user's own label
//! instead of a pool line.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Custom-label renderer
//! - 1.0.0: Initial template pools

use rand::seq::IndexedRandom;

use crate::core::types::Category;

/// Line used for categories without a template pool
const FALLBACK_TEMPLATE: &str = "{name}, you have a reminder.";

const WATER: [&str; 3] = [
    "{name}, drink a glass of water and future you will thank you 💦",
    "{name}, don't forget to drink some water for your health 💦",
    "{name}, time to hydrate! It matters more than you think 💦",
];

const EXERCISE: [&str; 3] = [
    "{name}, time to get moving! 💪",
    "{name}, a quick stretch and a few exercises are due! 💪",
    "{name}, don't skip your workout today! 💪",
];

const SLEEP: [&str; 3] = [
    "{name}, time to wind down for bed 💤",
    "{name}, don't stay up too late tonight 💤",
    "{name}, bedtime! Rest is not optional 💤",
];

const READ: [&str; 3] = [
    "{name}, your favorite book is waiting 📚",
    "{name}, time to read something interesting 📚",
    "{name}, find a minute for a few pages 📚",
];

/// Renders the reminder text dispatched at fire time
///
/// Pure: no side effects, and unknown or poolless categories render a
/// generic line instead of failing.
pub trait TemplateSource: Send + Sync {
    /// Random pool line for the category with the display name interpolated
    fn render(&self, category: Category, display_name: &str) -> String;

    /// Custom reminder text built from the user's own label
    fn render_custom(&self, label: &str, display_name: &str) -> String;
}

/// Built-in template pools
#[derive(Debug, Default, Clone, Copy)]
pub struct MessageTemplates;

impl MessageTemplates {
    fn pool(category: Category) -> Option<&'static [&'static str]> {
        match category {
            Category::Water => Some(&WATER),
            Category::Exercise => Some(&EXERCISE),
            Category::Sleep => Some(&SLEEP),
            Category::Read => Some(&READ),
            Category::Custom => None,
        }
    }
}

impl TemplateSource for MessageTemplates {
    fn render(&self, category: Category, display_name: &str) -> String {
        let template = Self::pool(category)
            .and_then(|pool| pool.choose(&mut rand::rng()))
            .copied()
            .unwrap_or(FALLBACK_TEMPLATE);
        template.replace("{name}", display_name)
    }

    fn render_custom(&self, label: &str, display_name: &str) -> String {
        format!("{display_name}, it's time for \"{label}\" ⏰")
    }
}
