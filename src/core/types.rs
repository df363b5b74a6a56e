//! Domain types for reminders
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Custom category and deterministic trigger ids
//! - 1.0.0: Initial implementation

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use super::error::SchedulingError;

/// Habit category a reminder belongs to
///
/// The stock categories carry built-in message templates; `Custom`
/// reminders interpolate a user-supplied label persisted in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Water,
    Exercise,
    Sleep,
    Read,
    Custom,
}

impl Category {
    /// All categories selectable from the habit menu
    pub const ALL: [Category; 5] = [
        Category::Water,
        Category::Exercise,
        Category::Sleep,
        Category::Read,
        Category::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Water => "water",
            Category::Exercise => "exercise",
            Category::Sleep => "sleep",
            Category::Read => "read",
            Category::Custom => "custom",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "water" => Ok(Category::Water),
            "exercise" => Ok(Category::Exercise),
            "sleep" => Ok(Category::Sleep),
            "read" => Ok(Category::Read),
            "custom" => Ok(Category::Custom),
            _ => Err(anyhow::anyhow!("Invalid category: {}", s)),
        }
    }
}

/// Wall-clock fire time of a daily reminder, minute precision
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ReminderTime(NaiveTime);

impl ReminderTime {
    /// Validate an hour/minute pair
    pub fn new(hour: u32, minute: u32) -> Result<Self, SchedulingError> {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(Self)
            .ok_or(SchedulingError::InvalidTime { hour, minute })
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub(crate) fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for ReminderTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ReminderTime {
    type Err = SchedulingError;

    /// Parse chat input in strict `HH:MM` form, e.g. `17:30`
    fn from_str(s: &str) -> Result<Self, SchedulingError> {
        let text = s.trim();
        let unparsable = || SchedulingError::UnparsableTime(text.to_string());

        let (hour_part, minute_part) = text.split_once(':').ok_or_else(unparsable)?;
        if hour_part.len() != 2 || minute_part.len() != 2 {
            return Err(unparsable());
        }
        let hour: u32 = hour_part.parse().map_err(|_| unparsable())?;
        let minute: u32 = minute_part.parse().map_err(|_| unparsable())?;
        Self::new(hour, minute)
    }
}

/// Composite identity of one active reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReminderKey {
    pub user_id: i64,
    pub category: Category,
}

impl ReminderKey {
    pub fn new(user_id: i64, category: Category) -> Self {
        Self { user_id, category }
    }

    /// Deterministic engine trigger id for this key
    pub fn trigger_id(&self) -> String {
        format!("job:{}:{}", self.user_id, self.category)
    }
}

/// A persisted reminder record: who, which habit, and when each day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSpec {
    pub key: ReminderKey,
    pub time: ReminderTime,
}

impl ReminderSpec {
    pub fn new(user_id: i64, category: Category, time: ReminderTime) -> Self {
        Self {
            key: ReminderKey::new(user_id, category),
            time,
        }
    }
}
