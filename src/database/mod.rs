//! # Database Module
//!
//! Repository contract consumed by the reminder core plus the sqlite-backed
//! implementation used in production.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Explicit ReminderStore trait so the scheduler takes any store
//! - 1.1.0: Streak counters and custom reminder labels
//! - 1.0.0: Initial users/activities schema

pub mod store;

pub use store::ReminderStore;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};
use sqlite::{Connection, State};
use tokio::sync::Mutex;

use crate::core::error::StorageError;
use crate::core::types::{Category, ReminderSpec, ReminderTime};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    chat_id INTEGER NOT NULL UNIQUE,
    display_name TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS activities (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users (id),
    category TEXT NOT NULL,
    fire_time TEXT NOT NULL,
    streak_num INTEGER NOT NULL DEFAULT 0,
    UNIQUE (user_id, category)
);
CREATE TABLE IF NOT EXISTS customs (
    user_id INTEGER PRIMARY KEY REFERENCES users (id),
    custom_text TEXT NOT NULL
);
";

/// Sqlite-backed reminder store
///
/// Cheap to clone; all clones share one connection behind an async mutex.
#[derive(Clone)]
pub struct Database {
    connection: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database file and apply the schema
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let connection = sqlite::open(&path)?;
        connection.execute(SCHEMA)?;
        info!("Database ready at {}", path.as_ref().display());
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// In-memory database, used by tests
    pub fn in_memory() -> Result<Self, StorageError> {
        Self::open(":memory:")
    }

    /// Run arbitrary statements, for test fixtures and migrations
    pub async fn execute(&self, statements: &str) -> Result<(), StorageError> {
        let connection = self.connection.lock().await;
        connection.execute(statements)?;
        Ok(())
    }
}

fn read_streak(
    connection: &Connection,
    user_id: i64,
    category: Category,
) -> Result<i64, StorageError> {
    let mut statement = connection.prepare(
        "SELECT a.streak_num FROM activities a \
         JOIN users u ON a.user_id = u.id \
         WHERE u.chat_id = ? AND a.category = ?",
    )?;
    statement.bind((1, user_id))?;
    statement.bind((2, category.as_str()))?;
    if let State::Row = statement.next()? {
        Ok(statement.read::<i64, _>("streak_num")?)
    } else {
        Ok(0)
    }
}

fn parse_row(
    user_id: i64,
    category: &str,
    fire_time: &str,
) -> Result<ReminderSpec, StorageError> {
    let category: Category = category
        .parse()
        .map_err(|_| StorageError::Malformed(format!("category `{category}` for user {user_id}")))?;
    let time: ReminderTime = fire_time
        .parse()
        .map_err(|_| StorageError::Malformed(format!("fire_time `{fire_time}` for user {user_id}")))?;
    Ok(ReminderSpec::new(user_id, category, time))
}

#[async_trait]
impl ReminderStore for Database {
    async fn add_user(&self, user_id: i64, display_name: &str) -> Result<(), StorageError> {
        let connection = self.connection.lock().await;
        let mut statement = connection.prepare(
            "INSERT INTO users (chat_id, display_name) VALUES (?, ?) \
             ON CONFLICT (chat_id) DO NOTHING",
        )?;
        statement.bind((1, user_id))?;
        statement.bind((2, display_name))?;
        statement.next()?;
        debug!("Registered user {user_id}");
        Ok(())
    }

    async fn display_name(&self, user_id: i64) -> Result<Option<String>, StorageError> {
        let connection = self.connection.lock().await;
        let mut statement =
            connection.prepare("SELECT display_name FROM users WHERE chat_id = ?")?;
        statement.bind((1, user_id))?;
        if let State::Row = statement.next()? {
            Ok(Some(statement.read::<String, _>("display_name")?))
        } else {
            Ok(None)
        }
    }

    async fn reminder_time(
        &self,
        user_id: i64,
        category: Category,
    ) -> Result<Option<ReminderTime>, StorageError> {
        let connection = self.connection.lock().await;
        let mut statement = connection.prepare(
            "SELECT a.fire_time FROM activities a \
             JOIN users u ON a.user_id = u.id \
             WHERE u.chat_id = ? AND a.category = ?",
        )?;
        statement.bind((1, user_id))?;
        statement.bind((2, category.as_str()))?;
        if let State::Row = statement.next()? {
            let raw = statement.read::<String, _>("fire_time")?;
            let time = raw.parse().map_err(|_| {
                StorageError::Malformed(format!("fire_time `{raw}` for user {user_id}"))
            })?;
            Ok(Some(time))
        } else {
            Ok(None)
        }
    }

    async fn upsert_reminder(
        &self,
        user_id: i64,
        category: Category,
        time: ReminderTime,
    ) -> Result<(), StorageError> {
        let connection = self.connection.lock().await;
        let mut statement = connection.prepare(
            "INSERT INTO activities (user_id, category, fire_time) \
             VALUES ((SELECT id FROM users WHERE chat_id = ?), ?, ?) \
             ON CONFLICT (user_id, category) DO UPDATE SET fire_time = excluded.fire_time",
        )?;
        let time_text = time.to_string();
        statement.bind((1, user_id))?;
        statement.bind((2, category.as_str()))?;
        statement.bind((3, time_text.as_str()))?;
        statement.next()?;
        debug!("Stored reminder for user {user_id}, category {category}, time {time}");
        Ok(())
    }

    async fn delete_reminder(&self, user_id: i64, category: Category) -> Result<(), StorageError> {
        let connection = self.connection.lock().await;
        let mut statement = connection.prepare(
            "DELETE FROM activities \
             WHERE user_id = (SELECT id FROM users WHERE chat_id = ?) AND category = ?",
        )?;
        statement.bind((1, user_id))?;
        statement.bind((2, category.as_str()))?;
        statement.next()?;
        debug!("Deleted reminder for user {user_id}, category {category}");
        Ok(())
    }

    async fn all_reminders(&self) -> Result<Vec<ReminderSpec>, StorageError> {
        let connection = self.connection.lock().await;
        let mut statement = connection.prepare(
            "SELECT u.chat_id, a.category, a.fire_time FROM activities a \
             JOIN users u ON a.user_id = u.id",
        )?;

        let mut reminders = Vec::new();
        while let State::Row = statement.next()? {
            let user_id = statement.read::<i64, _>("chat_id")?;
            let category = statement.read::<String, _>("category")?;
            let fire_time = statement.read::<String, _>("fire_time")?;
            // One corrupt row must not sink the other N-1 at bootstrap.
            match parse_row(user_id, &category, &fire_time) {
                Ok(spec) => reminders.push(spec),
                Err(err) => warn!("Skipping reminder row: {err}"),
            }
        }

        debug!("Retrieved {} reminders from the database", reminders.len());
        Ok(reminders)
    }

    async fn reminders_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<(ReminderSpec, i64)>, StorageError> {
        let connection = self.connection.lock().await;
        let mut statement = connection.prepare(
            "SELECT a.category, a.fire_time, a.streak_num FROM activities a \
             JOIN users u ON a.user_id = u.id \
             WHERE u.chat_id = ?",
        )?;
        statement.bind((1, user_id))?;

        let mut reminders = Vec::new();
        while let State::Row = statement.next()? {
            let category = statement.read::<String, _>("category")?;
            let fire_time = statement.read::<String, _>("fire_time")?;
            let streak = statement.read::<i64, _>("streak_num")?;
            match parse_row(user_id, &category, &fire_time) {
                Ok(spec) => reminders.push((spec, streak)),
                Err(err) => warn!("Skipping reminder row: {err}"),
            }
        }
        Ok(reminders)
    }

    async fn custom_label(&self, user_id: i64) -> Result<Option<String>, StorageError> {
        let connection = self.connection.lock().await;
        let mut statement = connection.prepare(
            "SELECT custom_text FROM customs \
             WHERE user_id = (SELECT id FROM users WHERE chat_id = ?)",
        )?;
        statement.bind((1, user_id))?;
        if let State::Row = statement.next()? {
            Ok(Some(statement.read::<String, _>("custom_text")?))
        } else {
            Ok(None)
        }
    }

    async fn set_custom_label(&self, user_id: i64, label: &str) -> Result<(), StorageError> {
        let connection = self.connection.lock().await;
        let mut statement = connection.prepare(
            "INSERT INTO customs (user_id, custom_text) \
             VALUES ((SELECT id FROM users WHERE chat_id = ?), ?) \
             ON CONFLICT (user_id) DO UPDATE SET custom_text = excluded.custom_text",
        )?;
        statement.bind((1, user_id))?;
        statement.bind((2, label))?;
        statement.next()?;
        debug!("Stored custom label for user {user_id}");
        Ok(())
    }

    async fn streak(&self, user_id: i64, category: Category) -> Result<i64, StorageError> {
        let connection = self.connection.lock().await;
        read_streak(&connection, user_id, category)
    }

    async fn increment_streak(
        &self,
        user_id: i64,
        category: Category,
    ) -> Result<i64, StorageError> {
        let connection = self.connection.lock().await;
        let mut statement = connection.prepare(
            "UPDATE activities SET streak_num = streak_num + 1 \
             WHERE user_id = (SELECT id FROM users WHERE chat_id = ?) AND category = ?",
        )?;
        statement.bind((1, user_id))?;
        statement.bind((2, category.as_str()))?;
        statement.next()?;
        let streak = read_streak(&connection, user_id, category)?;
        debug!("Streak for user {user_id}, category {category} is now {streak}");
        Ok(streak)
    }

    async fn reset_streak(&self, user_id: i64, category: Category) -> Result<(), StorageError> {
        let connection = self.connection.lock().await;
        let mut statement = connection.prepare(
            "UPDATE activities SET streak_num = 0 \
             WHERE user_id = (SELECT id FROM users WHERE chat_id = ?) AND category = ?",
        )?;
        statement.bind((1, user_id))?;
        statement.bind((2, category.as_str()))?;
        statement.next()?;
        debug!("Streak reset for user {user_id}, category {category}");
        Ok(())
    }
}
