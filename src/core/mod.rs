//! # Core Module
//!
//! Core domain types, configuration, and error handling for the reminder bot.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Split error taxonomy into its own module
//! - 1.1.0: Add ReminderTime HH:MM parsing for chat input
//! - 1.0.0: Initial creation with config module

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used items
pub use config::Config;
pub use error::{DeliveryError, SchedulingError, StorageError};
pub use types::{Category, ReminderKey, ReminderSpec, ReminderTime};
