// Core layer - shared domain types, configuration, and error taxonomy
pub mod core;

// Infrastructure layer - repository contract and sqlite-backed persistence
pub mod database;

// Delivery boundary - outbound transport contract and response affordances
pub mod delivery;

// Features layer - all feature modules
pub mod features;

// Re-export core items for convenience
pub use core::{
    Category, Config, DeliveryError, ReminderKey, ReminderSpec, ReminderTime, SchedulingError,
    StorageError,
};

// Re-export infrastructure and delivery seams
pub use database::{Database, ReminderStore};
pub use delivery::{Delivery, ResponseAffordances, ResponseKind, ResponseTag};

// Re-export feature items
pub use features::{
    // Facts
    random_fact,
    // Reminders
    Clock, ReminderJob, ReminderScheduler, SystemClock, TriggerEngine,
    // Sessions
    PendingInput, SessionMap,
    // Streaks
    StreakEntry, StreakService, StreakUpdate,
    // Templates
    MessageTemplates, TemplateSource,
};
