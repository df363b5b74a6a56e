//! # Delivery Boundary
//!
//! Outbound transport contract for rendered reminders, plus the done/missed
//! response affordances the transport round-trips back as user feedback.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.3.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Response tags carry the category so streak updates can be routed
//! - 1.0.0: Initial send contract

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::error::DeliveryError;
use crate::core::types::Category;

/// Outbound chat transport
///
/// Implemented by whatever owns the wire protocol (a bot client in
/// production, a recording stub in tests). The core never retries a failed
/// send; the dispatch job logs it and the next day's fire is the retry.
#[async_trait]
pub trait Delivery: Send + Sync {
    async fn send(
        &self,
        user_id: i64,
        text: &str,
        affordances: Option<ResponseAffordances>,
    ) -> Result<(), DeliveryError>;
}

/// Which way the user answered a reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    /// Habit completed today
    Done,
    /// Habit skipped today
    Missed,
}

impl ResponseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseKind::Done => "done",
            ResponseKind::Missed => "missed",
        }
    }
}

/// A round-trippable reminder response tag, e.g. `done:water`
///
/// The transport attaches the encoded form to the two response buttons of a
/// dispatched reminder and parses it back when the user taps one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseTag {
    pub kind: ResponseKind,
    pub category: Category,
}

impl ResponseTag {
    pub fn done(category: Category) -> Self {
        Self {
            kind: ResponseKind::Done,
            category,
        }
    }

    pub fn missed(category: Category) -> Self {
        Self {
            kind: ResponseKind::Missed,
            category,
        }
    }
}

impl fmt::Display for ResponseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.category)
    }
}

impl FromStr for ResponseTag {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (kind, category) = s
            .split_once(':')
            .ok_or_else(|| anyhow::anyhow!("Invalid response tag: {}", s))?;
        let kind = match kind {
            "done" => ResponseKind::Done,
            "missed" => ResponseKind::Missed,
            _ => return Err(anyhow::anyhow!("Invalid response tag: {}", s)),
        };
        Ok(Self {
            kind,
            category: category.parse()?,
        })
    }
}

/// The two inline response buttons attached to a dispatched reminder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseAffordances {
    /// Tag sent back when the user confirms the habit
    pub positive: String,
    /// Tag sent back when the user admits a miss
    pub negative: String,
}

impl ResponseAffordances {
    /// Build the done/missed tag pair for one category
    pub fn for_category(category: Category) -> Self {
        Self {
            positive: ResponseTag::done(category).to_string(),
            negative: ResponseTag::missed(category).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_tag_round_trip() {
        for category in Category::ALL {
            for tag in [ResponseTag::done(category), ResponseTag::missed(category)] {
                assert_eq!(tag.to_string().parse::<ResponseTag>().unwrap(), tag);
            }
        }
    }

    #[test]
    fn test_response_tag_encoding() {
        assert_eq!(ResponseTag::done(Category::Water).to_string(), "done:water");
        assert_eq!(
            ResponseTag::missed(Category::Sleep).to_string(),
            "missed:sleep"
        );
    }

    #[test]
    fn test_response_tag_rejects_garbage() {
        assert!("done".parse::<ResponseTag>().is_err());
        assert!("nudge:water".parse::<ResponseTag>().is_err());
        assert!("done:yoga".parse::<ResponseTag>().is_err());
    }

    #[test]
    fn test_affordances_for_category() {
        let affordances = ResponseAffordances::for_category(Category::Read);
        assert_eq!(affordances.positive, "done:read");
        assert_eq!(affordances.negative, "missed:read");
    }
}
