//! News Log Entries
//!
//! Passive log lines shown alongside the single event slot.

use serde::{Deserialize, Serialize};

/// Category of a news entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewsKind {
    /// Session lifecycle (start, collapse)
    Session,
    /// A participant was removed after prolonged insolvency
    Death,
    Insolvency,
    Trial,
    Bailout,
    Expropriation,
    /// Cosmetic flavor text
    Flavor,
    /// A blocking trigger that could not open because the slot was taken
    Deferred,
    /// A non-blocking event that left the slot (expired, dismissed or displaced)
    Archived,
}

/// A single line in the news log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsEntry {
    pub day: u32,
    pub kind: NewsKind,
    pub text: String,
}

impl NewsEntry {
    pub fn new(day: u32, kind: NewsKind, text: impl Into<String>) -> Self {
        Self {
            day,
            kind,
            text: text.into(),
        }
    }
}
