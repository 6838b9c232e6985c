//! Sample data fixtures for testing.
//!
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // harvest-events = { path = "../harvest-events", features = ["test-fixtures"] }
//!
//! use harvest_events::fixtures;
//!
//! let doc = fixtures::sample_document();
//! let news = fixtures::sample_news();
//! ```

use crate::{NewsEntry, SessionDocument};

/// Returns a persistence document for day 12 of a session in the `fear` mood.
pub fn sample_document() -> SessionDocument {
    let json = include_str!("../tests/fixtures/sample_document.json");
    SessionDocument::from_json(json).expect("Failed to parse sample_document.json")
}

/// Returns a short news log, most recent first.
///
/// Contains one entry each of trial, deferred, death, flavor and session.
pub fn sample_news() -> Vec<NewsEntry> {
    let json = include_str!("../tests/fixtures/sample_news.json");
    serde_json::from_str(json).expect("Failed to parse sample_news.json")
}
