//! Shared vocabulary and snapshot types for the Last Harvest simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! The engine produces these types; presentation layers and persistence
//! collaborators consume them.

pub mod document;
pub mod news;
pub mod snapshot;
pub mod types;

#[cfg(feature = "test-fixtures")]
pub mod fixtures;

pub use document::{generate_session_id, SessionDocument};
pub use news::{NewsEntry, NewsKind};
pub use snapshot::{
    AgentView, EngineSnapshot, EventView, EventViewKind, LeaderboardEntry, Leaderboards,
    ParticipantView,
};
pub use types::{
    ActionCounters, ActionKind, AgentId, LifeState, Personality, Phase, Sentiment, Verdict,
};
