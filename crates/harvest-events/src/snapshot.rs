//! Snapshot Types
//!
//! Read-only views of the engine state handed to presentation and
//! persistence layers.
//!
//! Private stashes of autonomous agents are never part of the live views;
//! only the controllable participant sees its own balance. Final wealth
//! figures are revealed through [`Leaderboards`] once the session is over.

use serde::{Deserialize, Serialize};

use crate::news::NewsEntry;
use crate::types::{ActionCounters, ActionKind, AgentId, LifeState, Phase, Sentiment};

/// Complete read-only view of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub phase: Phase,
    pub day: u32,
    pub day_progress: f64,
    pub speed: f64,
    /// False while paused or parked at speed 0
    pub running: bool,
    pub treasury: i64,
    pub cost_of_living: i64,
    pub scarcity_multiplier: f64,
    pub sentiment: Sentiment,
    /// Percentage of private wealth held by the richest tenth
    pub top_decile_share: f64,
    pub public_private_ratio: f64,
    pub live_population: usize,
    pub initial_population: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant: Option<ParticipantView>,
    /// Live autonomous agents ranked by reputation, highest first
    #[serde(default)]
    pub agents: Vec<AgentView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_event: Option<EventView>,
    /// Most recent first
    #[serde(default)]
    pub news: Vec<NewsEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leaderboards: Option<Leaderboards>,
}

/// The controllable participant's own view of itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantView {
    pub id: AgentId,
    pub name: String,
    pub reputation: u8,
    pub stash: i64,
    pub life: LifeState,
    pub counters: ActionCounters,
    /// 1-based position in the reputation ranking of the live population,
    /// 0 once expelled
    pub reputation_rank: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autopilot: Option<ActionKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_action: Option<ActionKind>,
    pub has_acted: bool,
    pub expelled: bool,
    pub insolvent: bool,
}

/// Public view of an autonomous agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentView {
    pub rank: usize,
    pub id: AgentId,
    pub name: String,
    pub reputation: u8,
    pub life: LifeState,
}

/// View of the event occupying the slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventView {
    pub id: String,
    pub blocking: bool,
    /// Progress units left before the default resolution applies
    pub remaining: f64,
    pub kind: EventViewKind,
}

/// Kind-specific payload of an [`EventView`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventViewKind {
    Trial {
        target: AgentId,
        target_name: String,
        accuser_name: String,
        target_reputation_at_filing: u8,
        bail_cost: i64,
    },
    Bailout {
        target: AgentId,
        target_name: String,
        debt: i64,
    },
    Expropriation {
        initiator_name: String,
        amount_collected: i64,
    },
    Flavor {
        text: String,
    },
}

/// Final rankings exposed when the session is over.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaderboards {
    pub by_wealth: Vec<LeaderboardEntry>,
    pub by_theft: Vec<LeaderboardEntry>,
    pub by_collaboration: Vec<LeaderboardEntry>,
}

/// One row of a leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub id: AgentId,
    pub name: String,
    pub value: i64,
}
