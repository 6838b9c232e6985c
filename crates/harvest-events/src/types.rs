//! Core Vocabulary
//!
//! Enums and small value types shared by the engine and its consumers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a participant in a session.
///
/// The controllable participant always uses [`AgentId::PARTICIPANT`];
/// autonomous agents are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u32);

impl AgentId {
    pub const PARTICIPANT: AgentId = AgentId(0);

    pub fn is_participant(self) -> bool {
        self == Self::PARTICIPANT
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent_{:03}", self.0)
    }
}

/// Top-level session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Setup,
    Playing,
    GameOver,
}

/// Public mood derived from the treasury level and the cost of living.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Anarchy,
    Fury,
    Fear,
    Stable,
}

impl Sentiment {
    /// Label used by the persistence document.
    pub fn label(self) -> &'static str {
        match self {
            Sentiment::Anarchy => "anarchy",
            Sentiment::Fury => "fury",
            Sentiment::Fear => "fear",
            Sentiment::Stable => "stable",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Daily action a participant can take.
///
/// Autonomous agents only ever choose among the first three; `Donate` is
/// available to the controllable participant alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Collaborate,
    PrivateWork,
    Steal,
    Donate,
}

impl ActionKind {
    /// Actions an autonomous agent can choose, in policy-table column order.
    pub const AUTONOMOUS: [ActionKind; 3] = [
        ActionKind::Collaborate,
        ActionKind::PrivateWork,
        ActionKind::Steal,
    ];

    /// Column index in a policy weight row, if this is an autonomous action.
    pub fn column(self) -> Option<usize> {
        match self {
            ActionKind::Collaborate => Some(0),
            ActionKind::PrivateWork => Some(1),
            ActionKind::Steal => Some(2),
            ActionKind::Donate => None,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Collaborate => write!(f, "collaborate"),
            ActionKind::PrivateWork => write!(f, "private_work"),
            ActionKind::Steal => write!(f, "steal"),
            ActionKind::Donate => write!(f, "donate"),
        }
    }
}

/// Disposition tag that biases an agent's decision weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Personality {
    Altruist,
    Greedy,
    Chaotic,
    Opportunist,
}

impl Personality {
    pub fn all() -> &'static [Personality] {
        &[
            Personality::Altruist,
            Personality::Greedy,
            Personality::Chaotic,
            Personality::Opportunist,
        ]
    }
}

/// Lifecycle of a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LifeState {
    #[default]
    Active,
    /// Stash went negative; `days` counts consecutive insolvent settlements.
    Insolvent { days: u32 },
    Removed,
}

impl LifeState {
    /// Live participants take part in decisions, votes and statistics.
    pub fn is_live(self) -> bool {
        !matches!(self, LifeState::Removed)
    }

    pub fn is_insolvent(self) -> bool {
        matches!(self, LifeState::Insolvent { .. })
    }
}

/// A trial vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Guilty,
    Innocent,
}

/// Cumulative per-participant action counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCounters {
    pub collaborated: u32,
    pub private_work: u32,
    pub stole: u32,
    pub rescued: u32,
    pub donated: u32,
}

impl ActionCounters {
    /// Bumps the counter matching an action.
    pub fn record(&mut self, action: ActionKind) {
        match action {
            ActionKind::Collaborate => self.collaborated += 1,
            ActionKind::PrivateWork => self.private_work += 1,
            ActionKind::Steal => self.stole += 1,
            ActionKind::Donate => self.donated += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_labels() {
        assert_eq!(Sentiment::Anarchy.label(), "anarchy");
        assert_eq!(Sentiment::Stable.to_string(), "stable");
        assert_eq!(
            serde_json::to_string(&Sentiment::Fury).unwrap(),
            r#""fury""#
        );
    }

    #[test]
    fn test_life_state_liveness() {
        assert!(LifeState::Active.is_live());
        assert!(LifeState::Insolvent { days: 2 }.is_live());
        assert!(LifeState::Insolvent { days: 0 }.is_insolvent());
        assert!(!LifeState::Removed.is_live());
    }

    #[test]
    fn test_life_state_serialization() {
        let json = serde_json::to_string(&LifeState::Insolvent { days: 1 }).unwrap();
        assert_eq!(json, r#"{"state":"insolvent","days":1}"#);
    }

    #[test]
    fn test_action_columns() {
        assert_eq!(ActionKind::Collaborate.column(), Some(0));
        assert_eq!(ActionKind::Steal.column(), Some(2));
        assert_eq!(ActionKind::Donate.column(), None);
        for (i, action) in ActionKind::AUTONOMOUS.iter().enumerate() {
            assert_eq!(action.column(), Some(i));
        }
    }

    #[test]
    fn test_counters_record() {
        let mut counters = ActionCounters::default();
        counters.record(ActionKind::Steal);
        counters.record(ActionKind::Steal);
        counters.record(ActionKind::Donate);
        assert_eq!(counters.stole, 2);
        assert_eq!(counters.donated, 1);
        assert_eq!(counters.collaborated, 0);
    }

    #[test]
    fn test_agent_id_display() {
        assert_eq!(AgentId(7).to_string(), "agent_007");
        assert!(AgentId::PARTICIPANT.is_participant());
    }
}
