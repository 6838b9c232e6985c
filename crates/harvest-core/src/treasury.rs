//! Treasury and Population
//!
//! The shared public pool and the set of everyone drawing on it.

use harvest_events::AgentId;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::agent::{Agent, Participant};

/// The public resource pool.
///
/// The pool never goes below zero: withdrawals are capped and any mutation
/// that would leave a negative balance is clamped and logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Treasury {
    public_pool: i64,
    /// Sum of starting stashes, the baseline of the monetary index
    initial_total_wealth: i64,
}

impl Treasury {
    pub fn new(public_pool: i64, initial_total_wealth: i64) -> Self {
        let mut treasury = Self {
            public_pool,
            initial_total_wealth: initial_total_wealth.max(1),
        };
        treasury.enforce_floor();
        treasury
    }

    pub fn pool(&self) -> i64 {
        self.public_pool
    }

    pub fn initial_total_wealth(&self) -> i64 {
        self.initial_total_wealth
    }

    /// Adds a signed amount to the pool.
    pub fn deposit(&mut self, amount: i64) {
        self.public_pool += amount;
        self.enforce_floor();
    }

    /// Takes up to `amount` from the pool and returns what was taken.
    pub fn withdraw_up_to(&mut self, amount: i64) -> i64 {
        let taken = amount.clamp(0, self.public_pool.max(0));
        self.public_pool -= taken;
        taken
    }

    /// Takes exactly `amount`, or nothing if the pool cannot cover it.
    pub fn withdraw_exact(&mut self, amount: i64) -> bool {
        if amount < 0 || amount > self.public_pool {
            return false;
        }
        self.public_pool -= amount;
        true
    }

    /// Clamps a negative pool to zero.
    pub fn enforce_floor(&mut self) {
        if self.public_pool < 0 {
            warn!(
                pool = self.public_pool,
                "treasury went negative; clamping to zero"
            );
            self.public_pool = 0;
        }
    }
}

/// Everyone in the session: autonomous agents plus the controllable
/// participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Population {
    pub agents: Vec<Agent>,
    pub participant: Participant,
}

impl Population {
    pub fn new(agents: Vec<Agent>, participant: Participant) -> Self {
        Self { agents, participant }
    }

    /// Looks up any participant by id.
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        if id.is_participant() {
            return Some(&self.participant.agent);
        }
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        if id.is_participant() {
            return Some(&mut self.participant.agent);
        }
        self.agents.iter_mut().find(|a| a.id == id)
    }

    /// Live autonomous agents.
    pub fn live_agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter().filter(|a| a.is_live())
    }

    /// Everyone live, participant first.
    pub fn live_members(&self) -> impl Iterator<Item = &Agent> {
        std::iter::once(&self.participant.agent)
            .filter(|a| a.is_live())
            .chain(self.live_agents())
    }

    pub fn live_count(&self) -> usize {
        self.live_members().count()
    }

    /// Stashes of the live population, for the economic model.
    pub fn live_stashes(&self) -> Vec<i64> {
        self.live_members().map(|a| a.stash).collect()
    }

    /// Whether the live population has fallen below half its starting size.
    pub fn is_collapsed(&self, initial_population: usize) -> bool {
        self.live_count() * 2 < initial_population
    }

    /// 1-based reputation rank: one plus the number of live members with a
    /// strictly higher reputation. Removed members have no rank.
    pub fn reputation_rank(&self, id: AgentId) -> Option<usize> {
        let member = self.get(id).filter(|a| a.is_live())?;
        let higher = self
            .live_members()
            .filter(|a| a.reputation > member.reputation)
            .count();
        Some(higher + 1)
    }

    /// Whether a member ranks within the top `rank` by reputation.
    pub fn ranks_within(&self, id: AgentId, rank: usize) -> bool {
        self.reputation_rank(id).is_some_and(|r| r <= rank)
    }

    /// Live autonomous agents ordered by reputation, highest first; ties by id.
    pub fn agents_by_reputation(&self) -> Vec<&Agent> {
        let mut ranked: Vec<&Agent> = self.live_agents().collect();
        ranked.sort_by(|a, b| b.reputation.cmp(&a.reputation).then(a.id.cmp(&b.id)));
        ranked
    }
}
