//! Agents
//!
//! Data for one participant of the commons, the payoff table applied to its
//! actions and its daily cost settlement. The controllable participant wraps
//! the same [`Agent`] shape in a [`Participant`].

use harvest_events::{ActionCounters, ActionKind, AgentId, LifeState, Personality};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{PayoffConfig, PolicyConfig};
use crate::economy::EconomicSnapshot;
use crate::policy;
use crate::treasury::Treasury;

/// Upper bound of the reputation scale.
pub const MAX_REPUTATION: u8 = 100;

/// One participant of the commons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    pub life: LifeState,
    /// 0 to 100
    pub reputation: u8,
    /// Private wealth; negative while insolvent
    pub stash: i64,
    pub counters: ActionCounters,
    pub personality: Personality,
}

/// What an applied action did to the books.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionOutcome {
    pub action: ActionKind,
    /// Signed change of the treasury
    pub public_delta: i64,
    /// Signed change of the actor's stash
    pub private_delta: i64,
}

/// Result of charging the daily cost of living.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostOutcome {
    Paid,
    BecameInsolvent,
    StillInsolvent { days: u32 },
    Recovered,
    /// Removed after too many consecutive insolvent days
    Died,
    Skipped,
}

impl Agent {
    pub fn new(
        id: AgentId,
        name: impl Into<String>,
        personality: Personality,
        reputation: u8,
        stash: i64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            life: LifeState::Active,
            reputation: reputation.min(MAX_REPUTATION),
            stash,
            counters: ActionCounters::default(),
            personality,
        }
    }

    pub fn is_live(&self) -> bool {
        self.life.is_live()
    }

    pub fn is_active(&self) -> bool {
        self.life == LifeState::Active
    }

    /// Applies a signed reputation change, clamped to the 0..=100 scale.
    pub fn adjust_reputation(&mut self, delta: i32) {
        let value = (self.reputation as i32 + delta).clamp(0, MAX_REPUTATION as i32);
        self.reputation = value as u8;
    }

    /// Chooses today's action from the shared pre-settlement snapshot.
    pub fn decide<R: Rng>(
        &self,
        snapshot: &EconomicSnapshot,
        config: &PolicyConfig,
        rng: &mut R,
    ) -> ActionKind {
        policy::decide(config, self, snapshot, rng)
    }

    /// Applies an action's payoff to this agent and the treasury.
    ///
    /// Theft is capped at what the pool holds, so the pool never goes
    /// negative and the thief gains only what was actually taken.
    pub fn apply_action(
        &mut self,
        action: ActionKind,
        payoffs: &PayoffConfig,
        treasury: &mut Treasury,
    ) -> ActionOutcome {
        let (public_delta, private_delta, reputation_delta) = match action {
            ActionKind::Collaborate => {
                let p = payoffs.collaborate;
                treasury.deposit(p.public);
                (p.public, p.private, p.reputation)
            }
            ActionKind::PrivateWork => {
                let p = payoffs.private_work;
                treasury.deposit(p.public);
                (p.public, p.private, p.reputation)
            }
            ActionKind::Steal => {
                let taken = treasury.withdraw_up_to(payoffs.steal_amount);
                (-taken, taken, payoffs.steal_reputation)
            }
            ActionKind::Donate => {
                let given = payoffs.donate_amount.min(self.stash.max(0));
                if given == 0 {
                    return ActionOutcome {
                        action,
                        public_delta: 0,
                        private_delta: 0,
                    };
                }
                treasury.deposit(given);
                (given, -given, payoffs.donate_reputation)
            }
        };

        self.stash += private_delta;
        self.adjust_reputation(reputation_delta);
        self.counters.record(action);

        ActionOutcome {
            action,
            public_delta,
            private_delta,
        }
    }

    /// Charges the daily cost of living and advances the insolvency state.
    pub fn settle_daily_cost(&mut self, cost: i64, max_insolvent_days: u32) -> CostOutcome {
        if !self.is_live() {
            return CostOutcome::Skipped;
        }

        self.stash -= cost;

        match (self.life, self.stash < 0) {
            (LifeState::Active, false) => CostOutcome::Paid,
            (LifeState::Active, true) => {
                self.life = LifeState::Insolvent { days: 0 };
                CostOutcome::BecameInsolvent
            }
            (LifeState::Insolvent { .. }, false) => {
                self.life = LifeState::Active;
                CostOutcome::Recovered
            }
            (LifeState::Insolvent { days }, true) => {
                let days = days + 1;
                if days >= max_insolvent_days {
                    self.life = LifeState::Removed;
                    CostOutcome::Died
                } else {
                    self.life = LifeState::Insolvent { days };
                    CostOutcome::StillInsolvent { days }
                }
            }
            (LifeState::Removed, _) => CostOutcome::Skipped,
        }
    }

    /// Returns the agent to good standing with the given balance.
    pub fn restore(&mut self, stash: i64) {
        self.stash = stash;
        self.life = LifeState::Active;
    }

    /// Removes the agent and hands back whatever positive stash it held.
    pub fn remove(&mut self) -> i64 {
        let confiscated = self.stash.max(0);
        self.stash = 0;
        self.life = LifeState::Removed;
        confiscated
    }
}

/// The controllable participant.
///
/// Actions come from external commands instead of the policy. A pending
/// action is applied at day-end; without one, the autopilot action is
/// replayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub agent: Agent,
    pub autopilot: Option<ActionKind>,
    pub pending: Option<ActionKind>,
    pub has_acted: bool,
    /// Whether an expropriation was decreed today
    pub decreed_today: bool,
}

impl Participant {
    pub fn new(name: impl Into<String>, reputation: u8, stash: i64) -> Self {
        Self {
            // Personality is unused for the participant; it never runs the policy.
            agent: Agent::new(AgentId::PARTICIPANT, name, Personality::Chaotic, reputation, stash),
            autopilot: None,
            pending: None,
            has_acted: false,
            decreed_today: false,
        }
    }

    pub fn is_expelled(&self) -> bool {
        self.agent.life == LifeState::Removed
    }

    pub fn is_insolvent(&self) -> bool {
        self.agent.life.is_insolvent()
    }

    /// The action to apply at day-end: the manual one, else the autopilot.
    pub fn action_for_day_end(&self) -> Option<ActionKind> {
        if !self.agent.is_active() {
            return None;
        }
        self.pending.or(self.autopilot)
    }

    /// Clears the per-day flags.
    pub fn reset_day(&mut self) {
        self.pending = None;
        self.has_acted = false;
        self.decreed_today = false;
    }
}
