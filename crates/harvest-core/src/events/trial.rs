//! Peer Trials
//!
//! A trial is filed against a thief by the most respected citizen. Every
//! live agent except the accused casts one probabilistic vote; the
//! controllable participant casts an explicit one or abstains.

use harvest_events::{AgentId, Verdict};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::EventConfig;
use crate::treasury::{Population, Treasury};

/// An open trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialSession {
    pub target: AgentId,
    pub accuser_name: String,
    pub target_reputation_at_filing: u8,
    pub bail_cost: i64,
}

/// Vote count of a trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tally {
    pub guilty: u32,
    pub innocent: u32,
}

impl Tally {
    pub fn add(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Guilty => self.guilty += 1,
            Verdict::Innocent => self.innocent += 1,
        }
    }

    /// Conviction requires a strict guilty majority of the cast votes.
    pub fn convicts(&self) -> bool {
        self.guilty > self.innocent
    }
}

/// How a trial ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialOutcome {
    Convicted { confiscated: i64, tally: Tally },
    Acquitted { tally: Tally },
    /// The accused left the population before the verdict
    Vacated,
}

/// Bail for a trial filed at the given cost of living.
pub fn bail_cost(config: &EventConfig, cost_of_living: i64) -> i64 {
    config.bail_base + config.bail_cost_days * cost_of_living
}

/// Probability that an agent votes guilty, from the accused's reputation at
/// filing time.
pub fn guilty_probability(config: &EventConfig, reputation_at_filing: u8) -> f64 {
    ((100.0 - reputation_at_filing as f64) / 100.0 - config.guilty_vote_offset).clamp(0.0, 1.0)
}

/// Highest-reputation live autonomous agent other than the accused.
pub fn select_accuser(population: &Population, target: AgentId) -> Option<String> {
    population
        .agents_by_reputation()
        .into_iter()
        .find(|a| a.id != target)
        .map(|a| a.name.clone())
}

impl TrialSession {
    /// Files a trial against a live target, or returns `None` when nobody is
    /// left to accuse them.
    pub fn file(
        population: &Population,
        target: AgentId,
        config: &EventConfig,
        cost_of_living: i64,
    ) -> Option<Self> {
        let accused = population.get(target).filter(|a| a.is_live())?;
        let accuser_name = select_accuser(population, target)?;

        Some(Self {
            target,
            accuser_name,
            target_reputation_at_filing: accused.reputation,
            bail_cost: bail_cost(config, cost_of_living),
        })
    }

    /// Counts the participant's vote (if any) plus one draw per live agent.
    pub fn tally<R: Rng>(
        &self,
        population: &Population,
        participant_vote: Option<Verdict>,
        config: &EventConfig,
        rng: &mut R,
    ) -> Tally {
        let mut tally = Tally::default();
        if let Some(vote) = participant_vote {
            tally.add(vote);
        }

        let p = guilty_probability(config, self.target_reputation_at_filing);
        for _voter in population.live_agents().filter(|a| a.id != self.target) {
            if rng.gen_bool(p) {
                tally.add(Verdict::Guilty);
            } else {
                tally.add(Verdict::Innocent);
            }
        }
        tally
    }

    /// Tallies and applies the verdict. A conviction removes the accused and
    /// moves their positive stash into the treasury.
    pub fn resolve<R: Rng>(
        &self,
        population: &mut Population,
        treasury: &mut Treasury,
        participant_vote: Option<Verdict>,
        config: &EventConfig,
        rng: &mut R,
    ) -> TrialOutcome {
        if !population.get(self.target).is_some_and(|a| a.is_live()) {
            return TrialOutcome::Vacated;
        }

        let tally = self.tally(population, participant_vote, config, rng);
        if !tally.convicts() {
            return TrialOutcome::Acquitted { tally };
        }

        let confiscated = population
            .get_mut(self.target)
            .map(|a| a.remove())
            .unwrap_or(0);
        treasury.deposit(confiscated);
        TrialOutcome::Convicted { confiscated, tally }
    }
}
