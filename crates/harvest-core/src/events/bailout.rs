//! Bailout Requests
//!
//! Raised when someone falls below zero. A rescue clears the debt and leaves
//! the target a few days of cost of living as a buffer.

use harvest_events::AgentId;
use serde::{Deserialize, Serialize};

use crate::config::EventConfig;
use crate::error::{CommandError, InvalidCommand};
use crate::treasury::{Population, Treasury};

/// An open bailout request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BailoutRequest {
    pub target: AgentId,
    /// Debt when the request was raised
    pub debt: i64,
}

/// Who pays for a rescue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Funding {
    /// The controllable participant pays from its own stash
    Private,
    /// The treasury pays
    Public,
}

/// Balance a rescued target is left with.
pub fn buffer(config: &EventConfig, cost_of_living: i64) -> i64 {
    config.buffer_days * cost_of_living
}

/// `max(0, -stash) + buffer`
pub fn rescue_amount(config: &EventConfig, stash: i64, cost_of_living: i64) -> i64 {
    (-stash).max(0) + buffer(config, cost_of_living)
}

impl BailoutRequest {
    /// Raises a request for an insolvent target.
    pub fn raise(population: &Population, target: AgentId) -> Option<Self> {
        let member = population.get(target).filter(|a| a.life.is_insolvent())?;
        Some(Self {
            target,
            debt: (-member.stash).max(0),
        })
    }

    /// Whether the target no longer needs rescuing.
    pub fn is_stale(&self, population: &Population) -> bool {
        !population
            .get(self.target)
            .is_some_and(|a| a.life.is_insolvent())
    }

    /// Checks that the participant may broker the rescue and that the payer
    /// can cover it. Returns the amount due.
    pub fn authorize(
        &self,
        population: &Population,
        treasury: &Treasury,
        funding: Funding,
        config: &EventConfig,
        cost_of_living: i64,
    ) -> Result<i64, CommandError> {
        let target = population
            .get(self.target)
            .filter(|a| a.life.is_insolvent())
            .ok_or(InvalidCommand::UnsupportedResponse)?;
        let amount = rescue_amount(config, target.stash, cost_of_living);
        let participant = &population.participant;
        let ranked = population.ranks_within(AgentId::PARTICIPANT, config.authority_rank);

        let available = match funding {
            Funding::Private => {
                if self.target.is_participant() {
                    return Err(InvalidCommand::UnsupportedResponse.into());
                }
                if !ranked {
                    return Err(InvalidCommand::NotAuthorized.into());
                }
                participant.agent.stash
            }
            Funding::Public => {
                if !ranked && !self.target.is_participant() {
                    return Err(InvalidCommand::NotAuthorized.into());
                }
                treasury.pool()
            }
        };

        if available < amount {
            return Err(CommandError::InsufficientFunds {
                needed: amount,
                available,
            });
        }
        Ok(amount)
    }

    /// Pays the rescue and restores the target. Returns the amount paid.
    pub fn rescue(
        &self,
        population: &mut Population,
        treasury: &mut Treasury,
        funding: Funding,
        config: &EventConfig,
        cost_of_living: i64,
    ) -> Result<i64, CommandError> {
        let amount = self.authorize(population, treasury, funding, config, cost_of_living)?;

        match funding {
            Funding::Private => {
                let payer = &mut population.participant.agent;
                payer.stash -= amount;
                payer.counters.rescued += 1;
            }
            Funding::Public => {
                if !treasury.withdraw_exact(amount) {
                    return Err(CommandError::InsufficientFunds {
                        needed: amount,
                        available: treasury.pool(),
                    });
                }
            }
        }

        if let Some(target) = population.get_mut(self.target) {
            target.restore(buffer(config, cost_of_living));
        }
        Ok(amount)
    }
}
