//! Expropriation
//!
//! An emergency levy that refills the treasury up to its safe level by
//! taking an equal share from every live stash.

use harvest_events::{AgentId, Personality};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::economy;
use crate::treasury::{Population, Treasury};

/// Notice published after a levy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpropriationNotice {
    pub initiator_name: String,
    pub amount_collected: i64,
}

/// Levy owed by each live member: `ceil(deficit / population)`.
pub fn per_capita_levy(deficit: i64, live_population: usize) -> i64 {
    if deficit <= 0 || live_population == 0 {
        return 0;
    }
    let n = live_population as i64;
    (deficit + n - 1) / n
}

/// Treasury shortfall against the safe level of the live population.
pub fn deficit(config: &EngineConfig, population: &Population, treasury: &Treasury) -> i64 {
    economy::safe_level(&config.economy, population.live_count()) - treasury.pool()
}

/// The autonomous agent that decrees a defensive levy during a crisis: the
/// most respected live agent that is not Greedy, provided it holds a rank
/// within the authority threshold.
pub fn defensive_initiator(population: &Population, authority_rank: usize) -> Option<AgentId> {
    let candidate = population
        .agents_by_reputation()
        .into_iter()
        .find(|a| a.personality != Personality::Greedy)?;
    population
        .ranks_within(candidate.id, authority_rank)
        .then_some(candidate.id)
}

/// Collects the levy and credits the treasury. Returns `None` when there is
/// no deficit to cover.
///
/// The initiator pays its share like everyone else. A participant initiator
/// also loses reputation; an autonomous one does not.
pub fn levy(
    config: &EngineConfig,
    population: &mut Population,
    treasury: &mut Treasury,
    initiator: AgentId,
) -> Option<ExpropriationNotice> {
    let share = per_capita_levy(
        deficit(config, population, treasury),
        population.live_count(),
    );
    if share == 0 {
        return None;
    }

    let mut collected = 0;
    let members = std::iter::once(&mut population.participant.agent)
        .chain(population.agents.iter_mut())
        .filter(|a| a.is_live());
    for member in members {
        let taken = share.min(member.stash.max(0));
        member.stash -= taken;
        collected += taken;
    }
    treasury.deposit(collected);

    let initiator_name = population
        .get(initiator)
        .map(|a| a.name.clone())
        .unwrap_or_default();
    if initiator.is_participant() {
        population
            .participant
            .agent
            .adjust_reputation(-config.events.expropriation_reputation_penalty);
    }

    Some(ExpropriationNotice {
        initiator_name,
        amount_collected: collected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{Agent, Participant};
    use harvest_events::LifeState;

    fn population(stashes: &[i64]) -> Population {
        let agents = stashes
            .iter()
            .enumerate()
            .map(|(i, stash)| {
                Agent::new(
                    AgentId(i as u32 + 1),
                    format!("Citizen #{}", i + 1),
                    Personality::Altruist,
                    30 + i as u8,
                    *stash,
                )
            })
            .collect();
        Population::new(agents, Participant::new("You", 90, 50))
    }

    #[test]
    fn test_per_capita_levy_rounds_up() {
        assert_eq!(per_capita_levy(10, 4), 3);
        assert_eq!(per_capita_levy(12, 4), 3);
        assert_eq!(per_capita_levy(0, 4), 0);
        assert_eq!(per_capita_levy(-7, 4), 0);
        assert_eq!(per_capita_levy(5, 0), 0);
    }

    #[test]
    fn test_levy_without_deficit_is_noop() {
        let config = EngineConfig::default();
        let mut pop = population(&[20, 20, 20]);
        // safe level for 4 live members is 40
        let mut treasury = Treasury::new(40, 100);

        assert!(levy(&config, &mut pop, &mut treasury, AgentId::PARTICIPANT).is_none());
        assert_eq!(treasury.pool(), 40);
        assert_eq!(pop.participant.agent.reputation, 90);
    }

    #[test]
    fn test_levy_caps_at_positive_balance() {
        let config = EngineConfig::default();
        let mut pop = population(&[20, 3, -5]);
        pop.get_mut(AgentId(3)).unwrap().life = LifeState::Insolvent { days: 0 };
        let mut treasury = Treasury::new(0, 100);

        let notice = levy(&config, &mut pop, &mut treasury, AgentId::PARTICIPANT).unwrap();

        // deficit 40 over 4 live members: 10 each
        assert_eq!(pop.participant.agent.stash, 40);
        assert_eq!(pop.get(AgentId(1)).unwrap().stash, 10);
        assert_eq!(pop.get(AgentId(2)).unwrap().stash, 0);
        assert_eq!(pop.get(AgentId(3)).unwrap().stash, -5);
        assert_eq!(notice.amount_collected, 23);
        assert_eq!(treasury.pool(), 23);
        assert_eq!(notice.initiator_name, "You");
        assert_eq!(pop.participant.agent.reputation, 65);
    }

    #[test]
    fn test_removed_members_are_not_levied() {
        let config = EngineConfig::default();
        let mut pop = population(&[50, 50, 50]);
        pop.get_mut(AgentId(2)).unwrap().remove();
        let mut treasury = Treasury::new(0, 100);

        let notice = levy(&config, &mut pop, &mut treasury, AgentId(1)).unwrap();

        // 3 live members, deficit 30
        assert_eq!(notice.amount_collected, 30);
        assert_eq!(pop.get(AgentId(2)).unwrap().stash, 0);
        assert_eq!(notice.initiator_name, "Citizen #1");
        // autonomous initiators are not penalized
        assert_eq!(pop.get(AgentId(1)).unwrap().reputation, 30);
        assert_eq!(pop.participant.agent.reputation, 90);
    }

    #[test]
    fn test_defensive_initiator_skips_greedy() {
        let mut pop = population(&[10, 10, 10]);
        pop.participant.agent.reputation = 10;
        pop.get_mut(AgentId(3)).unwrap().personality = Personality::Greedy;

        // agent 3 has the highest reputation but is greedy
        assert_eq!(defensive_initiator(&pop, 3), Some(AgentId(2)));

        pop.get_mut(AgentId(1)).unwrap().personality = Personality::Greedy;
        pop.get_mut(AgentId(2)).unwrap().personality = Personality::Greedy;
        assert_eq!(defensive_initiator(&pop, 3), None);
    }

    #[test]
    fn test_defensive_initiator_needs_authority_rank() {
        let mut pop = population(&[10, 10, 10]);
        pop.get_mut(AgentId(3)).unwrap().personality = Personality::Greedy;
        pop.get_mut(AgentId(2)).unwrap().personality = Personality::Greedy;

        // participant (90) and agents 3, 2 outrank agent 1
        assert_eq!(defensive_initiator(&pop, 3), None);
        assert_eq!(defensive_initiator(&pop, 4), Some(AgentId(1)));
    }
}
