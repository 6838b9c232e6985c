//! Final rankings of a finished session.

use harvest_events::{LeaderboardEntry, Leaderboards};

use crate::agent::Agent;
use crate::treasury::Population;

/// Ranks the live population by wealth, thefts and collaborations.
pub fn leaderboards(population: &Population, limit: usize) -> Leaderboards {
    Leaderboards {
        by_wealth: rank_by(population, limit, |a| a.stash),
        by_theft: rank_by(population, limit, |a| a.counters.stole as i64),
        by_collaboration: rank_by(population, limit, |a| a.counters.collaborated as i64),
    }
}

fn rank_by(
    population: &Population,
    limit: usize,
    value: impl Fn(&Agent) -> i64,
) -> Vec<LeaderboardEntry> {
    let mut sorted: Vec<(&Agent, i64)> = population
        .live_members()
        .map(|a| (a, value(a)))
        .collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.id.cmp(&b.0.id)));

    sorted
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, (agent, value))| LeaderboardEntry {
            rank: i + 1,
            id: agent.id,
            name: agent.name.clone(),
            value,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Participant;
    use harvest_events::{AgentId, Personality};

    fn population(stashes: &[i64]) -> Population {
        let agents = stashes
            .iter()
            .enumerate()
            .map(|(i, stash)| {
                Agent::new(
                    AgentId(i as u32 + 1),
                    format!("Citizen #{}", i + 1),
                    Personality::Greedy,
                    50,
                    *stash,
                )
            })
            .collect();
        Population::new(agents, Participant::new("You", 50, 25))
    }

    #[test]
    fn test_wealth_ranking_excludes_removed() {
        let mut pop = population(&[10, 90, 40, 70]);
        pop.get_mut(AgentId(2)).unwrap().remove();

        let boards = leaderboards(&pop, 10);
        let ids: Vec<AgentId> = boards.by_wealth.iter().map(|e| e.id).collect();

        assert_eq!(ids, vec![AgentId(4), AgentId(3), AgentId::PARTICIPANT, AgentId(1)]);
        assert_eq!(boards.by_wealth[0].rank, 1);
        assert_eq!(boards.by_wealth[0].value, 70);
    }

    #[test]
    fn test_limit_and_tie_order() {
        let mut pop = population(&[5; 12]);
        pop.get_mut(AgentId(7)).unwrap().counters.stole = 3;
        pop.get_mut(AgentId(2)).unwrap().counters.stole = 3;

        let boards = leaderboards(&pop, 10);

        assert_eq!(boards.by_theft.len(), 10);
        assert_eq!(boards.by_theft[0].id, AgentId(2));
        assert_eq!(boards.by_theft[1].id, AgentId(7));
        // ties broken by id, participant first
        assert_eq!(boards.by_theft[2].id, AgentId::PARTICIPANT);
        assert_eq!(boards.by_collaboration[9].rank, 10);
    }
}
