//! Day-End Settlement
//!
//! Runs once per day boundary, in a fixed order:
//!
//! 1. the participant's pending (or autopilot) action, then its living cost;
//! 2. every live agent decides against the same pre-settlement snapshot, all
//!    effects are applied, then every agent pays its living cost;
//! 3. event checks (deferred triggers, trials, bailouts, defensive levies,
//!    flavor news);
//! 4. treasury floor and collapse check;
//! 5. the day counter advances and per-day flags reset.

use harvest_events::{ActionKind, AgentId, NewsKind, Phase};
use rand::Rng;
use tracing::{debug, info};

use crate::agent::{Agent, CostOutcome};
use crate::config::EngineConfig;
use crate::events::{DayReport, NewsLog};
use crate::session::{leaderboard, EngineState};

/// Totals of one settled day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySummary {
    /// The day that was settled
    pub day: u32,
    pub cost_of_living: i64,
    pub public_pool: i64,
    pub thefts: usize,
    pub deaths: usize,
    pub live_population: usize,
    pub collapsed: bool,
}

pub(crate) fn settle_day<R: Rng>(
    state: &mut EngineState,
    config: &EngineConfig,
    rng: &mut R,
) -> DaySummary {
    let day = state.day;
    let before = state.economics(config);
    let cost = before.cost_of_living;
    let max_days = config.events.max_insolvent_days;
    let mut report = DayReport::default();
    let mut deaths = 0;

    // Participant
    let participant = &mut state.population.participant;
    if let Some(action) = participant.action_for_day_end() {
        participant
            .agent
            .apply_action(action, &config.payoffs, &mut state.treasury);
        if action == ActionKind::Steal {
            report.thieves.push(AgentId::PARTICIPANT);
        }
    }
    let outcome = participant.agent.settle_daily_cost(cost, max_days);
    deaths += record_cost(&participant.agent, outcome, day, &mut report, state.events.news_mut());

    // Agents decide on the same snapshot before anyone acts
    let decisions: Vec<(usize, ActionKind)> = state
        .population
        .agents
        .iter()
        .enumerate()
        .filter(|(_, a)| a.is_live())
        .map(|(i, a)| (i, a.decide(&before, &config.policy, rng)))
        .collect();

    for (index, action) in decisions {
        let agent = &mut state.population.agents[index];
        let outcome = agent.apply_action(action, &config.payoffs, &mut state.treasury);
        debug!(agent = %agent.id, ?action, public = outcome.public_delta, "agent acted");
        if action == ActionKind::Steal {
            report.thieves.push(agent.id);
        }
    }

    for agent in state.population.agents.iter_mut() {
        let outcome = agent.settle_daily_cost(cost, max_days);
        deaths += record_cost(agent, outcome, day, &mut report, state.events.news_mut());
    }

    // Events
    let (events, mut commons) = state.split(config);
    events.day_end_checks(&report, &mut commons, rng);

    // Aggregates
    state.treasury.enforce_floor();
    let collapsed = state.population.is_collapsed(state.initial_population);
    if collapsed {
        state.phase = Phase::GameOver;
        state.clock.pause();
        state.leaderboards = Some(leaderboard::leaderboards(
            &state.population,
            config.session.leaderboard_size,
        ));
        state.events.record(
            day,
            NewsKind::Session,
            format!(
                "The village collapses: only {} of {} citizens remain",
                state.population.live_count(),
                state.initial_population
            ),
        );
        info!(day, "session over: population collapsed");
    } else {
        state.day += 1;
    }
    state.population.participant.reset_day();

    DaySummary {
        day,
        cost_of_living: cost,
        public_pool: state.treasury.pool(),
        thefts: report.thieves.len(),
        deaths,
        live_population: state.population.live_count(),
        collapsed,
    }
}

/// Logs a cost outcome and notes new insolvencies. Returns 1 for a death.
fn record_cost(
    agent: &Agent,
    outcome: CostOutcome,
    day: u32,
    report: &mut DayReport,
    news: &mut NewsLog,
) -> usize {
    match outcome {
        CostOutcome::BecameInsolvent => {
            debug!(agent = %agent.id, stash = agent.stash, "agent insolvent");
            report.newly_insolvent.push(agent.id);
            news.record(
                day,
                NewsKind::Insolvency,
                format!("{} can no longer pay their way", agent.name),
            );
            0
        }
        CostOutcome::Died => {
            debug!(agent = %agent.id, "agent removed after prolonged insolvency");
            news.record(
                day,
                NewsKind::Death,
                format!("{} did not survive the shortage", agent.name),
            );
            1
        }
        CostOutcome::Recovered => {
            debug!(agent = %agent.id, "agent recovered");
            0
        }
        CostOutcome::Paid | CostOutcome::StillInsolvent { .. } | CostOutcome::Skipped => 0,
    }
}
