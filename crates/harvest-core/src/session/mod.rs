//! Session Controller
//!
//! The [`Engine`] owns the configuration, the random source and the state of
//! the running session. Every mutation goes through [`Engine::apply`];
//! [`Engine::snapshot`] is a pure read.
//!
//! Phases move `Setup → Playing → GameOver`. A restart from any phase
//! discards the session and returns to `Setup`.

mod leaderboard;
mod settlement;

use harvest_events::{
    generate_session_id, ActionKind, AgentId, AgentView, EngineSnapshot, Leaderboards, NewsKind,
    ParticipantView, Personality, Phase, SessionDocument, Sentiment,
};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::agent::{Agent, Participant};
use crate::clock::{SimulationClock, TickOutcome};
use crate::config::EngineConfig;
use crate::economy::EconomicSnapshot;
use crate::error::{CommandError, InvalidCommand};
use crate::events::{Commons, EventResponse, EventSystem};
use crate::treasury::{Population, Treasury};

pub use leaderboard::leaderboards;
pub use settlement::DaySummary;

/// Everything the outside world can ask of the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Begins a session with `population` members, the participant included
    StartSession { population: usize },
    /// Records the participant's action for today; applied at day-end
    SubmitAction { action: ActionKind },
    /// Action replayed every day the participant submits nothing
    SetAutopilot { action: Option<ActionKind> },
    SetSpeed { speed: f64 },
    Pause,
    Resume,
    RespondToEvent {
        event_id: String,
        response: EventResponse,
    },
    /// The participant decrees an emergency levy
    Expropriate,
    Restart,
    Tick,
}

/// State of a started session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineState {
    pub session_id: String,
    pub phase: Phase,
    /// Starts at 1
    pub day: u32,
    pub clock: SimulationClock,
    pub population: Population,
    pub treasury: Treasury,
    pub events: EventSystem,
    pub initial_population: usize,
    /// Filled when the session ends
    pub leaderboards: Option<Leaderboards>,
}

impl EngineState {
    /// Builds a playing session around an existing population, with the
    /// clock running at normal speed.
    pub fn new(config: &EngineConfig, population: Population, public_pool: i64) -> Self {
        let initial_wealth: i64 = population.live_members().map(|a| a.stash.max(0)).sum();
        let initial_population = population.live_count();
        let mut clock = SimulationClock::new(&config.clock);
        clock.resume();

        Self {
            session_id: generate_session_id(),
            phase: Phase::Playing,
            day: 1,
            clock,
            population,
            treasury: Treasury::new(public_pool, initial_wealth),
            events: EventSystem::new(config.events.news_capacity),
            initial_population,
            leaderboards: None,
        }
    }

    /// Current economic indicators.
    pub fn economics(&self, config: &EngineConfig) -> EconomicSnapshot {
        EconomicSnapshot::compute(
            &config.economy,
            self.treasury.pool(),
            &self.population.live_stashes(),
            self.treasury.initial_total_wealth(),
        )
    }

    /// Splits the state into the event system and the commons it acts on.
    fn split<'a>(&'a mut self, config: &'a EngineConfig) -> (&'a mut EventSystem, Commons<'a>) {
        (
            &mut self.events,
            Commons {
                population: &mut self.population,
                treasury: &mut self.treasury,
                config,
                day: self.day,
            },
        )
    }
}

/// Creates `population - 1` autonomous agents with randomized traits plus
/// the controllable participant.
pub fn populate<R: Rng>(config: &EngineConfig, population: usize, rng: &mut R) -> Population {
    let session = &config.session;
    let [rep_a, rep_b] = session.agent_reputation_range;
    let [stash_a, stash_b] = session.agent_stash_range;

    let agents = (1..population)
        .map(|i| {
            let personality = Personality::all()
                .choose(rng)
                .copied()
                .unwrap_or(Personality::Chaotic);
            Agent::new(
                AgentId(i as u32),
                format!("Citizen #{}", i),
                personality,
                rng.gen_range(rep_a.min(rep_b)..=rep_a.max(rep_b)),
                rng.gen_range(stash_a.min(stash_b)..=stash_a.max(stash_b)),
            )
        })
        .collect();

    let participant = Participant::new(
        session.participant_name.clone(),
        session.participant_reputation,
        session.participant_stash,
    );
    Population::new(agents, participant)
}

/// The simulation engine.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    state: Option<EngineState>,
    rng: SmallRng,
    last_settlement: Option<DaySummary>,
}

impl Engine {
    /// Creates an engine in the `Setup` phase, seeded from entropy.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            state: None,
            rng: SmallRng::from_entropy(),
            last_settlement: None,
        }
    }

    /// Creates an engine with a fixed seed for reproducible sessions.
    pub fn with_seed(config: EngineConfig, seed: u64) -> Self {
        Self {
            config,
            state: None,
            rng: SmallRng::seed_from_u64(seed),
            last_settlement: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.state.as_ref().map_or(Phase::Setup, |s| s.phase)
    }

    pub fn state(&self) -> Option<&EngineState> {
        self.state.as_ref()
    }

    /// Totals of the most recent day-end settlement of this session.
    pub fn last_settlement(&self) -> Option<&DaySummary> {
        self.last_settlement.as_ref()
    }

    /// Applies one command. A rejected command leaves the state unchanged.
    pub fn apply(&mut self, command: Command) -> Result<(), CommandError> {
        match command {
            Command::StartSession { population } => self.start_session(population),
            Command::Restart => {
                self.restart();
                Ok(())
            }
            Command::Tick => {
                self.tick();
                Ok(())
            }
            other => self.apply_playing(other),
        }
    }

    fn start_session(&mut self, population: usize) -> Result<(), CommandError> {
        let phase = self.phase();
        if phase != Phase::Setup {
            return Err(InvalidCommand::WrongPhase(phase).into());
        }
        let minimum = self.config.session.min_population.max(2);
        if population < minimum {
            return Err(InvalidCommand::PopulationTooSmall {
                requested: population,
                minimum,
            }
            .into());
        }

        let members = populate(&self.config, population, &mut self.rng);
        let pool = population as i64 * self.config.economy.initial_pool_per_capita;
        let mut state = EngineState::new(&self.config, members, pool);
        state.events.record(
            state.day,
            NewsKind::Session,
            format!("A new harvest begins with {} citizens", population),
        );

        info!(session = %state.session_id, population, pool, "session started");
        self.state = Some(state);
        self.last_settlement = None;
        Ok(())
    }

    fn restart(&mut self) {
        self.last_settlement = None;
        if let Some(state) = self.state.take() {
            info!(session = %state.session_id, day = state.day, "session discarded");
        }
    }

    /// Advances the clock. Ticks outside a playing session do nothing.
    fn tick(&mut self) {
        let Self {
            config,
            state,
            rng,
            last_settlement,
        } = self;
        let Some(state) = state.as_mut().filter(|s| s.phase == Phase::Playing) else {
            return;
        };

        let outcome = state.clock.tick();
        if outcome == TickOutcome::Idle {
            return;
        }

        let (events, mut commons) = state.split(config);
        events.advance_countdown(outcome.increment(), &mut commons, rng);

        if let TickOutcome::DayEnded { .. } = outcome {
            let summary = settlement::settle_day(state, config, rng);
            info!(
                day = summary.day,
                cost = summary.cost_of_living,
                pool = summary.public_pool,
                thefts = summary.thefts,
                deaths = summary.deaths,
                live = summary.live_population,
                "day settled"
            );
            *last_settlement = Some(summary);
        }
    }

    fn apply_playing(&mut self, command: Command) -> Result<(), CommandError> {
        let Self {
            config, state, rng, ..
        } = self;
        let state = match state.as_mut() {
            Some(state) if state.phase == Phase::Playing => state,
            Some(state) => return Err(InvalidCommand::WrongPhase(state.phase).into()),
            None => return Err(InvalidCommand::WrongPhase(Phase::Setup).into()),
        };

        match command {
            Command::SubmitAction { action } => {
                let participant = &state.population.participant;
                if participant.is_expelled() {
                    return Err(InvalidCommand::Expelled.into());
                }
                if participant.is_insolvent() {
                    return Err(InvalidCommand::Insolvent.into());
                }
                if state.events.is_blocked() {
                    return Err(InvalidCommand::BlockedByEvent.into());
                }
                if participant.has_acted {
                    return Err(InvalidCommand::AlreadyActed.into());
                }
                let participant = &mut state.population.participant;
                participant.pending = Some(action);
                participant.has_acted = true;
                Ok(())
            }
            Command::SetAutopilot { action } => {
                if state.population.participant.is_expelled() {
                    return Err(InvalidCommand::Expelled.into());
                }
                state.population.participant.autopilot = action;
                Ok(())
            }
            Command::SetSpeed { speed } => {
                if state.clock.set_speed(speed) {
                    Ok(())
                } else {
                    Err(InvalidCommand::UnsupportedSpeed(speed).into())
                }
            }
            Command::Pause => {
                state.clock.pause();
                Ok(())
            }
            Command::Resume => {
                state.clock.resume();
                Ok(())
            }
            Command::RespondToEvent { event_id, response } => {
                let (events, mut commons) = state.split(config);
                events.respond(&event_id, response, &mut commons, rng)
            }
            Command::Expropriate => {
                let (events, mut commons) = state.split(config);
                events.decree(&mut commons)
            }
            Command::StartSession { .. } | Command::Restart | Command::Tick => {
                Err(InvalidCommand::WrongPhase(state.phase).into())
            }
        }
    }

    /// Read-only view of the session.
    pub fn snapshot(&self) -> EngineSnapshot {
        match &self.state {
            Some(state) => self.session_snapshot(state),
            None => self.setup_snapshot(),
        }
    }

    fn setup_snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            session_id: None,
            phase: Phase::Setup,
            day: 0,
            day_progress: 0.0,
            speed: 1.0,
            running: false,
            treasury: 0,
            cost_of_living: self.config.economy.base_cost,
            scarcity_multiplier: 1.0,
            sentiment: Sentiment::Stable,
            top_decile_share: 0.0,
            public_private_ratio: 0.0,
            live_population: 0,
            initial_population: 0,
            participant: None,
            agents: Vec::new(),
            open_event: None,
            news: Vec::new(),
            leaderboards: None,
        }
    }

    fn session_snapshot(&self, state: &EngineState) -> EngineSnapshot {
        let economics = state.economics(&self.config);
        let population = &state.population;
        let participant = &population.participant;

        let agents = population
            .agents_by_reputation()
            .into_iter()
            .map(|a| AgentView {
                rank: population.reputation_rank(a.id).unwrap_or(0),
                id: a.id,
                name: a.name.clone(),
                reputation: a.reputation,
                life: a.life,
            })
            .collect();

        EngineSnapshot {
            session_id: Some(state.session_id.clone()),
            phase: state.phase,
            day: state.day,
            day_progress: state.clock.day_progress(),
            speed: state.clock.speed(),
            running: state.clock.is_advancing(),
            treasury: state.treasury.pool(),
            cost_of_living: economics.cost_of_living,
            scarcity_multiplier: economics.scarcity_multiplier,
            sentiment: economics.sentiment,
            top_decile_share: economics.top_decile_share,
            public_private_ratio: economics.public_private_ratio,
            live_population: economics.live_population,
            initial_population: state.initial_population,
            participant: Some(ParticipantView {
                id: participant.agent.id,
                name: participant.agent.name.clone(),
                reputation: participant.agent.reputation,
                stash: participant.agent.stash,
                life: participant.agent.life,
                counters: participant.agent.counters,
                reputation_rank: population.reputation_rank(AgentId::PARTICIPANT).unwrap_or(0),
                autopilot: participant.autopilot,
                pending_action: participant.pending,
                has_acted: participant.has_acted,
                expelled: participant.is_expelled(),
                insolvent: participant.is_insolvent(),
            }),
            agents,
            open_event: state.events.open_event().map(|e| e.view(population)),
            news: state.events.news().to_vec(),
            leaderboards: state.leaderboards.clone(),
        }
    }

    /// The record a persistence store keeps for the running session.
    pub fn session_document(&self) -> Option<SessionDocument> {
        let state = self.state.as_ref()?;
        let economics = state.economics(&self.config);
        Some(SessionDocument {
            session_id: state.session_id.clone(),
            day: state.day,
            public_pool: state.treasury.pool(),
            sentiment_label: economics.sentiment.label().to_string(),
        })
    }

    #[cfg(test)]
    pub(crate) fn with_state(config: EngineConfig, state: EngineState, seed: u64) -> Self {
        Self {
            config,
            state: Some(state),
            rng: SmallRng::seed_from_u64(seed),
            last_settlement: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> Option<&mut EngineState> {
        self.state.as_mut()
    }
}
