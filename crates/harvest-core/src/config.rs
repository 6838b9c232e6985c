//! Configuration loading for the engine.
//!
//! Every tunable constant of the simulation lives here. Settings are loaded
//! from a TOML file; any omitted section or field falls back to its default.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default tuning file path
pub const DEFAULT_CONFIG_PATH: &str = "harvest.toml";

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Cost-of-living and sentiment parameters
    #[serde(default)]
    pub economy: EconomyConfig,
    /// Action payoff table
    #[serde(default)]
    pub payoffs: PayoffConfig,
    /// Autonomous decision policy
    #[serde(default)]
    pub policy: PolicyConfig,
    /// Crisis event parameters
    #[serde(default)]
    pub events: EventConfig,
    /// Day-cycle scheduler
    #[serde(default)]
    pub clock: ClockConfig,
    /// Session setup
    #[serde(default)]
    pub session: SessionConfig,
}

impl EngineConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serializes the configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Economic model parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Daily cost at monetary index 1 and no scarcity
    pub base_cost: i64,
    /// Treasury units per live participant considered safe
    pub safe_level_per_capita: i64,
    /// Treasury units per participant at session start
    pub initial_pool_per_capita: i64,
    /// Below this fraction of the safe level the mood turns to fury
    pub fury_pool_ratio: f64,
    /// Cost of living at which the mood turns to fury
    pub fury_cost: i64,
    /// Cost of living at which the mood turns to fear
    pub fear_cost: i64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            base_cost: 5,
            safe_level_per_capita: 10,
            initial_pool_per_capita: 20,
            fury_pool_ratio: 0.25,
            fury_cost: 25,
            fear_cost: 10,
        }
    }
}

/// Effect of an action on the treasury, the actor's stash and reputation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Payoff {
    pub public: i64,
    pub private: i64,
    pub reputation: i32,
}

/// Fixed payoff table shared by agents and the controllable participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayoffConfig {
    /// Nominal theft; the actual amount is capped at the remaining pool
    pub steal_amount: i64,
    pub steal_reputation: i32,
    /// Nominal donation; capped at the donor's positive balance
    pub donate_amount: i64,
    pub donate_reputation: i32,
    pub collaborate: Payoff,
    pub private_work: Payoff,
}

impl Default for PayoffConfig {
    fn default() -> Self {
        Self {
            steal_amount: 40,
            steal_reputation: -10,
            donate_amount: 20,
            donate_reputation: 3,
            collaborate: Payoff {
                public: 10,
                private: 4,
                reputation: 2,
            },
            private_work: Payoff {
                public: 0,
                private: 12,
                reputation: -1,
            },
        }
    }
}

/// Table-driven decision policy.
///
/// Each row is `[collaborate, private_work, steal]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub altruist: [f64; 3],
    pub greedy: [f64; 3],
    pub chaotic: [f64; 3],
    pub opportunist: [f64; 3],
    /// Treasury below `safe_level * crisis_pool_ratio` counts as a crisis
    pub crisis_pool_ratio: f64,
    /// Blend factor toward collaboration during a crisis
    pub crisis_bias: f64,
    /// Stash below `desperation_multiple * cost_of_living` counts as desperate
    pub desperation_multiple: f64,
    /// Blend factor toward stealing when desperate
    pub desperation_bias: f64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            altruist: [0.70, 0.25, 0.05],
            greedy: [0.10, 0.45, 0.45],
            chaotic: [0.34, 0.33, 0.33],
            opportunist: [0.30, 0.50, 0.20],
            crisis_pool_ratio: 0.25,
            crisis_bias: 0.6,
            desperation_multiple: 2.0,
            desperation_bias: 0.7,
        }
    }
}

/// Crisis event parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    /// Consecutive insolvent settlements before removal
    pub max_insolvent_days: u32,
    /// Days of cost of living granted as a buffer by a rescue
    pub buffer_days: i64,
    /// Chance a thief is put on trial at day-end
    pub trial_filing_chance: f64,
    pub bail_base: i64,
    /// Days of cost of living added to the bail
    pub bail_cost_days: i64,
    /// Reputation gained by paying someone else's bail
    pub bail_reputation_bonus: i32,
    /// Subtracted from `(100 - reputation) / 100` for each guilty vote draw
    pub guilty_vote_offset: f64,
    /// Reputation lost by the participant for decreeing an expropriation
    pub expropriation_reputation_penalty: i32,
    /// Chance an autonomous agent decrees an expropriation during a crisis
    pub defensive_expropriation_chance: f64,
    pub flavor_news_chance: f64,
    /// Countdown of blocking events, in progress units
    pub event_deadline: f64,
    /// Countdown of notices, in progress units
    pub notice_duration: f64,
    pub news_capacity: usize,
    /// Reputation rank (1-based) required to broker rescues or decree levies
    pub authority_rank: usize,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            max_insolvent_days: 3,
            buffer_days: 7,
            trial_filing_chance: 0.25,
            bail_base: 25,
            bail_cost_days: 4,
            bail_reputation_bonus: 8,
            guilty_vote_offset: 0.1,
            expropriation_reputation_penalty: 25,
            defensive_expropriation_chance: 0.3,
            flavor_news_chance: 0.25,
            event_deadline: 150.0,
            notice_duration: 100.0,
            news_capacity: 50,
            authority_rank: 3,
        }
    }
}

/// Day-cycle scheduler parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Progress added per tick at speed 1
    pub base_increment: f64,
    pub allowed_speeds: Vec<f64>,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            base_increment: 10.0,
            allowed_speeds: vec![0.0, 0.5, 1.0, 3.0, 5.0, 10.0],
        }
    }
}

/// Session setup parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Smallest population accepted, counting the participant
    pub min_population: usize,
    /// Inclusive range for starting agent reputation
    pub agent_reputation_range: [u8; 2],
    /// Inclusive range for starting agent stash
    pub agent_stash_range: [i64; 2],
    pub participant_name: String,
    pub participant_reputation: u8,
    pub participant_stash: i64,
    pub leaderboard_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            min_population: 2,
            agent_reputation_range: [20, 79],
            agent_stash_range: [0, 49],
            participant_name: "You".to_string(),
            participant_reputation: 50,
            participant_stash: 50,
            leaderboard_size: 10,
        }
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Generates a default configuration file content.
pub fn default_config_toml() -> String {
    r#"# Last Harvest engine configuration

[economy]
base_cost = 5
safe_level_per_capita = 10
initial_pool_per_capita = 20
fury_pool_ratio = 0.25
fury_cost = 25
fear_cost = 10

[payoffs]
steal_amount = 40
steal_reputation = -10
donate_amount = 20
donate_reputation = 3

[payoffs.collaborate]
public = 10
private = 4
reputation = 2

[payoffs.private_work]
public = 0
private = 12
reputation = -1

[policy]
# [collaborate, private_work, steal]
altruist = [0.70, 0.25, 0.05]
greedy = [0.10, 0.45, 0.45]
chaotic = [0.34, 0.33, 0.33]
opportunist = [0.30, 0.50, 0.20]
crisis_pool_ratio = 0.25
crisis_bias = 0.6
desperation_multiple = 2.0
desperation_bias = 0.7

[events]
max_insolvent_days = 3
buffer_days = 7
trial_filing_chance = 0.25
bail_base = 25
bail_cost_days = 4
bail_reputation_bonus = 8
guilty_vote_offset = 0.1
expropriation_reputation_penalty = 25
defensive_expropriation_chance = 0.3
flavor_news_chance = 0.25
event_deadline = 150.0
notice_duration = 100.0
news_capacity = 50
authority_rank = 3

[clock]
base_increment = 10.0
allowed_speeds = [0.0, 0.5, 1.0, 3.0, 5.0, 10.0]

[session]
min_population = 2
agent_reputation_range = [20, 79]
agent_stash_range = [0, 49]
participant_name = "You"
participant_reputation = 50
participant_stash = 50
leaderboard_size = 10
"#
    .to_string()
}
