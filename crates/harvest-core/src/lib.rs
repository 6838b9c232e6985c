//! Last Harvest: a tragedy-of-the-commons simulation engine.
//!
//! A population of agents shares a public granary. Each day every agent
//! collaborates, works for itself or steals; the cost of living follows the
//! state of the commons, and crisis events (trials, bailouts, expropriations)
//! open up for one controllable participant to answer.
//!
//! # Modules
//!
//! - [`economy`]: cost of living, scarcity and wealth statistics
//! - [`agent`] and [`policy`]: participants and their decision table
//! - [`treasury`]: the public pool and the population drawing on it
//! - [`events`]: the single event slot, deferred triggers and news
//! - [`clock`]: tick-driven day scheduler
//! - [`session`]: the [`Engine`] and its command surface
//! - [`store`]: persistence of per-session documents
//! - [`config`]: every tunable constant, loaded from TOML

pub mod agent;
pub mod clock;
pub mod config;
pub mod economy;
pub mod error;
pub mod events;
pub mod policy;
pub mod session;
pub mod store;
pub mod treasury;

pub use agent::{Agent, Participant};
pub use clock::{SimulationClock, TickOutcome};
pub use config::{default_config_toml, ConfigError, EngineConfig, DEFAULT_CONFIG_PATH};
pub use economy::EconomicSnapshot;
pub use error::{CommandError, InvalidCommand};
pub use events::{EventResponse, EventSystem};
pub use session::{Command, DaySummary, Engine, EngineState};
pub use store::{JsonFileStore, MemoryStore, SessionStore, StoreError};
pub use treasury::{Population, Treasury};
