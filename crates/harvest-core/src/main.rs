//! Last Harvest headless runner
//!
//! Plays a session without a human at the controls: the participant follows
//! an optional autopilot action and open events resolve by timing out.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use harvest_core::{
    default_config_toml, Command, Engine, EngineConfig, JsonFileStore, SessionStore,
    DEFAULT_CONFIG_PATH,
};
use harvest_events::{ActionKind, Phase};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Command line arguments for the headless runner
#[derive(Parser, Debug)]
#[command(name = "harvest_sim")]
#[command(about = "Tragedy-of-the-commons simulation")]
struct Args {
    /// Population, counting the controllable participant
    #[arg(long, default_value_t = 20)]
    population: usize,

    /// Days to simulate unless the village collapses first
    #[arg(long, default_value_t = 30)]
    days: u32,

    /// Clock speed multiplier (0.5, 1, 3, 5 or 10)
    #[arg(long, default_value_t = 10.0)]
    speed: f64,

    /// Random seed for reproducibility; entropy when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Action the participant repeats every day
    #[arg(long, value_enum)]
    autopilot: Option<AutopilotArg>,

    /// Directory where the session document is published each day
    #[arg(long)]
    store_dir: Option<PathBuf>,

    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,

    /// Write the default configuration to harvest.toml and exit
    #[arg(long)]
    write_default_config: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum AutopilotArg {
    Collaborate,
    PrivateWork,
    Steal,
    Donate,
}

impl From<AutopilotArg> for ActionKind {
    fn from(arg: AutopilotArg) -> Self {
        match arg {
            AutopilotArg::Collaborate => ActionKind::Collaborate,
            AutopilotArg::PrivateWork => ActionKind::PrivateWork,
            AutopilotArg::Steal => ActionKind::Steal,
            AutopilotArg::Donate => ActionKind::Donate,
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(EngineConfig::from_file(path)?),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            Ok(EngineConfig::from_file(Path::new(DEFAULT_CONFIG_PATH))?)
        }
        None => Ok(EngineConfig::default()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    if args.write_default_config {
        std::fs::write(DEFAULT_CONFIG_PATH, default_config_toml())?;
        println!("Wrote {}", DEFAULT_CONFIG_PATH);
        return Ok(());
    }

    if args.speed <= 0.0 {
        return Err("speed must be positive for a headless run".into());
    }

    let config = load_config(args.config.as_deref())?;
    let mut engine = match args.seed {
        Some(seed) => Engine::with_seed(config, seed),
        None => Engine::new(config),
    };
    let mut store = args
        .store_dir
        .as_deref()
        .map(JsonFileStore::new)
        .transpose()?;

    println!("Last Harvest");
    println!("============");
    println!("Population: {}", args.population);
    println!("Days: {}", args.days);
    if let Some(seed) = args.seed {
        println!("Seed: {}", seed);
    }
    println!();

    engine.apply(Command::StartSession {
        population: args.population,
    })?;
    engine.apply(Command::SetSpeed { speed: args.speed })?;
    engine.apply(Command::SetAutopilot {
        action: args.autopilot.map(ActionKind::from),
    })?;

    let mut settled = 0;
    while settled < args.days && engine.phase() == Phase::Playing {
        engine.apply(Command::Tick)?;

        let Some(summary) = engine.last_settlement().copied() else {
            continue;
        };
        if summary.day <= settled {
            continue;
        }
        settled = summary.day;

        println!(
            "Day {:>3}: pool {:>5}, cost {:>4}, live {:>3}, thefts {:>2}, deaths {:>2}",
            summary.day,
            summary.public_pool,
            summary.cost_of_living,
            summary.live_population,
            summary.thefts,
            summary.deaths
        );

        if let (Some(store), Some(document)) = (store.as_mut(), engine.session_document()) {
            if let Err(e) = store.replace(&document) {
                warn!("Failed to publish session document: {}", e);
            }
        }
    }

    let snapshot = engine.snapshot();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!();
    println!("Final state after day {}", settled);
    println!("  Phase: {:?}", snapshot.phase);
    println!("  Treasury: {}", snapshot.treasury);
    println!("  Sentiment: {}", snapshot.sentiment);
    println!(
        "  Live population: {} of {}",
        snapshot.live_population, snapshot.initial_population
    );
    if let Some(participant) = &snapshot.participant {
        println!(
            "  You: stash {}, reputation {}, rank {}",
            participant.stash, participant.reputation, participant.reputation_rank
        );
    }
    if let Some(boards) = &snapshot.leaderboards {
        println!("  Richest survivors:");
        for entry in boards.by_wealth.iter().take(3) {
            println!("    {}. {} ({})", entry.rank, entry.name, entry.value);
        }
    }

    info!(day = settled, phase = ?snapshot.phase, "run finished");
    Ok(())
}
