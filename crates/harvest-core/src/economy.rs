//! Economic Model
//!
//! Pure functions deriving the cost of living, scarcity pressure and wealth
//! distribution from the current totals. Nothing here holds state.
//!
//! The cost of living is the product of two terms that both worsen as the
//! treasury drains:
//! - the scarcity multiplier grows hyperbolically as the pool falls below
//!   the population-scaled safe level;
//! - the monetary index grows as public resources end up in private stashes.
//!
//! Theft therefore raises both factors at once, and the resulting cost pushes
//! more agents into desperation, which in turn drives more theft.

use harvest_events::Sentiment;
use serde::Serialize;

use crate::config::EconomyConfig;

/// Derived economic indicators for one moment of a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EconomicSnapshot {
    pub cost_of_living: i64,
    pub scarcity_multiplier: f64,
    pub monetary_index: f64,
    pub safe_level: i64,
    pub top_decile_share: f64,
    pub public_private_ratio: f64,
    pub sentiment: Sentiment,
    pub live_population: usize,
    pub total_private_wealth: i64,
    pub public_pool: i64,
}

impl EconomicSnapshot {
    /// Computes all indicators from the pool and the live stashes.
    ///
    /// `stashes` must only contain live participants.
    pub fn compute(
        config: &EconomyConfig,
        public_pool: i64,
        stashes: &[i64],
        initial_wealth: i64,
    ) -> Self {
        let population = stashes.len();
        let total = total_private_wealth(stashes);
        let safe = safe_level(config, population);
        let cost = cost_of_living(config, population, public_pool, total, initial_wealth);

        Self {
            cost_of_living: cost,
            scarcity_multiplier: scarcity_multiplier(config, population, public_pool),
            monetary_index: monetary_index(total, initial_wealth),
            safe_level: safe,
            top_decile_share: top_decile_share(stashes),
            public_private_ratio: public_pool.max(0) as f64 / total.max(1) as f64,
            sentiment: sentiment(config, public_pool, safe, cost),
            live_population: population,
            total_private_wealth: total,
            public_pool,
        }
    }
}

/// Treasury level considered safe for the given live population.
pub fn safe_level(config: &EconomyConfig, population: usize) -> i64 {
    population as i64 * config.safe_level_per_capita
}

/// `max(1, safe_level / (pool + 1))`
pub fn scarcity_multiplier(config: &EconomyConfig, population: usize, public_pool: i64) -> f64 {
    let safe = safe_level(config, population) as f64;
    (safe / (public_pool.max(0) as f64 + 1.0)).max(1.0)
}

/// Total live private wealth relative to the session-start total, floored
/// at 1. Not scaled per capita: removals shrink the index.
pub fn monetary_index(total_wealth: i64, initial_wealth: i64) -> f64 {
    (total_wealth.max(0) as f64 / initial_wealth.max(1) as f64).max(1.0)
}

/// Daily cost charged to every live participant.
///
/// `floor(base_cost * monetary_index * scarcity_multiplier)`
pub fn cost_of_living(
    config: &EconomyConfig,
    population: usize,
    public_pool: i64,
    total_wealth: i64,
    initial_wealth: i64,
) -> i64 {
    if population == 0 {
        return config.base_cost;
    }
    let cost = config.base_cost as f64
        * monetary_index(total_wealth, initial_wealth)
        * scarcity_multiplier(config, population, public_pool);
    cost.floor() as i64
}

/// Sum of live private wealth; debts count as zero.
pub fn total_private_wealth(stashes: &[i64]) -> i64 {
    stashes.iter().map(|s| (*s).max(0)).sum()
}

/// Percentage of private wealth held by the richest `ceil(n / 10)` stashes.
pub fn top_decile_share(stashes: &[i64]) -> f64 {
    let total = total_private_wealth(stashes);
    if stashes.is_empty() || total <= 0 {
        return 0.0;
    }

    let mut sorted: Vec<i64> = stashes.iter().map(|s| (*s).max(0)).collect();
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    let top_count = (stashes.len() as f64 * 0.1).ceil() as usize;
    let top: i64 = sorted.iter().take(top_count).sum();
    top as f64 / total as f64 * 100.0
}

/// Classifies the public mood.
pub fn sentiment(config: &EconomyConfig, public_pool: i64, safe_level: i64, cost: i64) -> Sentiment {
    if public_pool <= 0 {
        Sentiment::Anarchy
    } else if (public_pool as f64) < safe_level as f64 * config.fury_pool_ratio
        || cost >= config.fury_cost
    {
        Sentiment::Fury
    } else if public_pool < safe_level || cost >= config.fear_cost {
        Sentiment::Fear
    } else {
        Sentiment::Stable
    }
}
