//! Decision Policy
//!
//! Table-driven action choice for autonomous agents. Each personality maps to
//! a weight row `[collaborate, private_work, steal]`, which two overrides can
//! reshape before the weighted draw:
//!
//! 1. Crisis solidarity: when the treasury is critically low, every
//!    personality except `Greedy` leans toward collaboration.
//! 2. Desperation: when an agent cannot cover a few days of living costs it
//!    leans sharply toward stealing, whatever its disposition.
//!
//! Desperation is applied last so it dominates.

use harvest_events::{ActionKind, Personality};
use rand::Rng;

use crate::agent::Agent;
use crate::config::PolicyConfig;
use crate::economy::EconomicSnapshot;

/// Weight row in `ActionKind::AUTONOMOUS` column order.
pub type WeightRow = [f64; 3];

/// Conditions that override an agent's disposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Overrides {
    pub crisis: bool,
    pub desperate: bool,
}

impl Overrides {
    /// Evaluates both override conditions for one agent.
    pub fn evaluate(config: &PolicyConfig, agent: &Agent, snapshot: &EconomicSnapshot) -> Self {
        let crisis_line = snapshot.safe_level as f64 * config.crisis_pool_ratio;
        let desperation_line = snapshot.cost_of_living as f64 * config.desperation_multiple;

        Self {
            crisis: (snapshot.public_pool as f64) < crisis_line,
            desperate: (agent.stash as f64) < desperation_line,
        }
    }
}

/// Base row for a personality.
pub fn base_weights(config: &PolicyConfig, personality: Personality) -> WeightRow {
    match personality {
        Personality::Altruist => config.altruist,
        Personality::Greedy => config.greedy,
        Personality::Chaotic => config.chaotic,
        Personality::Opportunist => config.opportunist,
    }
}

/// Normalizes a row and blends it toward a single action by `bias`.
pub fn blend_toward(row: WeightRow, action: ActionKind, bias: f64) -> WeightRow {
    let Some(column) = action.column() else {
        return row;
    };
    let bias = bias.clamp(0.0, 1.0);
    let row = normalize(row);

    let mut blended = [0.0; 3];
    for (i, weight) in row.iter().enumerate() {
        let target = if i == column { 1.0 } else { 0.0 };
        blended[i] = weight * (1.0 - bias) + target * bias;
    }
    blended
}

/// Final weights after both overrides.
pub fn decision_weights(
    config: &PolicyConfig,
    personality: Personality,
    overrides: Overrides,
) -> WeightRow {
    let mut row = normalize(base_weights(config, personality));

    if overrides.crisis && personality != Personality::Greedy {
        row = blend_toward(row, ActionKind::Collaborate, config.crisis_bias);
    }
    if overrides.desperate {
        row = blend_toward(row, ActionKind::Steal, config.desperation_bias);
    }
    row
}

/// Draws an agent's action for the day.
pub fn decide<R: Rng>(
    config: &PolicyConfig,
    agent: &Agent,
    snapshot: &EconomicSnapshot,
    rng: &mut R,
) -> ActionKind {
    let overrides = Overrides::evaluate(config, agent, snapshot);
    let weights = decision_weights(config, agent.personality, overrides);
    ActionKind::AUTONOMOUS[weighted_random_choice(rng, &weights)]
}

fn normalize(row: WeightRow) -> WeightRow {
    let clamped = row.map(|w| w.max(0.0));
    let total: f64 = clamped.iter().sum();
    if total <= 0.0 {
        // Invalid rows fall back to a uniform draw
        return [1.0 / 3.0; 3];
    }
    clamped.map(|w| w / total)
}

/// Weighted random selection over a row, returning the column index.
fn weighted_random_choice<R: Rng>(rng: &mut R, weights: &[f64]) -> usize {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return 0;
    }

    let mut roll: f64 = rng.gen::<f64>() * total;
    for (i, weight) in weights.iter().enumerate() {
        roll -= weight;
        if roll < 0.0 {
            return i;
        }
    }

    // Floating point leftovers land on the last non-zero column
    weights.iter().rposition(|w| *w > 0.0).unwrap_or(0)
}
