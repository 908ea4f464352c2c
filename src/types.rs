//! Newtype wrappers and closed enums for the decision engine.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::utils;

/// Number of discrete actions an agent can commit to per round.
pub const ACTION_COUNT: usize = 10;

/// A committed risk level (1-10 for the chicken game).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Action(u8);

impl Action {
    pub const MIN: Action = Action(1);
    pub const MAX: Action = Action(ACTION_COUNT as u8);

    /// Create a new action, validating it's within the 1-10 band.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidAction`] if the value is 0 or > 10.
    pub fn new(value: u8) -> Result<Self, crate::Error> {
        if (1..=ACTION_COUNT as u8).contains(&value) {
            Ok(Action(value))
        } else {
            Err(crate::Error::InvalidAction { value })
        }
    }

    /// Create an action from a zero-based score-array index.
    ///
    /// # Panics
    ///
    /// Debug-asserts the index is < 10; callers iterate fixed-size arrays.
    pub fn from_index(index: usize) -> Self {
        debug_assert!(index < ACTION_COUNT);
        Action(index as u8 + 1)
    }

    /// Get the inner value.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Zero-based index into per-action score/probability arrays.
    pub fn index(&self) -> usize {
        usize::from(self.0) - 1
    }

    /// The strategy class this action belongs to (1-4 low, 5-7 medium, 8-10 high).
    pub fn class(&self) -> StrategyClass {
        match self.0 {
            1..=4 => StrategyClass::LowRisk,
            5..=7 => StrategyClass::MediumRisk,
            _ => StrategyClass::HighRisk,
        }
    }

    /// Iterate all actions in ascending order.
    pub fn all() -> impl Iterator<Item = Action> {
        (1..=ACTION_COUNT as u8).map(Action)
    }
}

impl From<Action> for usize {
    fn from(action: Action) -> Self {
        usize::from(action.0)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strategy classes the learning core accumulates inertia over.
///
/// A closed enum rather than a string-keyed map so the inertia table can be
/// a fixed-size array with compile-time exhaustiveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyClass {
    LowRisk,
    MediumRisk,
    HighRisk,
}

impl StrategyClass {
    pub const ALL: [StrategyClass; 3] = [
        StrategyClass::LowRisk,
        StrategyClass::MediumRisk,
        StrategyClass::HighRisk,
    ];

    /// Stable index into per-class arrays.
    pub fn index(&self) -> usize {
        match self {
            StrategyClass::LowRisk => 0,
            StrategyClass::MediumRisk => 1,
            StrategyClass::HighRisk => 2,
        }
    }

    /// Short label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            StrategyClass::LowRisk => "low_risk",
            StrategyClass::MediumRisk => "medium_risk",
            StrategyClass::HighRisk => "high_risk",
        }
    }
}

impl fmt::Display for StrategyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A probability distribution over the ten actions.
///
/// Entries are non-negative and sum to 1 within floating tolerance. The
/// ultra-safe short-circuit distribution legitimately carries exact zeros in
/// its tail; softmax-produced distributions are strictly positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceDistribution([f64; ACTION_COUNT]);

impl ChoiceDistribution {
    /// Hand-tuned ultra-conservative distribution used when meaning pressure
    /// drops below the activity threshold.
    pub const ULTRA_SAFE: ChoiceDistribution =
        ChoiceDistribution([0.60, 0.30, 0.08, 0.02, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);

    /// Build a distribution from raw probabilities, validating the simplex.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidProbability`] for negative or
    /// non-finite entries, [`crate::Error::InvalidDistribution`] if the sum
    /// is not 1 within 1e-9.
    pub fn new(probabilities: [f64; ACTION_COUNT]) -> Result<Self, crate::Error> {
        for (i, &p) in probabilities.iter().enumerate() {
            if !p.is_finite() || p < 0.0 {
                return Err(crate::Error::InvalidProbability {
                    action: i as u8 + 1,
                    value: p,
                });
            }
        }
        let sum: f64 = probabilities.iter().sum();
        if (sum - 1.0).abs() > 1e-9 {
            return Err(crate::Error::InvalidDistribution { sum });
        }
        Ok(ChoiceDistribution(probabilities))
    }

    /// Softmax over raw scores at the given temperature.
    ///
    /// Scores are shifted by their maximum before exponentiation so large
    /// score gaps cannot overflow.
    pub fn from_scores(scores: &[f64; ACTION_COUNT], temperature: f64) -> Self {
        ChoiceDistribution(utils::softmax(scores, temperature))
    }

    /// Probability assigned to an action.
    pub fn probability(&self, action: Action) -> f64 {
        self.0[action.index()]
    }

    /// The underlying probabilities, indexed by `Action::index()`.
    pub fn probabilities(&self) -> &[f64; ACTION_COUNT] {
        &self.0
    }

    /// Total probability mass over an inclusive action range.
    pub fn mass(&self, low: Action, high: Action) -> f64 {
        self.0[low.index()..=high.index()].iter().sum()
    }

    /// Draw one action from the distribution.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Action {
        Action::from_index(utils::sample_categorical(rng, &self.0))
    }
}
