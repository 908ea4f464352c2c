//! Mutable learning state carried by each adaptive agent.

use serde::{Deserialize, Serialize};

use crate::types::StrategyClass;

/// Accumulated confidence per strategy class, floored at `kappa_min`.
///
/// A fixed-size array keyed by [`StrategyClass::index`] rather than a map:
/// the class set is closed, so exhaustiveness is checked at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InertiaMap([f64; 3]);

impl InertiaMap {
    pub fn uniform(value: f64) -> Self {
        InertiaMap([value; 3])
    }

    pub fn get(&self, class: StrategyClass) -> f64 {
        self.0[class.index()]
    }

    pub fn set(&mut self, class: StrategyClass, value: f64) {
        self.0[class.index()] = value;
    }

    pub fn values(&self) -> [f64; 3] {
        self.0
    }

    pub fn mean(&self) -> f64 {
        self.0.iter().sum::<f64>() / 3.0
    }
}

/// The adaptation engine's full state for one agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningState {
    pub inertia: InertiaMap,
    /// Unprocessed pressure accumulator, never negative.
    pub energy: f64,
    pub temperature: f64,
    /// Class chosen by the most recent `choose_strategy`; `None` until the
    /// first selection, making `update` a no-op.
    pub last_strategy: Option<StrategyClass>,
    pub jump_count: u32,
}

impl LearningState {
    pub fn new(kappa_init: f64, t_base: f64) -> Self {
        Self {
            inertia: InertiaMap::uniform(kappa_init),
            energy: 0.0,
            temperature: t_base,
            last_strategy: None,
            jump_count: 0,
        }
    }

    /// Reset only the temperature between sets; learned inertia persists.
    pub fn reset_temperature(&mut self, t_base: f64) {
        self.temperature = t_base;
    }
}
