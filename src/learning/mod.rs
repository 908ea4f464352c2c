//! Inertia-based learning core: strategy-class selection, coherence
//! learning, energy accumulation, temperature dynamics, and stochastic
//! regime jumps.

mod engine;
mod state;

pub use engine::{AdaptationEngine, LearningModifiers, UpdateReport};
pub use state::{InertiaMap, LearningState};
