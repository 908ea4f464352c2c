//! APEX - pressure-driven decision engine for an elimination chicken game
//!
//! This crate provides:
//! - Meaning-pressure calculators (HP fear, reversal feasibility,
//!   elimination-line proximity, multi-conflict superposition)
//! - A learning core with inertia-weighted strategy selection, an energy
//!   accumulator, temperature dynamics, and stochastic regime jumps
//! - An adaptive choice-distribution strategy and deterministic rule policies
//! - A tournament runner wiring agents, environments, and scoring together

pub mod agent;
pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod learning;
pub mod pressure;
pub mod strategy;
pub mod tournament;
pub mod types;
pub mod utils;

pub use agent::{Agent, AgentState, EliminationRecord, RoundOutcome};
pub use config::GameConfig;
pub use environment::EnvironmentKind;
pub use error::{Error, Result};
pub use learning::{AdaptationEngine, LearningState};
pub use pressure::{DecisionContext, MeaningPressureCalculator, PressureReading};
pub use tournament::{Tournament, TournamentReport};
pub use types::{Action, ChoiceDistribution, StrategyClass};
