//! Serializable tournament results.

use serde::{Deserialize, Serialize};

use crate::agent::EliminationRecord;
use crate::environment::EnvironmentKind;

/// One agent's line in a set result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetStanding {
    pub rank: usize,
    pub name: String,
    pub set_score: i64,
    pub total_score: i64,
    pub hp: u32,
    pub alive: bool,
    /// Rank bonus paid into the total, already environment-scaled.
    pub bonus: i64,
}

/// Result of one completed set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetSummary {
    pub set: u32,
    pub environment: EnvironmentKind,
    /// Resolved crash-probability multiplier for this set.
    pub risk_multiplier: f64,
    /// Resolved success-bonus multiplier for this set.
    pub bonus_multiplier: f64,
    pub standings: Vec<SetStanding>,
}

/// One agent's final line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSummary {
    pub rank: usize,
    pub name: String,
    pub total_score: i64,
    pub hp: u32,
    pub alive: bool,
    pub set_ranks: Vec<usize>,
    pub jump_count: u32,
    /// Final per-class inertia values.
    pub inertia: [f64; 3],
    pub elimination: Option<EliminationRecord>,
}

/// Full record of one tournament.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentReport {
    pub seed: u64,
    pub champion: String,
    pub sets: Vec<SetSummary>,
    /// Final standings: survivors by total score, then the eliminated.
    pub standings: Vec<AgentSummary>,
}

impl TournamentReport {
    /// Final total score of the named agent, if present.
    pub fn total_score_of(&self, name: &str) -> Option<i64> {
        self.standings
            .iter()
            .find(|summary| summary.name == name)
            .map(|summary| summary.total_score)
    }
}
