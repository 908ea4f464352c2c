//! Game, tournament, and learning configuration.
//!
//! Every tunable the engine consumes lives here with a serde default, so a
//! partial JSON config only needs to name the fields it overrides.

use std::{
    collections::HashMap,
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::environment::{EnvironmentKind, EnvironmentModifier};
use crate::strategy::RuleKind;
use crate::types::{ACTION_COUNT, Action};

/// Per-action crash probabilities and payout bonuses plus the HP economy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    /// Crash probability for each action, indexed by `Action::index()`.
    pub crash_probabilities: [f64; ACTION_COUNT],
    /// Success bonus paid to the round winner, indexed by `Action::index()`.
    pub success_bonuses: [i64; ACTION_COUNT],
    pub starting_hp: u32,
    pub max_hp: u32,
    /// HP lost per crash.
    pub crash_hp_loss: u32,
    /// Price of one HP in the between-set purchase phase.
    pub hp_purchase_cost: i64,
    /// Multiplier applied to a crasher's committed action (negative).
    pub crash_penalty_multiplier: f64,
    /// Extra fraction of a positive round score awarded at HP 1.
    pub last_stand_bonus: f64,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            crash_probabilities: [0.02, 0.05, 0.10, 0.15, 0.20, 0.28, 0.35, 0.45, 0.60, 0.75],
            success_bonuses: [0, 0, 0, 0, 2, 3, 5, 8, 12, 20],
            starting_hp: 3,
            max_hp: 5,
            crash_hp_loss: 1,
            hp_purchase_cost: 15,
            crash_penalty_multiplier: -2.0,
            last_stand_bonus: 0.3,
        }
    }
}

impl GameRules {
    pub fn crash_probability(&self, action: Action) -> f64 {
        self.crash_probabilities[action.index()]
    }

    pub fn success_bonus(&self, action: Action) -> i64 {
        self.success_bonuses[action.index()]
    }

    /// Maximum winner bonus in a single round, used by the reversal math.
    pub fn max_success_bonus(&self) -> i64 {
        self.success_bonuses.iter().copied().max().unwrap_or(0)
    }

    fn validate(&self) -> crate::Result<()> {
        for (i, &p) in self.crash_probabilities.iter().enumerate() {
            if !(0.0..=1.0).contains(&p) {
                return Err(crate::Error::InvalidConfiguration {
                    message: format!("crash probability for action {} is {p}", i + 1),
                });
            }
        }
        if self.starting_hp == 0 || self.starting_hp > self.max_hp {
            return Err(crate::Error::InvalidConfiguration {
                message: format!(
                    "starting_hp {} must be in 1..={}",
                    self.starting_hp, self.max_hp
                ),
            });
        }
        if self.hp_purchase_cost <= 0 {
            return Err(crate::Error::InvalidConfiguration {
                message: "hp_purchase_cost must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Extra pressure applied in the last round of a non-final set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FinalRoundParams {
    pub finality_weight: f64,
    pub desperation_bonus: f64,
}

impl Default for FinalRoundParams {
    fn default() -> Self {
        Self {
            finality_weight: 2.0,
            desperation_bonus: 1.0,
        }
    }
}

/// Tournament shape: sets, rounds, rank bonuses, environment schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentRules {
    pub sets: u32,
    pub rounds: u32,
    /// Total-score bonus by end-of-set rank (index = rank - 1), scaled by the
    /// environment bonus multiplier before payout.
    pub set_rank_bonus: Vec<i64>,
    pub final_round: FinalRoundParams,
    /// Environment per set (index = set - 1); sets beyond the schedule run
    /// under `normal`.
    pub environment_schedule: Vec<EnvironmentKind>,
    /// Gameplay risk/bonus modifiers per environment kind. Kinds absent from
    /// the map fall back to the built-in table.
    pub environment_modifiers: HashMap<EnvironmentKind, EnvironmentModifier>,
}

impl Default for TournamentRules {
    fn default() -> Self {
        Self {
            sets: 5,
            rounds: 5,
            set_rank_bonus: vec![30, 20, 10, 5, 0, 0, 0],
            final_round: FinalRoundParams::default(),
            environment_schedule: vec![
                EnvironmentKind::Normal,
                EnvironmentKind::Mild,
                EnvironmentKind::Moderate,
                EnvironmentKind::Volatile,
                EnvironmentKind::Deadly,
            ],
            environment_modifiers: HashMap::new(),
        }
    }
}

impl TournamentRules {
    pub fn environment_for_set(&self, set: u32) -> EnvironmentKind {
        self.environment_schedule
            .get(set.saturating_sub(1) as usize)
            .copied()
            .unwrap_or(EnvironmentKind::Normal)
    }

    pub fn modifier_for(&self, kind: EnvironmentKind) -> EnvironmentModifier {
        self.environment_modifiers
            .get(&kind)
            .copied()
            .unwrap_or_else(|| EnvironmentModifier::default_for(kind))
    }

    pub fn rank_bonus(&self, rank: usize) -> i64 {
        if rank == 0 {
            return 0;
        }
        self.set_rank_bonus.get(rank - 1).copied().unwrap_or(0)
    }

    fn validate(&self) -> crate::Result<()> {
        if self.sets == 0 || self.rounds == 0 {
            return Err(crate::Error::InvalidConfiguration {
                message: "tournament needs at least 1 set and 1 round".to_string(),
            });
        }
        Ok(())
    }
}

/// Parameters of the adaptation engine: inertia learning, energy
/// accumulation, temperature dynamics, and the jump hazard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningParams {
    pub kappa_init: f64,
    pub kappa_min: f64,
    pub t_base: f64,
    pub t_min: f64,
    pub t_max: f64,
    /// Learning rate for the chosen class's inertia.
    pub eta: f64,
    /// Resistance-loss coefficient in the work term.
    pub rho: f64,
    /// Decay rate of the chosen class toward `kappa_min`.
    pub lambda_forget: f64,
    /// Decay rate of the unchosen classes toward `kappa_min`.
    pub lambda_forget_other: f64,
    /// Energy gain per unit of surprise.
    pub alpha: f64,
    /// Energy decay rate.
    pub beta_e: f64,
    /// Temperature coupling to energy.
    pub c1: f64,
    /// Temperature coupling to inertia concentration.
    pub c2: f64,
    pub jump_threshold: f64,
    pub jump_base_rate: f64,
    pub jump_gamma: f64,
}

impl Default for LearningParams {
    fn default() -> Self {
        Self {
            kappa_init: 0.3,
            kappa_min: 0.1,
            t_base: 0.8,
            t_min: 0.5,
            t_max: 5.0,
            eta: 0.5,
            rho: 0.2,
            lambda_forget: 0.05,
            lambda_forget_other: 0.02,
            alpha: 0.3,
            beta_e: 0.1,
            c1: 0.5,
            c2: 0.3,
            jump_threshold: 2.0,
            jump_base_rate: 0.1,
            jump_gamma: 0.5,
        }
    }
}

impl LearningParams {
    fn validate(&self) -> crate::Result<()> {
        if self.kappa_min <= 0.0 || self.kappa_init < self.kappa_min {
            return Err(crate::Error::InvalidConfiguration {
                message: format!(
                    "kappa_init {} must be >= kappa_min {} > 0",
                    self.kappa_init, self.kappa_min
                ),
            });
        }
        if self.t_min <= 0.0 || self.t_max < self.t_min {
            return Err(crate::Error::InvalidConfiguration {
                message: format!("temperature bounds [{}, {}] invalid", self.t_min, self.t_max),
            });
        }
        Ok(())
    }
}

/// Weights and band thresholds of the meaning-pressure aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PressureParams {
    pub base_weight: f64,
    pub round_progression_weight: f64,
    pub score_gap_weight: f64,
    /// Pressure band cutoffs consumed by strategy selection.
    pub high_threshold: f64,
    pub medium_threshold: f64,
    pub low_threshold: f64,
}

impl Default for PressureParams {
    fn default() -> Self {
        Self {
            base_weight: 0.5,
            round_progression_weight: 0.5,
            score_gap_weight: 0.3,
            high_threshold: 5.0,
            medium_threshold: 3.0,
            low_threshold: 1.5,
        }
    }
}

/// Knobs of the opponent-tendency analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpponentAnalysisParams {
    /// Below this many observed choices an opponent reads as neutral (5.5).
    pub min_history_length: usize,
    /// Weight given to an opponent's three most recent choices.
    pub recent_weight: f64,
    pub aggressive_threshold: f64,
    pub conservative_threshold: f64,
}

impl Default for OpponentAnalysisParams {
    fn default() -> Self {
        Self {
            min_history_length: 3,
            recent_weight: 2.0,
            aggressive_threshold: 7.0,
            conservative_threshold: 4.0,
        }
    }
}

/// Per-band scoring multipliers plus learning modifiers, all neutral at 1.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalityWeights {
    pub low_risk: f64,
    pub medium_risk: f64,
    pub high_risk: f64,
    pub learning_speed: f64,
    pub pressure_sensitivity: f64,
    pub temperature_sensitivity: f64,
    pub jump_threshold_modifier: f64,
}

impl Default for PersonalityWeights {
    fn default() -> Self {
        Self {
            low_risk: 1.0,
            medium_risk: 1.0,
            high_risk: 1.0,
            learning_speed: 1.0,
            pressure_sensitivity: 1.0,
            temperature_sensitivity: 1.0,
            jump_threshold_modifier: 1.0,
        }
    }
}

/// Which decision policy an agent runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PolicyKind {
    /// Learning-driven choice distribution.
    Adaptive,
    /// One of the deterministic rule policies.
    Rule { rule: RuleKind },
}

impl Default for PolicyKind {
    fn default() -> Self {
        PolicyKind::Adaptive
    }
}

/// One tournament participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentProfile {
    pub name: String,
    #[serde(default)]
    pub policy: PolicyKind,
    /// Starting inertia; falls back to `LearningParams::kappa_init`.
    #[serde(default)]
    pub kappa_init: Option<f64>,
    /// Jump threshold override.
    #[serde(default)]
    pub jump_threshold: Option<f64>,
    /// Base temperature override.
    #[serde(default)]
    pub t_base: Option<f64>,
    #[serde(default)]
    pub weights: PersonalityWeights,
    #[serde(default)]
    pub opponent_analysis: bool,
}

impl AgentProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            policy: PolicyKind::Adaptive,
            kappa_init: None,
            jump_threshold: None,
            t_base: None,
            weights: PersonalityWeights::default(),
            opponent_analysis: false,
        }
    }

    fn profile(
        name: &str,
        kappa: f64,
        jump_threshold: f64,
        t_base: f64,
        weights: PersonalityWeights,
        opponent_analysis: bool,
    ) -> Self {
        Self {
            name: name.to_string(),
            policy: PolicyKind::Adaptive,
            kappa_init: Some(kappa),
            jump_threshold: Some(jump_threshold),
            t_base: Some(t_base),
            weights,
            opponent_analysis,
        }
    }
}

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GameConfig {
    pub rules: GameRules,
    pub tournament: TournamentRules,
    pub learning: LearningParams,
    pub pressure: PressureParams,
    pub opponent_analysis: OpponentAnalysisParams,
    pub agents: Vec<AgentProfile>,
}

impl GameConfig {
    /// The stock seven-agent roster: six adaptive temperaments and one
    /// rule-follower.
    pub fn default_roster() -> Self {
        let agents = vec![
            AgentProfile::profile(
                "Cautious",
                0.2,
                2.5,
                0.6,
                PersonalityWeights {
                    low_risk: 1.5,
                    high_risk: 0.6,
                    ..PersonalityWeights::default()
                },
                false,
            ),
            AgentProfile::profile(
                "Aggressive",
                0.5,
                1.5,
                1.2,
                PersonalityWeights {
                    low_risk: 0.6,
                    high_risk: 1.6,
                    pressure_sensitivity: 1.3,
                    ..PersonalityWeights::default()
                },
                false,
            ),
            AgentProfile::profile(
                "Balanced",
                0.3,
                2.0,
                0.8,
                PersonalityWeights::default(),
                false,
            ),
            AgentProfile::profile(
                "Strategic",
                0.35,
                2.0,
                0.7,
                PersonalityWeights {
                    medium_risk: 1.3,
                    learning_speed: 1.2,
                    ..PersonalityWeights::default()
                },
                true,
            ),
            AgentProfile::profile(
                "Optimist",
                0.4,
                1.8,
                1.0,
                PersonalityWeights {
                    medium_risk: 1.2,
                    high_risk: 1.2,
                    temperature_sensitivity: 1.2,
                    ..PersonalityWeights::default()
                },
                false,
            ),
            AgentProfile::profile(
                "Gambler",
                0.45,
                1.2,
                1.5,
                PersonalityWeights {
                    low_risk: 0.5,
                    high_risk: 1.8,
                    jump_threshold_modifier: 0.8,
                    ..PersonalityWeights::default()
                },
                false,
            ),
            AgentProfile {
                name: "Steady".to_string(),
                policy: PolicyKind::Rule {
                    rule: RuleKind::SafeThenPush,
                },
                kappa_init: None,
                jump_threshold: None,
                t_base: None,
                weights: PersonalityWeights::default(),
                opponent_analysis: false,
            },
        ];
        Self {
            agents,
            ..Self::default()
        }
    }

    /// Validate cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] on any violated bound
    /// and [`crate::Error::NotEnoughAgents`] for a roster below two.
    pub fn validate(&self) -> crate::Result<()> {
        self.rules.validate()?;
        self.tournament.validate()?;
        self.learning.validate()?;
        if self.agents.len() < 2 {
            return Err(crate::Error::NotEnoughAgents {
                count: self.agents.len(),
            });
        }
        for profile in &self.agents {
            if let Some(kappa) = profile.kappa_init {
                if kappa < self.learning.kappa_min {
                    return Err(crate::Error::InvalidConfiguration {
                        message: format!(
                            "agent {} kappa_init {kappa} below kappa_min {}",
                            profile.name, self.learning.kappa_min
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// Load a configuration from a JSON file and validate it.
    pub fn load(path: impl AsRef<Path>) -> crate::Result<Self> {
        let file = File::open(path.as_ref()).map_err(|source| crate::Error::Io {
            operation: format!("open config {}", path.as_ref().display()),
            source,
        })?;
        let config: GameConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> crate::Result<()> {
        let file = File::create(path.as_ref()).map_err(|source| crate::Error::Io {
            operation: format!("create config {}", path.as_ref().display()),
            source,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}
