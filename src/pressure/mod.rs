//! Meaning-pressure aggregation.
//!
//! Pressure is the scalar that drives every downstream decision: strategy
//! selection bands, the choice-distribution temperature, and the ultra-safe
//! short-circuit. It is assembled from independent signals — HP fear,
//! reversal feasibility, elimination-line proximity, the multi-conflict
//! superposition — plus rank/gap urgency and the final-round adjustment.

pub mod conflict;
pub mod elimination;
pub mod final_round;
pub mod hp;
pub mod reversal;

use serde::{Deserialize, Serialize};

pub use conflict::ConflictContribution;
pub use final_round::FinalVerdict;
pub use reversal::ReversalOutlook;

use crate::config::{GameConfig, GameRules, PressureParams, TournamentRules};

/// Everything an agent knows about its standing when deciding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionContext {
    /// 1-based round within the set.
    pub round: u32,
    pub total_rounds: u32,
    pub is_final_round: bool,
    /// 1-based set within the tournament.
    pub current_set: u32,
    pub total_sets: u32,
    /// 1-based rank by set-local score among living agents.
    pub set_rank: usize,
    /// Points behind the set leader; 0 for the leader.
    pub set_gap: i64,
    /// 1-based rank by tournament total.
    pub overall_rank: usize,
    /// Points behind the overall leader; for the leader this is the margin
    /// over second place, negated.
    pub overall_gap: i64,
    pub alive_count: usize,
    /// Bonus multiplier of the active environment.
    pub env_bonus_multiplier: f64,
    pub hp: u32,
    pub total_score: i64,
}

impl DecisionContext {
    /// Rounds left in the set after this one.
    pub fn remaining_rounds(&self) -> u32 {
        self.total_rounds.saturating_sub(self.round)
    }
}

/// Aggregated pressure plus the feasibility flags other consumers need.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureReading {
    pub pressure: f64,
    pub set_reversal_possible: bool,
    pub overall_reversal_possible: bool,
    /// Populated only in the final round of the final set.
    pub verdict: Option<FinalVerdict>,
}

/// Single entry point that composes all pressure signals.
#[derive(Debug, Clone)]
pub struct MeaningPressureCalculator {
    rules: GameRules,
    tournament: TournamentRules,
    params: PressureParams,
}

impl MeaningPressureCalculator {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            rules: config.rules.clone(),
            tournament: config.tournament.clone(),
            params: config.pressure.clone(),
        }
    }

    /// Aggregate every signal into one reading under the configured rules.
    pub fn evaluate(&self, ctx: &DecisionContext) -> PressureReading {
        self.evaluate_under(ctx, &self.rules)
    }

    /// Evaluate against environment-adjusted rules instead of the configured
    /// base tables.
    pub fn evaluate_under(&self, ctx: &DecisionContext, rules: &GameRules) -> PressureReading {
        let mut pressure = self.params.base_weight
            + self.params.round_progression_weight
                * (f64::from(ctx.round) / f64::from(ctx.total_rounds));

        let outlook = reversal::assess(ctx, rules, &self.tournament);
        let line_pressure =
            elimination::elimination_line_pressure(ctx, rules, &self.tournament);
        let contribution = conflict::superpose(ctx, rules.max_hp, outlook.combined(ctx));

        pressure += contribution.death_pressure;
        pressure *= contribution.endgame_multiplier;
        pressure += contribution.endgame_bonus;
        pressure += contribution.debt_despair;
        pressure += line_pressure;

        if ctx.set_rank > 1 {
            let rank_pressure =
                self.params.score_gap_weight * (ctx.set_rank as f64 - 1.0) * 0.5;
            let gap_pressure = (ctx.set_gap.unsigned_abs() as f64 / 20.0).min(5.0);
            pressure += rank_pressure + gap_pressure;
        }

        let verdict = if ctx.is_final_round {
            let adjusted = final_round::adjust(ctx, rules, &self.tournament, pressure);
            pressure = adjusted.pressure;
            adjusted.verdict
        } else {
            None
        };

        PressureReading {
            pressure,
            set_reversal_possible: outlook.set_reversal_possible(),
            overall_reversal_possible: outlook.overall_reversal_possible(),
            verdict,
        }
    }
}
