//! Learning-driven choice distribution.
//!
//! Scores for the ten actions start flat and are shaped multiplicatively:
//! band weighting from the calibrated safe/push sets, reinforcement of
//! past successes, personality band multipliers, opponent-tendency
//! counter-play, and the HP-fear override. A temperature softmax (heated by
//! pressure) turns the scores into a distribution; below the activity
//! threshold the hand-tuned ultra-safe distribution short-circuits the whole
//! pipeline.

use std::collections::HashMap;

use crate::config::{GameRules, OpponentAnalysisParams, PersonalityWeights};
use crate::strategy::bands::ActionBands;
use crate::types::{ACTION_COUNT, Action, ChoiceDistribution};

/// Pressure below which learning-driven choice is disabled entirely.
const ACTIVITY_THRESHOLD: f64 = 0.1;

/// Neutral tendency reported for opponents with too little history.
const NEUTRAL_TENDENCY: f64 = 5.5;

/// Inputs for one distribution computation.
#[derive(Debug, Clone, Copy)]
pub struct ChoiceInput<'a> {
    pub pressure: f64,
    /// Current learning temperature.
    pub temperature: f64,
    pub hp: u32,
    pub max_hp: u32,
    pub choice_history: &'a [Action],
    pub success_history: &'a [bool],
    pub opponent_choices: &'a HashMap<String, Vec<Action>>,
}

/// The adaptive (learning-driven) action strategy.
#[derive(Debug, Clone)]
pub struct AdaptiveStrategy {
    weights: PersonalityWeights,
    opponent_analysis: Option<OpponentAnalysisParams>,
    bands: ActionBands,
}

impl AdaptiveStrategy {
    pub fn new(
        weights: PersonalityWeights,
        opponent_analysis: Option<OpponentAnalysisParams>,
        rules: &GameRules,
        total_rounds: u32,
    ) -> Self {
        Self {
            weights,
            opponent_analysis,
            bands: ActionBands::calibrate(rules, total_rounds),
        }
    }

    /// Recalibrate the bands after an environment shift rescales the rules.
    pub fn recalibrate(&mut self, rules: &GameRules, total_rounds: u32) {
        self.bands = ActionBands::calibrate(rules, total_rounds);
    }

    /// Produce the choice distribution for the current situation.
    pub fn distribution(&self, input: &ChoiceInput<'_>) -> ChoiceDistribution {
        if input.pressure < ACTIVITY_THRESHOLD {
            return ChoiceDistribution::ULTRA_SAFE;
        }

        let mut scores = [1.0f64; ACTION_COUNT];
        self.apply_band_weighting(&mut scores, input.pressure);
        self.apply_history_reinforcement(&mut scores, input);
        self.apply_personality(&mut scores);
        self.apply_opponent_analysis(&mut scores, input.opponent_choices);
        self.apply_hp_fear(&mut scores, input);

        let t_adjusted = input.temperature * (1.0 + input.pressure * 0.3);
        ChoiceDistribution::from_scores(&scores, t_adjusted)
    }

    fn apply_band_weighting(&self, scores: &mut [f64; ACTION_COUNT], pressure: f64) {
        for action in Action::all() {
            let i = action.index();
            if pressure > 5.0 {
                if self.bands.is_push(action) {
                    scores[i] *= 1.8;
                } else if self.bands.is_safe(action) {
                    scores[i] *= 0.8;
                }
            } else if pressure < 1.5 {
                if self.bands.is_safe(action) {
                    scores[i] *= 1.6;
                } else if self.bands.is_push(action) {
                    scores[i] *= 0.8;
                }
            } else if self.bands.is_safe(action) || self.bands.is_push(action) {
                scores[i] *= 1.3;
            }
        }
    }

    /// Each past success adds a flat bonus to the action that earned it.
    fn apply_history_reinforcement(
        &self,
        scores: &mut [f64; ACTION_COUNT],
        input: &ChoiceInput<'_>,
    ) {
        let len = input.choice_history.len().min(input.success_history.len());
        for i in 0..len {
            let action = input.choice_history[input.choice_history.len() - 1 - i];
            if input.success_history[input.success_history.len() - 1 - i] {
                scores[action.index()] += 0.5;
            }
        }
    }

    fn apply_personality(&self, scores: &mut [f64; ACTION_COUNT]) {
        for i in 0..4 {
            scores[i] *= self.weights.low_risk;
        }
        for i in 4..7 {
            scores[i] *= self.weights.medium_risk;
        }
        for i in 7..10 {
            scores[i] *= self.weights.high_risk;
        }
    }

    /// Weighted average choice per opponent; three most recent choices carry
    /// the configured recency weight.
    fn opponent_tendencies(
        params: &OpponentAnalysisParams,
        opponent_choices: &HashMap<String, Vec<Action>>,
    ) -> Vec<f64> {
        opponent_choices
            .values()
            .map(|choices| {
                if choices.len() < params.min_history_length {
                    return NEUTRAL_TENDENCY;
                }
                let mut weighted_sum = 0.0;
                let mut total_weight = 0.0;
                for (i, action) in choices.iter().enumerate() {
                    let weight = if i + 3 >= choices.len() {
                        params.recent_weight
                    } else {
                        1.0
                    };
                    weighted_sum += f64::from(action.value()) * weight;
                    total_weight += weight;
                }
                if total_weight > 0.0 {
                    weighted_sum / total_weight
                } else {
                    NEUTRAL_TENDENCY
                }
            })
            .collect()
    }

    fn apply_opponent_analysis(
        &self,
        scores: &mut [f64; ACTION_COUNT],
        opponent_choices: &HashMap<String, Vec<Action>>,
    ) {
        let Some(params) = &self.opponent_analysis else {
            return;
        };
        let tendencies = Self::opponent_tendencies(params, opponent_choices);
        if tendencies.is_empty() {
            return;
        }
        let average = tendencies.iter().sum::<f64>() / tendencies.len() as f64;

        if average >= params.aggressive_threshold {
            // Outbid aggressive tables by one or two.
            let start = (average + 0.5).min(9.0) as usize;
            let end = (average + 2.0).min(10.0) as usize;
            for i in start.saturating_sub(1)..end {
                scores[i] *= 1.4;
            }
        } else if average <= params.conservative_threshold {
            // Sit just above a cautious table.
            let start = (average + 1.0).min(6.0) as usize;
            let end = (average + 3.0).min(8.0) as usize;
            for i in start.saturating_sub(1)..end {
                scores[i] *= 1.3;
            }
        }
    }

    /// Survival override keyed on the HP ratio.
    fn apply_hp_fear(&self, scores: &mut [f64; ACTION_COUNT], input: &ChoiceInput<'_>) {
        let hp_ratio = f64::from(input.hp) / f64::from(input.max_hp.max(1));

        if hp_ratio <= 0.2 {
            // One crash from elimination.
            if input.pressure >= 5.0 {
                // Desperate: survival alone cannot win, spread across the
                // low-to-mid range but keep the extremes suppressed.
                scores[0] *= 10.0;
                for i in 1..5 {
                    scores[i] *= 5.0;
                }
                for i in 5..8 {
                    scores[i] *= 2.0;
                }
                for i in 8..10 {
                    scores[i] *= 0.5;
                }
            } else {
                scores[0] *= 100.0;
                for i in 1..3 {
                    scores[i] *= 3.0;
                }
                for i in 3..5 {
                    scores[i] *= 1.2;
                }
                for i in 5..7 {
                    scores[i] *= 0.3;
                }
                for i in 7..10 {
                    scores[i] *= 0.01;
                }
            }
        } else if hp_ratio <= 0.4 {
            let fear = (1.0 - hp_ratio) * 5.0;
            for i in 0..5 {
                scores[i] *= 1.0 + fear * 0.8;
            }
            for i in 5..7 {
                scores[i] *= 1.0 + fear * 0.3;
            }
            for i in 7..10 {
                scores[i] *= (1.0 - fear * 0.5).max(0.1);
            }
        } else if hp_ratio <= 0.6 {
            for i in 0..7 {
                scores[i] *= 1.5;
            }
            for i in 8..10 {
                scores[i] *= 0.7;
            }
        }
    }
}
