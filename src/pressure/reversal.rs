//! Reversal feasibility: can the agent still catch the leader?
//!
//! Computed separately within the current set and across the whole
//! tournament, each classified into ordered impossibility bands:
//! 0.5 (easily reversible), 1.0 (needs a full push), 1.5 (only with the
//! rank-bonus pool), 2.0 (mathematically impossible).

use crate::config::{GameRules, TournamentRules};
use crate::pressure::DecisionContext;
use crate::types::Action;

/// Winner bonus at the top action, the yardstick for per-round earning
/// potential in the feasibility math.
pub(crate) fn max_points_per_round(rules: &GameRules) -> i64 {
    rules.success_bonus(Action::MAX)
}

/// Ceiling on what this agent can still earn inside the current set,
/// including the last-stand bonus at HP 1.
pub(crate) fn set_gain_ceiling(ctx: &DecisionContext, rules: &GameRules) -> i64 {
    let last_stand = if ctx.hp == 1 {
        1.0 + rules.last_stand_bonus
    } else {
        1.0
    };
    (max_points_per_round(rules) as f64 * f64::from(ctx.remaining_rounds()) * last_stand) as i64
}

/// First-place set bonus under the current environment.
pub(crate) fn leader_set_bonus(ctx: &DecisionContext, tournament: &TournamentRules) -> i64 {
    (tournament.rank_bonus(1) as f64 * ctx.env_bonus_multiplier) as i64
}

/// Mean bonus multiplier over the sets still to come, read off the schedule.
fn future_bonus_multiplier(ctx: &DecisionContext, tournament: &TournamentRules) -> f64 {
    let future: Vec<f64> = (ctx.current_set + 1..=ctx.total_sets)
        .map(|set| tournament.environment_for_set(set).bonus_multiplier())
        .collect();
    if future.is_empty() {
        1.0
    } else {
        future.iter().sum::<f64>() / future.len() as f64
    }
}

/// Impossibility bands for the set-local and tournament-overall reversal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReversalOutlook {
    pub set_impossibility: f64,
    pub overall_impossibility: f64,
}

impl ReversalOutlook {
    /// A band of 1.5 or worse means the gap exceeds raw earning potential.
    pub fn set_reversal_possible(&self) -> bool {
        self.set_impossibility < 1.5
    }

    pub fn overall_reversal_possible(&self) -> bool {
        self.overall_impossibility < 1.5
    }

    /// The value the defeat-fear term consumes: the worse of the two bands,
    /// except a top-2 overall standing halves the set-local despair.
    pub fn combined(&self, ctx: &DecisionContext) -> f64 {
        if ctx.total_sets > 1 && ctx.overall_rank <= 2 {
            self.set_impossibility * 0.5
        } else {
            self.set_impossibility.max(self.overall_impossibility)
        }
    }
}

/// Classify both reversal feasibilities for the current context.
pub fn assess(
    ctx: &DecisionContext,
    rules: &GameRules,
    tournament: &TournamentRules,
) -> ReversalOutlook {
    let max_gain_in_set = set_gain_ceiling(ctx, rules);
    let max_set_bonus = leader_set_bonus(ctx, tournament);

    let set_impossibility = if ctx.set_rank > 1 && ctx.set_gap > 0 {
        if ctx.set_gap > max_gain_in_set + max_set_bonus {
            2.0
        } else if ctx.set_gap > max_gain_in_set {
            1.5
        } else if ctx.set_gap as f64 > max_gain_in_set as f64 * 0.5 {
            1.0
        } else {
            0.5
        }
    } else {
        0.0
    };

    let overall_impossibility =
        if ctx.total_sets > 1 && ctx.overall_rank > 1 && ctx.overall_gap > 0 {
            let remaining_sets = i64::from(ctx.total_sets - ctx.current_set);
            let future_set_bonus = (tournament.rank_bonus(1) as f64
                * future_bonus_multiplier(ctx, tournament)) as i64;
            let max_per_set =
                max_points_per_round(rules) * i64::from(ctx.total_rounds) + future_set_bonus;
            let max_overall = max_per_set * remaining_sets + max_gain_in_set + max_set_bonus;

            if ctx.overall_gap > max_overall {
                2.0
            } else if ctx.overall_gap as f64 > max_overall as f64 * 0.8 {
                1.5
            } else if ctx.overall_gap as f64 > max_overall as f64 * 0.5 {
                1.0
            } else {
                0.5
            }
        } else {
            0.0
        };

    ReversalOutlook {
        set_impossibility,
        overall_impossibility,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> DecisionContext {
        DecisionContext {
            round: 3,
            total_rounds: 5,
            is_final_round: false,
            current_set: 2,
            total_sets: 5,
            set_rank: 3,
            set_gap: 10,
            overall_rank: 3,
            overall_gap: 20,
            alive_count: 7,
            env_bonus_multiplier: 0.9,
            hp: 3,
            total_score: 40,
        }
    }

    #[test]
    fn test_small_gap_is_easily_reversible() {
        let outlook = assess(&ctx(), &GameRules::default(), &TournamentRules::default());
        assert_eq!(outlook.set_impossibility, 0.5);
        assert_eq!(outlook.overall_impossibility, 0.5);
        assert!(outlook.set_reversal_possible());
    }

    #[test]
    fn test_huge_gap_is_impossible() {
        let mut context = ctx();
        context.set_gap = 10_000;
        context.overall_gap = 10_000;
        let outlook = assess(&context, &GameRules::default(), &TournamentRules::default());
        assert_eq!(outlook.set_impossibility, 2.0);
        assert_eq!(outlook.overall_impossibility, 2.0);
        assert!(!outlook.overall_reversal_possible());
    }

    #[test]
    fn test_bands_are_monotone_in_gap() {
        let rules = GameRules::default();
        let tournament = TournamentRules::default();
        let mut last = 0.0;
        for gap in [1, 25, 45, 80, 10_000] {
            let mut context = ctx();
            context.set_gap = gap;
            let band = assess(&context, &rules, &tournament).set_impossibility;
            assert!(band >= last, "band fell from {last} to {band} at gap {gap}");
            last = band;
        }
    }

    #[test]
    fn test_top_two_overall_halves_set_despair() {
        let mut context = ctx();
        context.set_gap = 10_000;
        context.overall_rank = 2;
        let outlook = assess(&context, &GameRules::default(), &TournamentRules::default());
        assert_eq!(outlook.combined(&context), outlook.set_impossibility * 0.5);
    }

    #[test]
    fn test_last_stand_raises_ceiling() {
        let rules = GameRules::default();
        let mut context = ctx();
        let normal = set_gain_ceiling(&context, &rules);
        context.hp = 1;
        let last_stand = set_gain_ceiling(&context, &rules);
        assert!(last_stand > normal);
    }

    #[test]
    fn test_leader_has_zero_impossibility() {
        let mut context = ctx();
        context.set_rank = 1;
        context.set_gap = 0;
        context.overall_rank = 1;
        context.overall_gap = -15;
        let outlook = assess(&context, &GameRules::default(), &TournamentRules::default());
        assert_eq!(outlook.set_impossibility, 0.0);
        assert_eq!(outlook.overall_impossibility, 0.0);
    }
}
