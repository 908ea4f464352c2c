//! Pressure from approaching the point-of-no-return line.
//!
//! Once the overall gap exceeds everything the agent could still earn, the
//! tournament is mathematically lost. Proximity to that line produces
//! discrete pressure steps so the agent starts taking risks before the door
//! closes, thresholds measured in fractions of one average set's maximum
//! yield.

use crate::config::{GameRules, TournamentRules};
use crate::environment::EnvironmentKind;
use crate::pressure::reversal::{leader_set_bonus, max_points_per_round, set_gain_ceiling};
use crate::pressure::DecisionContext;

/// Conservative projection of a future set's bonus multiplier: only clearly
/// bonus-rich environments count, everything else reads as neutral.
fn projected_multiplier(kind: EnvironmentKind) -> f64 {
    match kind {
        EnvironmentKind::Deadly => 1.8,
        EnvironmentKind::Moderate => 1.3,
        EnvironmentKind::Mild => 1.1,
        _ => 1.0,
    }
}

fn average_future_multiplier(ctx: &DecisionContext, tournament: &TournamentRules) -> f64 {
    let future: Vec<f64> = (ctx.current_set + 1..=ctx.total_sets)
        .map(|set| projected_multiplier(tournament.environment_for_set(set)))
        .collect();
    if future.is_empty() {
        1.0
    } else {
        future.iter().sum::<f64>() / future.len() as f64
    }
}

/// Pressure from the margin left before the overall gap becomes
/// insurmountable: {5.0, 3.0, 2.0, 1.0, 0.0}.
pub fn elimination_line_pressure(
    ctx: &DecisionContext,
    rules: &GameRules,
    tournament: &TournamentRules,
) -> f64 {
    if ctx.total_sets <= 1 || ctx.overall_rank <= 1 || ctx.overall_gap <= 0 {
        return 0.0;
    }

    let avg_multiplier = average_future_multiplier(ctx, tournament);
    let avg_max_per_set = max_points_per_round(rules) * i64::from(ctx.total_rounds)
        + (tournament.rank_bonus(1) as f64 * avg_multiplier) as i64;

    let remaining_sets = i64::from(ctx.total_sets - ctx.current_set);
    let max_overall = avg_max_per_set * remaining_sets
        + set_gain_ceiling(ctx, rules)
        + leader_set_bonus(ctx, tournament);

    let margin = (max_overall - ctx.overall_gap) as f64;
    let per_set = avg_max_per_set as f64;

    if margin <= 0.0 {
        5.0
    } else if margin < per_set * 0.3 {
        3.0
    } else if margin < per_set * 0.7 {
        2.0
    } else if margin < per_set * 1.2 {
        1.0
    } else {
        0.0
    }
}
