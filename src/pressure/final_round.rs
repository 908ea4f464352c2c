//! Final-round pressure adjustment.
//!
//! In the last round of a non-final set this is a straightforward urgency
//! boost. In the last round of the last set it becomes a decision table over
//! the agent's derived standing: pressure is dampened hard when holding rank
//! already locks the tournament, pushed up when only aggression can still
//! win, and redirected to score farming when victory is certain and the HP
//! buffer makes crashing harmless.

use serde::{Deserialize, Serialize};

use crate::config::{GameRules, TournamentRules};
use crate::pressure::DecisionContext;
use crate::types::ACTION_COUNT;

/// Standing verdict of the final-set final-round table, kept for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalVerdict {
    /// Holding the current rank already beats anything the overall leader
    /// can still reach.
    SecuredByHolding,
    /// The overall lead cannot be closed this round; defend the set rank.
    OverallOutOfReach,
    /// Holding the current rank earns enough to take the overall lead.
    SafeHoldWins,
    /// Only an aggressive push can still win the tournament.
    MustGamble,
    /// Overall win locked and enough HP to survive any remaining crash:
    /// free to farm score.
    MoneyMode,
    /// Overall leader under threat or without HP buffer: defend.
    DefendLead,
}

/// Result of the final-round adjustment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinalAdjustment {
    pub pressure: f64,
    pub verdict: Option<FinalVerdict>,
}

/// Apply the final-round branch to an already-aggregated pressure value.
///
/// `pressure` is the value produced by all other signals; the caller only
/// invokes this when `ctx.is_final_round` holds.
pub fn adjust(
    ctx: &DecisionContext,
    rules: &GameRules,
    tournament: &TournamentRules,
    pressure: f64,
) -> FinalAdjustment {
    if ctx.current_set != ctx.total_sets {
        // Ordinary set: finality boost plus desperation when trailing.
        let mut adjusted = pressure * tournament.final_round.finality_weight;
        if ctx.set_rank > 1 {
            adjusted += tournament.final_round.desperation_bonus * (ctx.set_rank as f64 - 1.0)
                + ctx.set_gap as f64 / 20.0;
        }
        return FinalAdjustment {
            pressure: adjusted,
            verdict: None,
        };
    }

    let max_points_this_round = ACTION_COUNT as f64 * ctx.env_bonus_multiplier;
    let best_set_bonus = (tournament.rank_bonus(1) as f64 * ctx.env_bonus_multiplier) as i64;
    let max_possible_gain = max_points_this_round as i64 + best_set_bonus;
    let own_rank_bonus = (tournament.rank_bonus(ctx.set_rank) as f64 * ctx.env_bonus_multiplier) as i64;

    if ctx.overall_gap > 0 {
        // Trailing overall.
        let points_needed = ctx.overall_gap + 1;
        let predicted_total_if_safe = ctx.total_score + own_rank_bonus;
        let estimated_leader_total = ctx.total_score + ctx.overall_gap;
        let estimated_leader_max = estimated_leader_total + max_possible_gain;

        if predicted_total_if_safe > estimated_leader_max {
            let factor = if ctx.set_rank == 1 { 0.02 } else { 0.1 };
            FinalAdjustment {
                pressure: pressure * factor,
                verdict: Some(FinalVerdict::SecuredByHolding),
            }
        } else if points_needed > max_possible_gain {
            let factor = if ctx.set_rank == 1 { 0.01 } else { 0.7 };
            FinalAdjustment {
                pressure: pressure * factor,
                verdict: Some(FinalVerdict::OverallOutOfReach),
            }
        } else {
            // Reachable: does holding rank suffice, or is a push required?
            let expected_safe_gain = if ctx.set_rank == 1 {
                // Leader holds with a minimal action; budget a small loss.
                own_rank_bonus - 2
            } else {
                (3.0 * ctx.env_bonus_multiplier) as i64 + own_rank_bonus
            };

            if expected_safe_gain >= points_needed {
                let factor = if ctx.set_rank == 1 { 0.05 } else { 0.3 };
                FinalAdjustment {
                    pressure: pressure * factor,
                    verdict: Some(FinalVerdict::SafeHoldWins),
                }
            } else {
                let mut adjusted = pressure * tournament.final_round.finality_weight;
                if ctx.set_rank > 1 {
                    adjusted += tournament.final_round.desperation_bonus
                        * (ctx.set_rank as f64 - 1.0)
                        + ctx.set_gap as f64 / 20.0;
                }
                FinalAdjustment {
                    pressure: adjusted,
                    verdict: Some(FinalVerdict::MustGamble),
                }
            }
        }
    } else {
        // Overall leader: gap is the (negative) margin over second place.
        let lead_over_second = if ctx.overall_gap < 0 {
            -ctx.overall_gap
        } else {
            0
        };
        let is_guaranteed_win = lead_over_second > max_possible_gain;

        let remaining_rounds = i64::from(ctx.total_rounds - ctx.round + 1)
            + i64::from(ctx.total_sets - ctx.current_set) * i64::from(ctx.total_rounds);
        let safe_hp_threshold = remaining_rounds * i64::from(rules.crash_hp_loss) + 1;
        let has_hp_buffer = i64::from(ctx.hp) >= safe_hp_threshold;

        if is_guaranteed_win && has_hp_buffer {
            FinalAdjustment {
                pressure: pressure * 1.5,
                verdict: Some(FinalVerdict::MoneyMode),
            }
        } else {
            let factor = if ctx.set_rank == 1 { 0.05 } else { 0.3 };
            FinalAdjustment {
                pressure: pressure * factor,
                verdict: Some(FinalVerdict::DefendLead),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn final_ctx() -> DecisionContext {
        DecisionContext {
            round: 5,
            total_rounds: 5,
            is_final_round: true,
            current_set: 5,
            total_sets: 5,
            set_rank: 1,
            set_gap: 0,
            overall_rank: 1,
            overall_gap: -100,
            alive_count: 4,
            env_bonus_multiplier: 1.8,
            hp: 3,
            total_score: 150,
        }
    }

    #[test]
    fn test_guaranteed_win_without_buffer_dampens_hard() {
        // Lead of 100 beats max_possible_gain (18 + 54 = 72) but HP 3 is
        // below the 1-round buffer threshold only if crash_hp_loss*rounds+1
        // exceeds it; with one round left threshold is 2, so HP 3 buffers.
        let ctx = final_ctx();
        let out = adjust(&ctx, &GameRules::default(), &TournamentRules::default(), 4.0);
        assert_eq!(out.verdict, Some(FinalVerdict::MoneyMode));
        assert_eq!(out.pressure, 6.0);
    }

    #[test]
    fn test_guaranteed_win_low_hp_goes_defensive() {
        let mut ctx = final_ctx();
        ctx.hp = 1;
        let out = adjust(&ctx, &GameRules::default(), &TournamentRules::default(), 4.0);
        assert_eq!(out.verdict, Some(FinalVerdict::DefendLead));
        assert!(out.pressure <= 4.0 * 0.05 + 1e-12);
    }

    #[test]
    fn test_threatened_lead_defends() {
        let mut ctx = final_ctx();
        ctx.overall_gap = -10;
        let out = adjust(&ctx, &GameRules::default(), &TournamentRules::default(), 4.0);
        assert_eq!(out.verdict, Some(FinalVerdict::DefendLead));
    }

    #[test]
    fn test_unreachable_leader_blocks_gambling() {
        let mut ctx = final_ctx();
        ctx.set_rank = 1;
        ctx.overall_rank = 3;
        ctx.overall_gap = 500;
        let out = adjust(&ctx, &GameRules::default(), &TournamentRules::default(), 4.0);
        assert_eq!(out.verdict, Some(FinalVerdict::OverallOutOfReach));
        assert!((out.pressure - 0.04).abs() < 1e-12);
    }

    #[test]
    fn test_close_gap_requires_gamble() {
        let mut ctx = final_ctx();
        ctx.set_rank = 4;
        ctx.set_gap = 30;
        ctx.overall_rank = 2;
        ctx.overall_gap = 40;
        let out = adjust(&ctx, &GameRules::default(), &TournamentRules::default(), 4.0);
        assert_eq!(out.verdict, Some(FinalVerdict::MustGamble));
        assert!(out.pressure > 4.0);
    }

    #[test]
    fn test_non_final_set_gets_finality_boost() {
        let mut ctx = final_ctx();
        ctx.current_set = 2;
        ctx.set_rank = 3;
        ctx.set_gap = 20;
        let out = adjust(&ctx, &GameRules::default(), &TournamentRules::default(), 2.0);
        assert!(out.verdict.is_none());
        // 2.0 * 2.0 + 1.0*2 + 20/20 = 7.0
        assert!((out.pressure - 7.0).abs() < 1e-12);
    }
}
