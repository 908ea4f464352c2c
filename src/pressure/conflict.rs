//! Multi-conflict superposition: three fears layered over one another.
//!
//! 1. Crash death — losing the last HP to a failed push.
//! 2. Defeat death — only the winner survives the tournament.
//! 3. Money attachment — reluctance to gamble accumulated score away.
//!
//! How the three combine depends on the agent's standing: four regimes with
//! fixed weight triples and an overall scale, an endgame amplifier when the
//! field has thinned to three, and an unconditional debt-despair term for
//! negative total scores.

use crate::pressure::hp::hp_fear;
use crate::pressure::DecisionContext;

/// Contribution of the conflict superposition to the aggregate pressure.
///
/// Applied as `pressure = (pressure + death_pressure) * endgame_multiplier
/// + endgame_bonus + debt_despair`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConflictContribution {
    pub death_pressure: f64,
    pub endgame_multiplier: f64,
    pub endgame_bonus: f64,
    pub debt_despair: f64,
}

/// Blend the three fears for the current standing.
pub fn superpose(ctx: &DecisionContext, max_hp: u32, reversal_impossibility: f64) -> ConflictContribution {
    let hp_ratio = f64::from(ctx.hp) / f64::from(max_hp.max(1));

    let is_winning = ctx.set_rank <= 2;
    let is_losing = ctx.set_rank >= 5;
    let (large_gap, very_large_gap) = if ctx.alive_count > 1 {
        (ctx.set_gap > 20, ctx.set_gap > 50)
    } else {
        (false, false)
    };

    let crash_fear = hp_fear(ctx.hp, max_hp);

    let defeat_fear = if is_losing || large_gap {
        let base = if very_large_gap { 2.0 } else { 1.2 };
        base + reversal_impossibility
    } else if is_winning && !large_gap {
        0.3
    } else {
        0.8
    };

    let money_attachment = if ctx.total_score > 0 {
        (ctx.total_score as f64 / 100.0).sqrt()
    } else {
        0.0
    };

    // Regime-dependent weighting: defensive when winning, desperate when
    // losing, torn in the middle.
    let death_pressure = if is_winning && !large_gap {
        (crash_fear * 1.5 + defeat_fear * 0.2 + money_attachment * 0.3) * 0.7
    } else if is_losing || very_large_gap {
        (crash_fear * 0.4 + defeat_fear * 1.5 + money_attachment * 0.15) * 1.1
    } else if large_gap && !is_losing {
        (crash_fear * 0.8 + defeat_fear * 1.8 + money_attachment * 0.4) * 1.2
    } else {
        crash_fear + defeat_fear + money_attachment * 0.3
    };

    let (endgame_multiplier, endgame_bonus) = if ctx.alive_count <= 3 {
        let base = (4 - ctx.alive_count) as f64 * 0.3;
        if is_winning && hp_ratio > 0.4 {
            (0.9, base * 1.2)
        } else if is_losing || hp_ratio <= 0.4 {
            (1.15, base * 2.0)
        } else {
            (1.0, base * 2.5)
        }
    } else {
        (1.0, 0.0)
    };

    let debt_despair = if ctx.total_score < 0 {
        ctx.total_score.unsigned_abs() as f64 / 50.0 * 2.0
    } else {
        0.0
    };

    ConflictContribution {
        death_pressure,
        endgame_multiplier,
        endgame_bonus,
        debt_despair,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> DecisionContext {
        DecisionContext {
            round: 2,
            total_rounds: 5,
            is_final_round: false,
            current_set: 1,
            total_sets: 5,
            set_rank: 3,
            set_gap: 5,
            overall_rank: 3,
            overall_gap: 5,
            alive_count: 7,
            env_bonus_multiplier: 0.9,
            hp: 3,
            total_score: 20,
        }
    }

    #[test]
    fn test_winning_regime_is_calmest() {
        let mut winning = ctx();
        winning.set_rank = 1;
        let mut losing = ctx();
        losing.set_rank = 7;
        let w = superpose(&winning, 5, 0.0);
        let l = superpose(&losing, 5, 0.0);
        assert!(w.death_pressure < l.death_pressure);
    }

    #[test]
    fn test_reversal_impossibility_deepens_despair() {
        let mut context = ctx();
        context.set_rank = 6;
        let possible = superpose(&context, 5, 0.0);
        let impossible = superpose(&context, 5, 2.0);
        assert!(impossible.death_pressure > possible.death_pressure);
    }

    #[test]
    fn test_endgame_only_below_four_alive() {
        let mut context = ctx();
        assert_eq!(superpose(&context, 5, 0.0).endgame_bonus, 0.0);
        context.alive_count = 3;
        assert!(superpose(&context, 5, 0.0).endgame_bonus > 0.0);
    }

    #[test]
    fn test_losing_endgame_amplifies() {
        let mut context = ctx();
        context.alive_count = 2;
        context.set_rank = 2;
        context.hp = 1;
        let contribution = superpose(&context, 5, 0.0);
        assert_eq!(contribution.endgame_multiplier, 1.15);
    }

    #[test]
    fn test_winning_endgame_dampens() {
        let mut context = ctx();
        context.alive_count = 2;
        context.set_rank = 1;
        context.hp = 4;
        let contribution = superpose(&context, 5, 0.0);
        assert_eq!(contribution.endgame_multiplier, 0.9);
    }

    #[test]
    fn test_debt_despair_scales_with_debt() {
        let mut context = ctx();
        context.total_score = -50;
        assert_eq!(superpose(&context, 5, 0.0).debt_despair, 2.0);
        context.total_score = -100;
        assert_eq!(superpose(&context, 5, 0.0).debt_despair, 4.0);
        context.total_score = 10;
        assert_eq!(superpose(&context, 5, 0.0).debt_despair, 0.0);
    }
}
