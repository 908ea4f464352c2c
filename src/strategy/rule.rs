//! Deterministic rule policies.
//!
//! Six fixed heuristics over the calibrated safe/push bands, interchangeable
//! with the adaptive strategy behind the same action-producing surface. No
//! learning happens here; a rule agent's decisions depend only on the
//! visible game state.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::GameRules;
use crate::strategy::bands::{ActionBands, risk_score};
use crate::types::Action;

/// The available rule policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// The environment's most reliable move, every round.
    Steady,
    /// Safe band when HP is thin, push/safe overlap when healthy.
    HpGuard,
    /// Safe early, push when trailing late in the set.
    SafeThenPush,
    /// Track the opponents' average choice plus one.
    CopycatPlusOne,
    /// Minimum crash probability above all else.
    AntiCrash,
    /// Safe all set, all-in on the final round when trailing.
    FinalGambler,
}

impl RuleKind {
    pub const ALL: [RuleKind; 6] = [
        RuleKind::Steady,
        RuleKind::HpGuard,
        RuleKind::SafeThenPush,
        RuleKind::CopycatPlusOne,
        RuleKind::AntiCrash,
        RuleKind::FinalGambler,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RuleKind::Steady => "steady",
            RuleKind::HpGuard => "hp_guard",
            RuleKind::SafeThenPush => "safe_then_push",
            RuleKind::CopycatPlusOne => "copycat_plus_one",
            RuleKind::AntiCrash => "anti_crash",
            RuleKind::FinalGambler => "final_gambler",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RuleKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.label() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| crate::Error::ParseRuleKind {
                input: s.to_string(),
                expected: "steady, hp_guard, safe_then_push, copycat_plus_one, anti_crash, \
                           final_gambler"
                    .to_string(),
            })
    }
}

/// Game-state slice a rule policy reads.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    pub round: u32,
    pub total_rounds: u32,
    pub is_final_round: bool,
    pub set_rank: usize,
    pub hp: u32,
    pub opponent_choices: &'a HashMap<String, Vec<Action>>,
}

/// A rule policy bound to calibrated bands.
#[derive(Debug, Clone)]
pub struct RuleStrategy {
    kind: RuleKind,
    bands: ActionBands,
}

impl RuleStrategy {
    pub fn new(kind: RuleKind, rules: &GameRules, total_rounds: u32) -> Self {
        Self {
            kind,
            bands: ActionBands::calibrate(rules, total_rounds),
        }
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    /// Recalibrate the bands after an environment shift rescales the rules.
    pub fn recalibrate(&mut self, rules: &GameRules, total_rounds: u32) {
        self.bands = ActionBands::calibrate(rules, total_rounds);
    }

    pub fn decide(&self, rules: &GameRules, input: &RuleInput<'_>) -> Action {
        // Remaining rounds including the current one.
        let rem = input.total_rounds - input.round + 1;
        let safest = |bands: &ActionBands| bands.safest(rules, rem, input.total_rounds, input.hp);

        match self.kind {
            RuleKind::Steady | RuleKind::AntiCrash => safest(&self.bands),
            RuleKind::HpGuard => {
                if input.hp <= 2 {
                    return safest(&self.bands);
                }
                let overlap = self.bands.push_safe_overlap();
                overlap
                    .into_iter()
                    .min_by(|a, b| {
                        risk_score(rules, *a, rem, input.total_rounds, input.hp)
                            .total_cmp(&risk_score(rules, *b, rem, input.total_rounds, input.hp))
                    })
                    .unwrap_or(Action::MIN)
            }
            RuleKind::SafeThenPush => {
                let trailing = input.set_rank > 1;
                if (input.is_final_round && trailing) || (rem <= 2 && trailing) {
                    self.bands.best_push(rules)
                } else {
                    safest(&self.bands)
                }
            }
            RuleKind::CopycatPlusOne => {
                let recent: Vec<u8> = input
                    .opponent_choices
                    .values()
                    .filter_map(|history| history.last())
                    .map(|action| action.value())
                    .collect();
                let target = if recent.is_empty() {
                    7.0
                } else {
                    let mean =
                        recent.iter().map(|&v| f64::from(v)).sum::<f64>() / recent.len() as f64;
                    (mean + 1.0).round().clamp(1.0, 10.0)
                };
                self.bands
                    .pool()
                    .into_iter()
                    .min_by(|a, b| {
                        let da = (f64::from(a.value()) - target).abs();
                        let db = (f64::from(b.value()) - target).abs();
                        da.total_cmp(&db).then_with(|| {
                            risk_score(rules, *a, rem, input.total_rounds, input.hp).total_cmp(
                                &risk_score(rules, *b, rem, input.total_rounds, input.hp),
                            )
                        })
                    })
                    .unwrap_or(Action::MIN)
            }
            RuleKind::FinalGambler => {
                if input.is_final_round && input.set_rank > 1 {
                    self.bands.best_push(rules)
                } else {
                    safest(&self.bands)
                }
            }
        }
    }
}
