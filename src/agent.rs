//! A tournament participant.
//!
//! An agent bundles its visible game state (score, HP, histories), its
//! private learning state, and a decision policy. The tournament drives the
//! round loop and feeds standings in through [`DecisionContext`]; the agent
//! owns everything that persists across rounds and sets.

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{AgentProfile, GameConfig, GameRules, PolicyKind, PressureParams};
use crate::environment::EnvironmentKind;
use crate::learning::{AdaptationEngine, LearningModifiers, LearningState, UpdateReport};
use crate::pressure::{DecisionContext, MeaningPressureCalculator, PressureReading};
use crate::strategy::{AdaptiveStrategy, ChoiceInput, RuleInput, RuleStrategy};
use crate::types::Action;

/// What one resolved round did to this agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub crashed: bool,
    pub score_change: i64,
    /// Won the round (held the highest surviving action).
    pub success: bool,
}

/// Snapshot taken the moment an agent runs out of HP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EliminationRecord {
    pub set: u32,
    pub round: u32,
    /// The action that killed them.
    pub action: Action,
    pub hp_before: u32,
    pub set_rank: usize,
    pub set_score: i64,
    pub set_gap: i64,
    pub overall_rank: usize,
    pub overall_gap: i64,
    pub set_reversal_possible: bool,
    pub overall_reversal_possible: bool,
}

/// Publicly visible agent state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentState {
    pub name: String,
    /// Set-local score, folded into `total_score` between sets.
    pub score: i64,
    pub total_score: i64,
    pub hp: u32,
    pub alive: bool,
    pub choice_history: Vec<Action>,
    pub success_history: Vec<bool>,
    /// Observed opponent choices by name, in round order.
    pub opponent_choices: HashMap<String, Vec<Action>>,
    /// End-of-set rank per completed set.
    pub set_ranks: Vec<usize>,
    pub elimination: Option<EliminationRecord>,
    /// Standing after the most recent between-set ranking.
    pub overall_rank: Option<usize>,
    pub overall_gap: Option<i64>,
}

impl AgentState {
    fn new(name: String, starting_hp: u32) -> Self {
        Self {
            name,
            score: 0,
            total_score: 0,
            hp: starting_hp,
            alive: true,
            choice_history: Vec::new(),
            success_history: Vec::new(),
            opponent_choices: HashMap::new(),
            set_ranks: Vec::new(),
            elimination: None,
            overall_rank: None,
            overall_gap: None,
        }
    }
}

#[derive(Debug, Clone)]
enum Policy {
    Adaptive(AdaptiveStrategy),
    Rule(RuleStrategy),
}

/// One participant: state, learning, policy, and its pressure evaluator.
#[derive(Debug, Clone)]
pub struct Agent {
    state: AgentState,
    learning: LearningState,
    engine: AdaptationEngine,
    policy: Policy,
    calculator: MeaningPressureCalculator,
    pressure_params: PressureParams,
    modifiers: LearningModifiers,
    last_reading: Option<PressureReading>,
}

impl Agent {
    pub fn new(profile: &AgentProfile, config: &GameConfig) -> Self {
        let mut params = config.learning.clone();
        if let Some(kappa) = profile.kappa_init {
            params.kappa_init = kappa;
        }
        if let Some(threshold) = profile.jump_threshold {
            params.jump_threshold = threshold;
        }
        if let Some(t_base) = profile.t_base {
            params.t_base = t_base;
        }
        let engine = AdaptationEngine::new(params);
        let learning = engine.initial_state();

        let policy = match profile.policy {
            PolicyKind::Adaptive => Policy::Adaptive(AdaptiveStrategy::new(
                profile.weights.clone(),
                profile
                    .opponent_analysis
                    .then(|| config.opponent_analysis.clone()),
                &config.rules,
                config.tournament.rounds,
            )),
            PolicyKind::Rule { rule } => {
                Policy::Rule(RuleStrategy::new(rule, &config.rules, config.tournament.rounds))
            }
        };

        Self {
            state: AgentState::new(profile.name.clone(), config.rules.starting_hp),
            learning,
            engine,
            policy,
            calculator: MeaningPressureCalculator::new(config),
            pressure_params: config.pressure.clone(),
            modifiers: LearningModifiers::from(&profile.weights),
            last_reading: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.state.name
    }

    pub fn state(&self) -> &AgentState {
        &self.state
    }

    pub fn learning(&self) -> &LearningState {
        &self.learning
    }

    pub fn last_reading(&self) -> Option<&PressureReading> {
        self.last_reading.as_ref()
    }

    pub fn is_alive(&self) -> bool {
        self.state.alive
    }

    /// Commit to an action for this round.
    ///
    /// Adaptive agents evaluate pressure, pick a strategy class, and sample
    /// from the shaped choice distribution; rule agents map game state
    /// straight to an action. `rules` carries the environment-adjusted
    /// tables for the current set.
    pub fn decide<R: Rng + ?Sized>(
        &mut self,
        ctx: &DecisionContext,
        rules: &GameRules,
        rng: &mut R,
    ) -> Action {
        let reading = self.calculator.evaluate_under(ctx, rules);
        self.last_reading = Some(reading);

        let action = match &self.policy {
            Policy::Adaptive(strategy) => {
                self.engine.choose_strategy(
                    &mut self.learning,
                    reading.pressure,
                    &self.pressure_params,
                    rng,
                );
                let input = ChoiceInput {
                    pressure: reading.pressure,
                    temperature: self.learning.temperature,
                    hp: self.state.hp,
                    max_hp: rules.max_hp,
                    choice_history: &self.state.choice_history,
                    success_history: &self.state.success_history,
                    opponent_choices: &self.state.opponent_choices,
                };
                strategy.distribution(&input).sample(rng)
            }
            Policy::Rule(strategy) => {
                let input = RuleInput {
                    round: ctx.round,
                    total_rounds: ctx.total_rounds,
                    is_final_round: ctx.is_final_round,
                    set_rank: ctx.set_rank,
                    hp: self.state.hp,
                    opponent_choices: &self.state.opponent_choices,
                };
                strategy.decide(rules, &input)
            }
        };

        self.state.choice_history.push(action);
        action
    }

    /// Record an opponent's revealed choice.
    pub fn observe_opponent(&mut self, name: &str, action: Action) {
        self.state
            .opponent_choices
            .entry(name.to_string())
            .or_default()
            .push(action);
    }

    /// Fold a resolved round into score, history, and learning.
    ///
    /// For rule agents the learning update is a no-op (no strategy class is
    /// ever selected).
    pub fn apply_outcome<R: Rng + ?Sized>(
        &mut self,
        outcome: &RoundOutcome,
        rng: &mut R,
    ) -> UpdateReport {
        self.state.score += outcome.score_change;
        self.state.success_history.push(outcome.success);
        self.engine.update(
            &mut self.learning,
            outcome.score_change as f64,
            &self.modifiers,
            rng,
        )
    }

    /// Apply crash damage; returns `true` when this crash eliminates the
    /// agent. The elimination snapshot is taken once, from the standing the
    /// agent decided under.
    pub fn take_crash_damage(
        &mut self,
        hp_loss: u32,
        ctx: &DecisionContext,
        action: Action,
    ) -> bool {
        let hp_before = self.state.hp;
        self.state.hp = self.state.hp.saturating_sub(hp_loss);
        if self.state.hp > 0 || !self.state.alive {
            return false;
        }

        self.state.alive = false;
        let (set_possible, overall_possible) = self
            .last_reading
            .map(|r| (r.set_reversal_possible, r.overall_reversal_possible))
            .unwrap_or((true, true));
        self.state.elimination = Some(EliminationRecord {
            set: ctx.current_set,
            round: ctx.round,
            action,
            hp_before,
            set_rank: ctx.set_rank,
            set_score: self.state.score,
            set_gap: ctx.set_gap,
            overall_rank: ctx.overall_rank,
            overall_gap: ctx.overall_gap,
            set_reversal_possible: set_possible,
            overall_reversal_possible: overall_possible,
        });
        true
    }

    /// Record the end-of-set rank and pay the (environment-scaled) bonus
    /// into the tournament total.
    pub fn finish_set(&mut self, rank: usize, bonus: i64) {
        self.state.set_ranks.push(rank);
        self.state.total_score += bonus;
    }

    /// Fold the set score into the total and cool the temperature back to
    /// base. Learned inertia persists across sets.
    pub fn reset_for_next_set(&mut self) {
        self.state.total_score += self.state.score;
        self.state.score = 0;
        self.learning.reset_temperature(self.engine.params().t_base);
    }

    /// Update the between-set overall standing.
    pub fn set_overall_standing(&mut self, rank: usize, gap: i64) {
        self.state.overall_rank = Some(rank);
        self.state.overall_gap = Some(gap);
    }

    /// Recalibrate the policy's action bands after an environment shift.
    pub fn recalibrate(&mut self, rules: &GameRules, total_rounds: u32) {
        match &mut self.policy {
            Policy::Adaptive(strategy) => strategy.recalibrate(rules, total_rounds),
            Policy::Rule(strategy) => strategy.recalibrate(rules, total_rounds),
        }
    }

    /// Decide how many HP to buy before the next set.
    ///
    /// Deterministic coherence judgment: survival, environment-threat,
    /// reversal, and resource pressures are blended through the agent's
    /// inertia profile and compared against inertia-scaled tiers. At HP 1
    /// the last-stand bonus makes point-chasing more attractive, shrinking
    /// the effective gap and damping the reversal term.
    pub fn plan_hp_purchase(&self, rules: &GameRules, next_env: EnvironmentKind) -> u32 {
        let cost = rules.hp_purchase_cost;
        let max_affordable = if self.state.total_score > 0 {
            (self.state.total_score / cost) as u32
        } else {
            0
        };
        let max_needed = rules.max_hp.saturating_sub(self.state.hp);
        let max_purchasable = max_affordable.min(max_needed);
        if max_purchasable == 0 {
            return 0;
        }

        let hp_ratio = f64::from(self.state.hp) / f64::from(rules.max_hp.max(1));
        let survival_pressure = (1.0 - hp_ratio).powi(2);
        let env_risk_pressure = next_env.threat_level();

        let last_stand_factor = if self.state.hp == 1 { 1.3 } else { 1.0 };
        let reversal_pressure = if !self.state.alive {
            1.0
        } else if let Some(rank) = self.state.overall_rank {
            let gap = self.state.overall_gap.unwrap_or(0) as f64;
            let gap_factor = ((gap / last_stand_factor) / 100.0).min(1.0);
            if rank == 1 {
                -0.5 * (1.0 - gap_factor)
            } else if rank <= 3 {
                let base = -0.8 * (1.0 - gap_factor);
                if self.state.hp == 1 { base * 1.3 } else { base }
            } else if rank <= 5 {
                -0.3 * (1.0 - gap_factor)
            } else {
                0.5 * gap_factor
            }
        } else {
            0.0
        };

        let resource_ratio = (self.state.total_score as f64 / (cost as f64 * 3.0)).min(1.0);
        let resource_pressure = 1.0 - resource_ratio;

        let avg_kappa = self.learning.inertia.mean();
        let conservative = 1.0 - avg_kappa;
        let aggressive = avg_kappa;
        let energy_factor = self.learning.energy.min(1.0);

        let total_pressure = survival_pressure * (1.0 + conservative * 0.5)
            + env_risk_pressure * (1.0 + conservative * 0.3)
            + reversal_pressure * aggressive
            + resource_pressure * 0.5
            - energy_factor * 0.2;

        let mut count = if total_pressure > avg_kappa * 2.5 {
            max_purchasable
        } else if total_pressure > avg_kappa * 1.5 {
            ((max_purchasable + 1) / 2).max(1)
        } else if total_pressure > avg_kappa * 0.8 {
            1
        } else {
            0
        };

        // At HP 1 heading into a deadly set, never skip the purchase.
        if self.state.hp == 1 && next_env == EnvironmentKind::Deadly && count == 0 {
            count = 1;
        }
        count
    }

    /// Execute a planned purchase.
    pub fn buy_hp(&mut self, count: u32, cost: i64) {
        self.state.total_score -= i64::from(count) * cost;
        self.state.hp += count;
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::config::GameConfig;

    fn config() -> GameConfig {
        GameConfig::default_roster()
    }

    fn agent(index: usize) -> Agent {
        let cfg = config();
        Agent::new(&cfg.agents[index], &cfg)
    }

    fn ctx() -> DecisionContext {
        DecisionContext {
            round: 2,
            total_rounds: 5,
            is_final_round: false,
            current_set: 1,
            total_sets: 5,
            set_rank: 3,
            set_gap: 10,
            overall_rank: 3,
            overall_gap: 10,
            alive_count: 7,
            env_bonus_multiplier: 0.9,
            hp: 3,
            total_score: 0,
        }
    }

    fn action(value: u8) -> Action {
        Action::new(value).unwrap()
    }

    #[test]
    fn test_decide_records_own_choice() {
        let cfg = config();
        let mut a = agent(0);
        let mut rng = StdRng::seed_from_u64(1);
        let chosen = a.decide(&ctx(), &cfg.rules, &mut rng);
        assert_eq!(a.state().choice_history, vec![chosen]);
        assert!(a.last_reading().is_some());
    }

    #[test]
    fn test_rule_agent_never_learns() {
        let cfg = config();
        // "Steady" is the rule-follower in the stock roster.
        let mut a = Agent::new(&cfg.agents[6], &cfg);
        let mut rng = StdRng::seed_from_u64(2);
        a.decide(&ctx(), &cfg.rules, &mut rng);
        let report = a.apply_outcome(
            &RoundOutcome {
                crashed: false,
                score_change: 25,
                success: true,
            },
            &mut rng,
        );
        assert_eq!(report, UpdateReport::default());
        assert_eq!(a.learning().inertia.values(), [cfg.learning.kappa_init; 3]);
    }

    #[test]
    fn test_crash_to_zero_hp_eliminates_once() {
        let cfg = config();
        let mut a = agent(1);
        let mut rng = StdRng::seed_from_u64(3);
        a.decide(&ctx(), &cfg.rules, &mut rng);
        assert!(!a.take_crash_damage(1, &ctx(), action(9)));
        assert!(!a.take_crash_damage(1, &ctx(), action(9)));
        assert!(a.take_crash_damage(1, &ctx(), action(9)));
        assert!(!a.is_alive());
        let record = a.state().elimination.as_ref().unwrap();
        assert_eq!(record.hp_before, 1);
        assert_eq!(record.action, action(9));
        // A second call must not overwrite the snapshot.
        assert!(!a.take_crash_damage(1, &ctx(), action(2)));
        assert_eq!(a.state().elimination.as_ref().unwrap().action, action(9));
    }

    #[test]
    fn test_set_reset_banks_score_and_cools_temperature() {
        let cfg = config();
        let mut a = agent(2);
        let mut rng = StdRng::seed_from_u64(4);
        a.decide(&ctx(), &cfg.rules, &mut rng);
        a.apply_outcome(
            &RoundOutcome {
                crashed: false,
                score_change: 12,
                success: true,
            },
            &mut rng,
        );
        a.finish_set(2, 18);
        a.reset_for_next_set();
        assert_eq!(a.state().score, 0);
        assert_eq!(a.state().total_score, 30);
        assert_eq!(a.state().set_ranks, vec![2]);
        let t_base = cfg.agents[2].t_base.unwrap();
        assert!((a.learning().temperature - t_base).abs() < 1e-12);
    }

    #[test]
    fn test_hp_purchase_respects_funds_and_cap() {
        let cfg = config();
        let mut broke = agent(0);
        broke.state.total_score = 5;
        broke.state.hp = 1;
        assert_eq!(broke.plan_hp_purchase(&cfg.rules, EnvironmentKind::Deadly), 0);

        let mut full = agent(0);
        full.state.total_score = 500;
        full.state.hp = cfg.rules.max_hp;
        assert_eq!(full.plan_hp_purchase(&cfg.rules, EnvironmentKind::Deadly), 0);
    }

    #[test]
    fn test_dying_agent_buys_before_deadly_set() {
        let cfg = config();
        let mut a = agent(0);
        a.state.total_score = 200;
        a.state.hp = 1;
        a.set_overall_standing(6, 120);
        let count = a.plan_hp_purchase(&cfg.rules, EnvironmentKind::Deadly);
        assert!(count >= 1);
    }

    #[test]
    fn test_leader_with_buffer_skips_purchase() {
        let cfg = config();
        let mut a = agent(0);
        a.state.total_score = 200;
        a.state.hp = 4;
        a.set_overall_standing(1, -80);
        assert_eq!(a.plan_hp_purchase(&cfg.rules, EnvironmentKind::Safe), 0);
    }

    #[test]
    fn test_buy_hp_pays_from_total() {
        let cfg = config();
        let mut a = agent(3);
        a.state.total_score = 100;
        a.state.hp = 2;
        a.buy_hp(2, cfg.rules.hp_purchase_cost);
        assert_eq!(a.state().hp, 4);
        assert_eq!(a.state().total_score, 70);
    }
}
