//! The tournament runner.
//!
//! Drives sets and rounds, resolves the winner-take-all scoring, applies
//! crash damage and eliminations, shifts the environment between sets, and
//! runs the HP-purchase phase. Everything stochastic draws from one seeded
//! generator, so a tournament is fully reproducible from its seed.

mod report;

use std::cmp::Reverse;

use rand::{Rng, SeedableRng, rngs::StdRng};

pub use report::{AgentSummary, SetStanding, SetSummary, TournamentReport};

use crate::agent::{Agent, RoundOutcome};
use crate::config::{GameConfig, GameRules};
use crate::environment::EnvironmentKind;
use crate::pressure::DecisionContext;
use crate::types::Action;

/// The environment currently in force: resolved multipliers plus the
/// adjusted rule tables the set is played under.
#[derive(Debug, Clone)]
struct ActiveEnvironment {
    kind: EnvironmentKind,
    risk_multiplier: f64,
    bonus_multiplier: f64,
    rules: GameRules,
}

impl ActiveEnvironment {
    fn base(rules: &GameRules) -> Self {
        Self {
            kind: EnvironmentKind::Normal,
            risk_multiplier: 1.0,
            bonus_multiplier: 1.0,
            rules: rules.clone(),
        }
    }
}

struct Entrant {
    idx: usize,
    ctx: DecisionContext,
    action: Action,
    crashed: bool,
}

/// Winner-take-all round resolution.
///
/// The highest surviving action takes the sum of all surviving actions
/// (split by integer division on a tie) plus its success bonus; surviving
/// losers pay their own action value; crashers pay the penalty multiple of
/// theirs. When everyone crashes, nobody moves.
pub(crate) fn resolve_round(entries: &[(Action, bool)], rules: &GameRules) -> Vec<i64> {
    let mut changes = vec![0i64; entries.len()];
    let survivors: Vec<Action> = entries
        .iter()
        .filter(|(_, crashed)| !crashed)
        .map(|(action, _)| *action)
        .collect();

    let Some(max_action) = survivors.iter().max() else {
        return changes;
    };
    let max_value = max_action.value();
    let total_points: i64 = survivors.iter().map(|a| i64::from(a.value())).sum();
    let winner_count = survivors.iter().filter(|a| a.value() == max_value).count() as i64;
    let winner_points = total_points / winner_count;

    for (change, (action, crashed)) in changes.iter_mut().zip(entries) {
        *change = if *crashed {
            (f64::from(action.value()) * rules.crash_penalty_multiplier) as i64
        } else if action.value() == max_value {
            winner_points + rules.success_bonus(*action)
        } else {
            -i64::from(action.value())
        };
    }
    changes
}

/// A full tournament: agents, environment state, and the seeded generator.
pub struct Tournament {
    config: GameConfig,
    agents: Vec<Agent>,
    environment: ActiveEnvironment,
    rng: StdRng,
    seed: u64,
}

impl Tournament {
    pub fn new(config: GameConfig, seed: u64) -> crate::Result<Self> {
        config.validate()?;
        let agents = config
            .agents
            .iter()
            .map(|profile| Agent::new(profile, &config))
            .collect();
        let environment = ActiveEnvironment::base(&config.rules);
        Ok(Self {
            config,
            agents,
            environment,
            rng: StdRng::seed_from_u64(seed),
            seed,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Play the whole tournament and return the report.
    pub fn run(&mut self) -> TournamentReport {
        let total_sets = self.config.tournament.sets;
        self.shift_environment(1);

        let mut sets = Vec::with_capacity(total_sets as usize);
        for set in 1..=total_sets {
            sets.push(self.play_set(set));
            if set < total_sets {
                for agent in &mut self.agents {
                    agent.reset_for_next_set();
                }
                self.shift_environment(set + 1);
                self.hp_purchase_phase();
            }
        }

        // Fold the last set into the totals before final standings.
        for agent in &mut self.agents {
            agent.reset_for_next_set();
        }
        self.build_report(sets)
    }

    /// Activate the scheduled environment for `set`: resolve its multipliers
    /// and rebuild the adjusted rule tables. Normal resets to the base
    /// tables. Agents recalibrate their action bands against the new rules.
    fn shift_environment(&mut self, set: u32) {
        let kind = self.config.tournament.environment_for_set(set);
        let (risk, bonus) = if kind == EnvironmentKind::Normal {
            (1.0, 1.0)
        } else {
            let modifier = self.config.tournament.modifier_for(kind);
            (
                modifier.risk_multiplier.resolve(&mut self.rng),
                modifier.bonus_multiplier.resolve(&mut self.rng),
            )
        };

        let mut rules = self.config.rules.clone();
        for probability in &mut rules.crash_probabilities {
            *probability = (*probability * risk).clamp(0.01, 0.95);
        }
        for success_bonus in &mut rules.success_bonuses {
            *success_bonus = (*success_bonus as f64 * bonus) as i64;
        }
        self.environment = ActiveEnvironment {
            kind,
            risk_multiplier: risk,
            bonus_multiplier: bonus,
            rules,
        };

        let rounds = self.config.tournament.rounds;
        for agent in &mut self.agents {
            agent.recalibrate(&self.environment.rules, rounds);
        }
    }

    fn play_set(&mut self, set: u32) -> SetSummary {
        let total_rounds = self.config.tournament.rounds;
        for round in 1..=total_rounds {
            self.play_round(set, round);
        }

        // End-of-set ranking: survivors by set score, then the eliminated.
        let mut alive: Vec<usize> = self.alive_indices();
        alive.sort_by_key(|&i| Reverse(self.agents[i].state().score));
        let mut dead: Vec<usize> = (0..self.agents.len())
            .filter(|&i| !self.agents[i].is_alive())
            .collect();
        dead.sort_by_key(|&i| Reverse(self.agents[i].state().score));

        let env_mult = self.environment.kind.bonus_multiplier();
        let mut standings = Vec::with_capacity(self.agents.len());
        for (pos, &idx) in alive.iter().chain(dead.iter()).enumerate() {
            let rank = pos + 1;
            let bonus = (self.config.tournament.rank_bonus(rank) as f64 * env_mult) as i64;
            self.agents[idx].finish_set(rank, bonus);
            let state = self.agents[idx].state();
            standings.push(SetStanding {
                rank,
                name: state.name.clone(),
                set_score: state.score,
                total_score: state.total_score,
                hp: state.hp,
                alive: state.alive,
                bonus,
            });
        }

        SetSummary {
            set,
            environment: self.environment.kind,
            risk_multiplier: self.environment.risk_multiplier,
            bonus_multiplier: self.environment.bonus_multiplier,
            standings,
        }
    }

    fn play_round(&mut self, set: u32, round: u32) {
        let total_rounds = self.config.tournament.rounds;
        let total_sets = self.config.tournament.sets;
        let alive = self.alive_indices();
        if alive.len() <= 1 {
            return;
        }

        // Set-local ranks among the living, overall ranks across everyone.
        let mut by_score = alive.clone();
        by_score.sort_by_key(|&i| Reverse(self.agents[i].state().score));
        let first_place_score = self.agents[by_score[0]].state().score;
        let mut set_rank = vec![0usize; self.agents.len()];
        for (pos, &i) in by_score.iter().enumerate() {
            set_rank[i] = pos + 1;
        }

        let mut by_total: Vec<usize> = (0..self.agents.len()).collect();
        by_total.sort_by_key(|&i| Reverse(self.agents[i].state().total_score));
        let overall_first = self.agents[by_total[0]].state().total_score;
        let overall_second = by_total
            .get(1)
            .map(|&i| self.agents[i].state().total_score)
            .unwrap_or(0);
        let mut overall_rank = vec![0usize; self.agents.len()];
        for (pos, &i) in by_total.iter().enumerate() {
            overall_rank[i] = pos + 1;
        }

        let env_mult = self.environment.kind.bonus_multiplier();
        let is_final_round = round == total_rounds;

        let mut entrants: Vec<Entrant> = Vec::with_capacity(alive.len());
        for &idx in &alive {
            let state = self.agents[idx].state();
            // The leader sees its margin over second place, negated.
            let overall_gap = if overall_rank[idx] == 1 {
                overall_second - state.total_score
            } else {
                overall_first - state.total_score
            };
            let ctx = DecisionContext {
                round,
                total_rounds,
                is_final_round,
                current_set: set,
                total_sets,
                set_rank: set_rank[idx],
                set_gap: first_place_score - state.score,
                overall_rank: overall_rank[idx],
                overall_gap,
                alive_count: alive.len(),
                env_bonus_multiplier: env_mult,
                hp: state.hp,
                total_score: state.total_score,
            };
            let action = self.agents[idx].decide(&ctx, &self.environment.rules, &mut self.rng);
            let crashed =
                self.rng.random::<f64>() < self.environment.rules.crash_probability(action);
            entrants.push(Entrant {
                idx,
                ctx,
                action,
                crashed,
            });
        }

        let entries: Vec<(Action, bool)> =
            entrants.iter().map(|e| (e.action, e.crashed)).collect();
        let changes = resolve_round(&entries, &self.environment.rules);

        let crash_hp_loss = self.environment.rules.crash_hp_loss;
        let last_stand_bonus = self.environment.rules.last_stand_bonus;
        for (entrant, &base) in entrants.iter().zip(&changes) {
            let agent = &mut self.agents[entrant.idx];
            let mut change = base;
            // Last stand: a positive round at HP 1 pays extra.
            if agent.state().hp == 1 && base > 0 {
                change += (base as f64 * last_stand_bonus) as i64;
            }
            let outcome = RoundOutcome {
                crashed: entrant.crashed,
                score_change: change,
                success: base > 0,
            };
            agent.apply_outcome(&outcome, &mut self.rng);
            if entrant.crashed {
                agent.take_crash_damage(crash_hp_loss, &entrant.ctx, entrant.action);
            }
        }

        // Reveal every committed action to every other entrant, including
        // agents eliminated this round.
        let revealed: Vec<(String, Action)> = entrants
            .iter()
            .map(|e| (self.agents[e.idx].name().to_string(), e.action))
            .collect();
        for &observer in &alive {
            for (name, action) in &revealed {
                if self.agents[observer].name() != name.as_str() {
                    self.agents[observer].observe_opponent(name, *action);
                }
            }
        }
    }

    /// Between-set HP purchases: refresh the overall standings, then let each
    /// survivor spend tournament points under the next set's environment.
    fn hp_purchase_phase(&mut self) {
        let mut by_total: Vec<usize> = (0..self.agents.len()).collect();
        by_total.sort_by_key(|&i| Reverse(self.agents[i].state().total_score));
        let top = self.agents[by_total[0]].state().total_score;
        for (pos, &idx) in by_total.iter().enumerate() {
            let gap = top - self.agents[idx].state().total_score;
            self.agents[idx].set_overall_standing(pos + 1, gap);
        }

        let cost = self.environment.rules.hp_purchase_cost;
        let next_env = self.environment.kind;
        for idx in 0..self.agents.len() {
            if !self.agents[idx].is_alive() {
                continue;
            }
            let count = self.agents[idx].plan_hp_purchase(&self.environment.rules, next_env);
            if count > 0 {
                self.agents[idx].buy_hp(count, cost);
            }
        }
    }

    fn alive_indices(&self) -> Vec<usize> {
        (0..self.agents.len())
            .filter(|&i| self.agents[i].is_alive())
            .collect()
    }

    fn build_report(&self, sets: Vec<SetSummary>) -> TournamentReport {
        let mut alive: Vec<usize> = self.alive_indices();
        alive.sort_by_key(|&i| Reverse(self.agents[i].state().total_score));
        let mut dead: Vec<usize> = (0..self.agents.len())
            .filter(|&i| !self.agents[i].is_alive())
            .collect();
        dead.sort_by_key(|&i| Reverse(self.agents[i].state().total_score));

        let mut standings = Vec::with_capacity(self.agents.len());
        for (pos, &idx) in alive.iter().chain(dead.iter()).enumerate() {
            let agent = &self.agents[idx];
            let state = agent.state();
            standings.push(AgentSummary {
                rank: pos + 1,
                name: state.name.clone(),
                total_score: state.total_score,
                hp: state.hp,
                alive: state.alive,
                set_ranks: state.set_ranks.clone(),
                jump_count: agent.learning().jump_count,
                inertia: agent.learning().inertia.values(),
                elimination: state.elimination.clone(),
            });
        }

        let champion = standings
            .first()
            .map(|summary| summary.name.clone())
            .unwrap_or_default();
        TournamentReport {
            seed: self.seed,
            champion,
            sets,
            standings,
        }
    }
}
