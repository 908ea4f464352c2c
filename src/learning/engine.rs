//! The adaptation engine: strategy selection and coherence learning.
//!
//! Per round the engine runs two phases. `choose_strategy` reweights a copy
//! of the inertia map by the current pressure band and samples a class
//! through a temperature softmax. After the outcome lands, `update` turns
//! the realized reward into resistance-penalized work, moves the chosen
//! class's inertia, decays the rest, accumulates surprise into the energy
//! reservoir, re-derives the temperature, and finally rolls the stochastic
//! regime jump.

use rand::Rng;

use crate::config::{LearningParams, PersonalityWeights, PressureParams};
use crate::learning::state::LearningState;
use crate::types::StrategyClass;
use crate::utils;

/// Per-agent multipliers applied on top of the shared learning parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LearningModifiers {
    pub learning_speed: f64,
    pub pressure_sensitivity: f64,
    pub temperature_sensitivity: f64,
    pub jump_threshold_modifier: f64,
}

impl Default for LearningModifiers {
    fn default() -> Self {
        Self {
            learning_speed: 1.0,
            pressure_sensitivity: 1.0,
            temperature_sensitivity: 1.0,
            jump_threshold_modifier: 1.0,
        }
    }
}

impl From<&PersonalityWeights> for LearningModifiers {
    fn from(weights: &PersonalityWeights) -> Self {
        Self {
            learning_speed: weights.learning_speed,
            pressure_sensitivity: weights.pressure_sensitivity,
            temperature_sensitivity: weights.temperature_sensitivity,
            jump_threshold_modifier: weights.jump_threshold_modifier,
        }
    }
}

/// What a single `update` did, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UpdateReport {
    pub jumped: bool,
    /// Resistance-penalized work applied to the chosen class.
    pub work: f64,
    /// Gap between realized and expected normalized reward.
    pub surprise: f64,
}

/// Stateless computation core; all mutable state lives in [`LearningState`].
#[derive(Debug, Clone)]
pub struct AdaptationEngine {
    params: LearningParams,
}

impl AdaptationEngine {
    pub fn new(params: LearningParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &LearningParams {
        &self.params
    }

    pub fn initial_state(&self) -> LearningState {
        LearningState::new(self.params.kappa_init, self.params.t_base)
    }

    /// Select a strategy class for the given pressure and record it as
    /// `last_strategy`.
    pub fn choose_strategy<R: Rng + ?Sized>(
        &self,
        state: &mut LearningState,
        pressure: f64,
        thresholds: &PressureParams,
        rng: &mut R,
    ) -> StrategyClass {
        let mut weighted = state.inertia.values();
        let multipliers = if pressure > thresholds.high_threshold {
            // High pressure: push toward risk.
            Some([0.5, 1.3, 1.8])
        } else if pressure > thresholds.medium_threshold {
            Some([0.8, 1.2, 1.3])
        } else if pressure < thresholds.low_threshold {
            // Low pressure: retreat to safety.
            Some([2.0, 0.8, 0.4])
        } else {
            None
        };
        if let Some(factors) = multipliers {
            for (value, factor) in weighted.iter_mut().zip(factors) {
                *value *= factor;
            }
        }

        let probabilities = utils::softmax(&weighted, state.temperature);
        let index = utils::sample_categorical(rng, &probabilities);
        let chosen = StrategyClass::ALL[index];
        state.last_strategy = Some(chosen);
        chosen
    }

    /// Fold the realized reward into the learning state.
    ///
    /// No-op when no strategy has been chosen yet.
    pub fn update<R: Rng + ?Sized>(
        &self,
        state: &mut LearningState,
        reward: f64,
        modifiers: &LearningModifiers,
        rng: &mut R,
    ) -> UpdateReport {
        let Some(chosen) = state.last_strategy else {
            return UpdateReport::default();
        };
        let p = &self.params;

        let normalized = (reward / 50.0).tanh();
        let work = normalized - p.rho * normalized * normalized;

        let kappa_before = state.inertia.get(chosen);
        let dk = p.eta * work * modifiers.learning_speed
            - p.lambda_forget * (kappa_before - p.kappa_min);
        state
            .inertia
            .set(chosen, (kappa_before + dk).max(p.kappa_min));

        for class in StrategyClass::ALL {
            if class != chosen {
                let value = state.inertia.get(class);
                let decayed = value - p.lambda_forget_other * (value - p.kappa_min);
                state.inertia.set(class, decayed.max(p.kappa_min));
            }
        }

        // Surprise is measured against the pre-update confidence.
        let expected = kappa_before.tanh();
        let surprise = (normalized - expected).abs();
        let de = p.alpha * surprise.max(0.0) * modifiers.pressure_sensitivity
            - p.beta_e * state.energy;
        state.energy = (state.energy + de).max(0.0);

        self.update_temperature(state, modifiers);
        let jumped = self.check_jump(state, modifiers, rng);
        if jumped {
            state.jump_count += 1;
        }

        UpdateReport {
            jumped,
            work,
            surprise,
        }
    }

    /// `T = T_base + c1*E + c2*(1 - normalized inertia entropy)`, clamped.
    fn update_temperature(&self, state: &mut LearningState, modifiers: &LearningModifiers) {
        let p = &self.params;
        let entropy = utils::normalized_entropy(&state.inertia.values());
        let c1 = p.c1 * modifiers.temperature_sensitivity;
        let t = p.t_base + c1 * state.energy + p.c2 * (1.0 - entropy);
        state.temperature = t.clamp(p.t_min, p.t_max);
    }

    /// Poisson-hazard regime jump: fires with probability `1 - exp(-h)` when
    /// energy exceeds the inertia-raised threshold; a jump drains the energy
    /// reservoir and heats the temperature by half.
    fn check_jump<R: Rng + ?Sized>(
        &self,
        state: &mut LearningState,
        modifiers: &LearningModifiers,
        rng: &mut R,
    ) -> bool {
        let p = &self.params;
        let kappa_mean = state.inertia.mean();
        let theta = p.jump_threshold * modifiers.jump_threshold_modifier + 0.5 * kappa_mean;

        if state.energy <= theta {
            return false;
        }

        let hazard = p.jump_base_rate
            * ((state.energy - theta) / p.jump_gamma).exp()
            * (-kappa_mean * 2.0).exp();
        let probability = 1.0 - (-hazard).exp();

        if rng.random::<f64>() < probability {
            state.energy = 0.0;
            state.temperature = (state.temperature * 1.5).min(p.t_max);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::config::LearningParams;

    fn engine() -> AdaptationEngine {
        AdaptationEngine::new(LearningParams::default())
    }

    fn thresholds() -> PressureParams {
        PressureParams::default()
    }

    #[test]
    fn test_update_without_choice_is_noop() {
        let eng = engine();
        let mut state = eng.initial_state();
        let before = state.clone();
        let mut rng = StdRng::seed_from_u64(1);
        let report = eng.update(&mut state, 50.0, &LearningModifiers::default(), &mut rng);
        assert!(!report.jumped);
        assert_eq!(state.inertia.values(), before.inertia.values());
        assert_eq!(state.energy, before.energy);
    }

    #[test]
    fn test_inertia_never_below_floor() {
        let eng = engine();
        let mut state = eng.initial_state();
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..500 {
            eng.choose_strategy(&mut state, 4.0, &thresholds(), &mut rng);
            eng.update(&mut state, -1_000.0, &LearningModifiers::default(), &mut rng);
            for class in StrategyClass::ALL {
                assert!(state.inertia.get(class) >= eng.params().kappa_min);
            }
        }
    }

    #[test]
    fn test_energy_never_negative() {
        let eng = engine();
        let mut state = eng.initial_state();
        let mut rng = StdRng::seed_from_u64(3);
        for round in 0..200 {
            eng.choose_strategy(&mut state, 2.0, &thresholds(), &mut rng);
            let reward = if round % 2 == 0 { 30.0 } else { -30.0 };
            eng.update(&mut state, reward, &LearningModifiers::default(), &mut rng);
            assert!(state.energy >= 0.0);
        }
    }

    #[test]
    fn test_temperature_stays_in_bounds() {
        let eng = engine();
        let mut state = eng.initial_state();
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..300 {
            eng.choose_strategy(&mut state, 6.0, &thresholds(), &mut rng);
            eng.update(&mut state, 200.0, &LearningModifiers::default(), &mut rng);
            assert!(state.temperature >= eng.params().t_min);
            assert!(state.temperature <= eng.params().t_max);
        }
    }

    #[test]
    fn test_jump_resets_energy_and_counts() {
        // Force the hazard to certainty: zero threshold, huge base rate.
        let params = LearningParams {
            jump_threshold: 0.0,
            jump_base_rate: 1_000.0,
            ..LearningParams::default()
        };
        let eng = AdaptationEngine::new(params);
        let mut state = eng.initial_state();
        state.energy = 10.0;
        state.last_strategy = Some(StrategyClass::MediumRisk);
        let mut rng = StdRng::seed_from_u64(5);
        let report = eng.update(&mut state, 40.0, &LearningModifiers::default(), &mut rng);
        assert!(report.jumped);
        assert_eq!(state.energy, 0.0);
        assert_eq!(state.jump_count, 1);
    }

    #[test]
    fn test_zero_reward_decays_toward_floor() {
        let eng = engine();
        let mut state = eng.initial_state();
        state.inertia.set(StrategyClass::LowRisk, 1.5);
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..2_000 {
            state.last_strategy = Some(StrategyClass::LowRisk);
            eng.update(&mut state, 0.0, &LearningModifiers::default(), &mut rng);
        }
        let settled = state.inertia.get(StrategyClass::LowRisk);
        assert!(
            (settled - eng.params().kappa_min).abs() < 0.01,
            "inertia settled at {settled}"
        );
    }

    #[test]
    fn test_high_pressure_prefers_high_risk() {
        let eng = engine();
        let mut rng = StdRng::seed_from_u64(7);
        let mut state = eng.initial_state();
        // Cold temperature makes the band reweighting near-deterministic.
        state.temperature = 0.5;
        state.inertia.set(StrategyClass::HighRisk, 0.6);
        let mut high_risk = 0;
        for _ in 0..500 {
            if eng.choose_strategy(&mut state, 8.0, &thresholds(), &mut rng)
                == StrategyClass::HighRisk
            {
                high_risk += 1;
            }
        }
        assert!(high_risk > 300, "high-risk chosen {high_risk}/500");
    }

    #[test]
    fn test_positive_reward_grows_chosen_inertia() {
        let eng = engine();
        let mut state = eng.initial_state();
        state.last_strategy = Some(StrategyClass::MediumRisk);
        let before = state.inertia.get(StrategyClass::MediumRisk);
        let mut rng = StdRng::seed_from_u64(8);
        eng.update(&mut state, 40.0, &LearningModifiers::default(), &mut rng);
        assert!(state.inertia.get(StrategyClass::MediumRisk) > before);
    }
}
