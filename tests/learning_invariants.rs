//! Long-run invariants of the adaptation engine.

use apex::config::{LearningParams, PressureParams};
use apex::learning::{AdaptationEngine, LearningModifiers};
use apex::types::StrategyClass;
use rand::{Rng, SeedableRng, rngs::StdRng};

#[test]
fn test_invariants_hold_under_random_rewards() {
    let engine = AdaptationEngine::new(LearningParams::default());
    let thresholds = PressureParams::default();
    let modifiers = LearningModifiers::default();
    let mut state = engine.initial_state();
    let mut rng = StdRng::seed_from_u64(99);

    for _ in 0..5_000 {
        let pressure = rng.random_range(0.0..8.0);
        engine.choose_strategy(&mut state, pressure, &thresholds, &mut rng);
        let reward = rng.random_range(-60.0..60.0);
        engine.update(&mut state, reward, &modifiers, &mut rng);

        for class in StrategyClass::ALL {
            let kappa = state.inertia.get(class);
            assert!(kappa >= engine.params().kappa_min);
            assert!(kappa.is_finite());
        }
        assert!(state.energy >= 0.0);
        assert!(state.temperature >= engine.params().t_min);
        assert!(state.temperature <= engine.params().t_max);
    }
}

#[test]
fn test_consistent_winners_accumulate_inertia() {
    let engine = AdaptationEngine::new(LearningParams::default());
    let thresholds = PressureParams::default();
    let modifiers = LearningModifiers::default();
    let mut state = engine.initial_state();
    let mut rng = StdRng::seed_from_u64(5);

    // Rewarding every choice equally hard drives whichever class is picked
    // upward; the map mean must rise above its uniform start.
    let start = state.inertia.mean();
    for _ in 0..300 {
        engine.choose_strategy(&mut state, 2.0, &thresholds, &mut rng);
        engine.update(&mut state, 45.0, &modifiers, &mut rng);
    }
    assert!(state.inertia.mean() > start);
}

#[test]
fn test_volatile_rewards_trigger_jumps_eventually() {
    // Low threshold plus strong surprise accumulation makes jumps near
    // certain over a long horizon.
    let params = LearningParams {
        jump_threshold: 0.2,
        jump_base_rate: 5.0,
        alpha: 1.0,
        beta_e: 0.01,
        ..LearningParams::default()
    };
    let engine = AdaptationEngine::new(params);
    let thresholds = PressureParams::default();
    let modifiers = LearningModifiers::default();
    let mut state = engine.initial_state();
    let mut rng = StdRng::seed_from_u64(21);

    for round in 0..2_000 {
        engine.choose_strategy(&mut state, 4.0, &thresholds, &mut rng);
        let reward = if round % 2 == 0 { 200.0 } else { -200.0 };
        engine.update(&mut state, reward, &modifiers, &mut rng);
    }
    assert!(state.jump_count > 0, "no jump in 2000 volatile rounds");
}
