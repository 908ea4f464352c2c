//! End-to-end properties of the pressure pipeline and the choice
//! distribution it drives.

use std::collections::HashMap;

use apex::config::{GameConfig, PersonalityWeights};
use apex::pressure::{DecisionContext, MeaningPressureCalculator, hp};
use apex::strategy::{AdaptiveStrategy, ChoiceInput};
use apex::types::{Action, ChoiceDistribution};

fn ctx() -> DecisionContext {
    DecisionContext {
        round: 3,
        total_rounds: 5,
        is_final_round: false,
        current_set: 3,
        total_sets: 5,
        set_rank: 4,
        set_gap: 12,
        overall_rank: 4,
        overall_gap: 25,
        alive_count: 6,
        env_bonus_multiplier: 1.3,
        hp: 3,
        total_score: 40,
    }
}

fn action(value: u8) -> Action {
    Action::new(value).unwrap()
}

#[test]
fn test_hp_fear_is_monotone_in_damage() {
    let mut last = -1.0;
    for hp in (1..=5).rev() {
        let fear = hp::hp_fear(hp, 5);
        assert!(fear > last, "fear did not rise as HP fell");
        last = fear;
    }
}

#[test]
fn test_pressure_rises_as_hp_falls() {
    let calc = MeaningPressureCalculator::new(&GameConfig::default_roster());
    let mut last = -1.0;
    for hp in (1..=5).rev() {
        let mut context = ctx();
        context.hp = hp;
        let pressure = calc.evaluate(&context).pressure;
        assert!(pressure >= last, "pressure fell when HP dropped to {hp}");
        last = pressure;
    }
}

#[test]
fn test_negligible_pressure_yields_ultra_safe_distribution() {
    let strategy = AdaptiveStrategy::new(
        PersonalityWeights::default(),
        None,
        &GameConfig::default_roster().rules,
        5,
    );
    let opponents = HashMap::new();
    let input = ChoiceInput {
        pressure: 0.05,
        temperature: 0.8,
        hp: 5,
        max_hp: 5,
        choice_history: &[],
        success_history: &[],
        opponent_choices: &opponents,
    };
    assert_eq!(strategy.distribution(&input), ChoiceDistribution::ULTRA_SAFE);
}

#[test]
fn test_high_pressure_shifts_mass_upward() {
    let strategy = AdaptiveStrategy::new(
        PersonalityWeights::default(),
        None,
        &GameConfig::default_roster().rules,
        5,
    );
    let opponents = HashMap::new();
    let base = ChoiceInput {
        pressure: 1.0,
        temperature: 0.8,
        hp: 5,
        max_hp: 5,
        choice_history: &[],
        success_history: &[],
        opponent_choices: &opponents,
    };
    let mut hot = base;
    hot.pressure = 6.0;
    let calm_mass = strategy.distribution(&base).mass(action(8), action(10));
    let hot_mass = strategy.distribution(&hot).mass(action(8), action(10));
    assert!(hot_mass > calm_mass);
}

#[test]
fn test_guaranteed_winner_holds_back_in_the_last_round() {
    let calc = MeaningPressureCalculator::new(&GameConfig::default_roster());
    let mut context = ctx();
    context.round = 5;
    context.is_final_round = true;
    context.current_set = 5;
    context.set_rank = 1;
    context.set_gap = 0;
    context.overall_rank = 1;
    context.overall_gap = -500;
    context.hp = 1;
    let trailing = calc.evaluate(&ctx()).pressure;
    let winning = calc.evaluate(&context).pressure;
    assert!(winning < trailing * 0.1);
}
