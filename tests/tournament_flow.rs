//! Structural invariants that must hold for any seed.

use apex::{GameConfig, Tournament};

#[test]
fn test_structural_invariants_across_seeds() {
    let config = GameConfig::default_roster();
    let agents = config.agents.len();
    let sets = config.tournament.sets as usize;
    let max_hp = config.rules.max_hp;

    for seed in 0..20 {
        let report = Tournament::new(config.clone(), seed).unwrap().run();

        assert_eq!(report.standings.len(), agents);
        assert_eq!(report.sets.len(), sets);
        assert_eq!(report.champion, report.standings[0].name);

        for summary in &report.standings {
            assert!(summary.hp <= max_hp, "seed {seed}: HP above cap");
            // Everyone gets ranked every set, eliminated or not.
            assert_eq!(summary.set_ranks.len(), sets);

            if summary.alive {
                assert!(summary.elimination.is_none());
            } else {
                assert_eq!(summary.hp, 0);
                let record = summary
                    .elimination
                    .as_ref()
                    .expect("eliminated agent without a record");
                assert!(record.set >= 1 && record.set as usize <= sets);
                assert!(record.hp_before >= 1);
            }
        }

        for set in &report.sets {
            assert_eq!(set.standings.len(), agents);
            // Survivors are always ranked above the eliminated.
            let mut seen_dead = false;
            for line in &set.standings {
                if !line.alive {
                    seen_dead = true;
                } else {
                    assert!(!seen_dead, "seed {seed}: ranking order broken");
                }
            }
        }
    }
}

#[test]
fn test_two_agent_tournament_runs() {
    let mut config = GameConfig::default_roster();
    config.agents.truncate(2);
    let report = Tournament::new(config, 3).unwrap().run();
    assert_eq!(report.standings.len(), 2);
    assert!(!report.champion.is_empty());
}

#[test]
fn test_roster_of_one_is_rejected() {
    let mut config = GameConfig::default_roster();
    config.agents.truncate(1);
    assert!(Tournament::new(config, 0).is_err());
}
