//! Property-based тесты инвариантов здоровья и терминального состояния

use std::sync::Arc;

use bevy::prelude::*;
use enemy_simulation::*;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Шаг сценария: тик с целью в точке (x, z) или урон
#[derive(Debug, Clone)]
enum Step {
    Tick { x: f32, z: f32 },
    TickWithoutTarget,
    Damage(u32),
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => (-12.0f32..12.0, -12.0f32..12.0).prop_map(|(x, z)| Step::Tick { x, z }),
        1 => Just(Step::TickWithoutTarget),
        2 => (0u32..3).prop_map(Step::Damage),
    ]
}

fn run_steps(config: ArchetypeConfig, table: BehaviorTable, seed: u64, steps: &[Step]) -> Vec<EnemyState> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut enemy = EnemyBrain::new(Arc::new(config), Arc::new(table));
    enemy.activate(Vec3::ZERO, &mut rng).unwrap();

    let mut states = vec![enemy.state()];
    for step in steps {
        match step {
            Step::Tick { x, z } => {
                let target = TargetSnapshot {
                    position: Vec3::new(*x, 0.0, *z),
                    radius: 0.5,
                    layer: PLAYER_LAYER,
                };
                enemy.tick(0.1, Some(&target), &mut rng);
            }
            Step::TickWithoutTarget => {
                enemy.tick(0.1, None, &mut rng);
            }
            Step::Damage(amount) => {
                enemy.apply_damage(*amount, &mut rng);
            }
        }
        states.push(enemy.state());
    }
    states
}

proptest! {
    #[test]
    fn prop_health_never_increases(max in 1u32..20, hits in prop::collection::vec(0u32..8, 0..30)) {
        let mut health = HealthTracker::new(max);
        let mut previous = health.current();
        let mut deaths = 0;

        for amount in hits.iter().copied() {
            let change = health.apply_damage(amount);
            if amount == 0 {
                prop_assert_eq!(change, HealthChange::Rejected);
            }
            if change.is_lethal() {
                deaths += 1;
            }

            prop_assert!(health.current() <= previous);
            prop_assert!(health.current() <= health.max());
            previous = health.current();
        }

        let total: u32 = hits.iter().sum();
        prop_assert_eq!(deaths, if total >= max { 1 } else { 0 });
        prop_assert_eq!(health.is_dead(), total >= max);
    }

    #[test]
    fn prop_mushroom_dead_is_terminal(seed in any::<u64>(), steps in prop::collection::vec(step_strategy(), 1..120)) {
        let states = run_steps(ArchetypeConfig::mushroom(), BehaviorTable::mushroom(), seed, &steps);

        if let Some(first_dead) = states.iter().position(|state| *state == EnemyState::Dead) {
            prop_assert!(states[first_dead..].iter().all(|state| *state == EnemyState::Dead));
        }
    }

    #[test]
    fn prop_cactus_dead_is_terminal(seed in any::<u64>(), steps in prop::collection::vec(step_strategy(), 1..120)) {
        let config = ArchetypeConfig::cactus(Vec3::new(-3.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0));
        let states = run_steps(config, BehaviorTable::cactus(), seed, &steps);

        if let Some(first_dead) = states.iter().position(|state| *state == EnemyState::Dead) {
            prop_assert!(states[first_dead..].iter().all(|state| *state == EnemyState::Dead));
        }
        // Кактус без Hurt / SensePlayer — в них не попадает
        prop_assert!(!states.contains(&EnemyState::Hurt));
        prop_assert!(!states.contains(&EnemyState::SensePlayer));
        prop_assert!(!states.contains(&EnemyState::Walk));
    }

    #[test]
    fn prop_only_wired_states_reached(seed in any::<u64>(), steps in prop::collection::vec(step_strategy(), 1..120)) {
        let config = ArchetypeConfig::mushroom();
        let wired = config.states.clone();
        let states = run_steps(config, BehaviorTable::mushroom(), seed, &steps);

        prop_assert!(states.iter().all(|state| wired.contains(state)));
    }

    #[test]
    fn prop_picked_clip_belongs_to_state(seed in any::<u64>(), index in 0usize..EnemyState::ALL.len()) {
        let table = BehaviorTable::mushroom();
        let state = EnemyState::ALL[index];
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        match table.pick_random(state, &mut rng) {
            Ok(clip) => prop_assert!(table.animations_for(state).contains(clip)),
            Err(error) => {
                prop_assert_eq!(error, BehaviorError::EmptyState(state));
                prop_assert!(table.animations_for(state).is_empty());
            }
        }
    }
}
