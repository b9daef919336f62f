//! Spawn module — SpawnGate + EnemyPool
//!
//! Враги создаются заранее (dormant), гейт активирует их по радиусу,
//! после смерти инстанс возвращается в пул.

use std::sync::Arc;

use bevy::prelude::*;

pub mod gate;
pub mod pool;
pub mod systems;

pub use gate::{GateState, SpawnGate, SpawnedBy};
pub use pool::EnemyPool;
pub use systems::*;

use crate::ai::{Dormant, EnemyBrain};
use crate::behavior::BehaviorTable;
use crate::config::ArchetypeConfig;
use crate::error::SpawnError;
use crate::SimulationSet;

/// Event: гейт не смог активировать врага
#[derive(Event, Debug, Clone, PartialEq)]
pub struct SpawnFailed {
    pub gate: Entity,
    pub error: SpawnError,
}

/// Создать `count` dormant врагов архетипа и положить их в пул.
pub fn spawn_pooled_enemies(
    world: &mut World,
    archetype: Arc<ArchetypeConfig>,
    table: Arc<BehaviorTable>,
    count: usize,
) -> Vec<Entity> {
    let name = archetype.name.clone();

    let enemies: Vec<Entity> = (0..count)
        .map(|_| {
            world
                .spawn((
                    EnemyBrain::new(Arc::clone(&archetype), Arc::clone(&table)),
                    Dormant,
                    Transform::default(),
                ))
                .id()
        })
        .collect();

    let mut pool = world.get_resource_or_insert_with(EnemyPool::default);
    for enemy in &enemies {
        pool.register(name.as_str(), *enemy);
    }

    enemies
}

/// Spawn Plugin
///
/// Порядок:
/// 1. activate_spawn_gates (SimulationSet::Spawn) — до тика FSM, враг тикает в том же кадре
/// 2. release_defeated_enemies (SimulationSet::Lifecycle) — после тика FSM
pub struct SpawnPlugin;

impl Plugin for SpawnPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EnemyPool>().add_event::<SpawnFailed>();

        app.add_systems(
            FixedUpdate,
            (
                activate_spawn_gates.in_set(SimulationSet::Spawn),
                release_defeated_enemies.in_set(SimulationSet::Lifecycle),
            ),
        );
    }
}
