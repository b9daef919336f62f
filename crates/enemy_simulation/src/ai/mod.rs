//! AI decision-making module
//!
//! Одна FSM (`EnemyBrain`) на оба архетипа врагов, различия — в `ArchetypeConfig`.
//! ECS слой: DamageIntake → apply_damage_intake → enemy_fsm_tick → события наружу.

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;

// Re-export основных типов
pub use components::*;
pub use events::*;
pub use systems::*;

use crate::SimulationSet;

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. apply_damage_intake (SimulationSet::Damage) — урон, Hurt/Dead pre-emption
/// 2. enemy_fsm_tick (SimulationSet::Think) — perception, движение, таймеры
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DamageIntake>()
            .add_event::<HealthChanged>()
            .add_event::<AnimationRequested>()
            .add_event::<FxRequested>()
            .add_event::<EnemyDefeated>();

        app.add_systems(
            FixedUpdate,
            (
                apply_damage_intake.in_set(SimulationSet::Damage),
                enemy_fsm_tick.in_set(SimulationSet::Think),
            ),
        );
    }
}
