//! Combat system module
//!
//! ECS ответственность:
//! - Combat rules: какой контакт оружия считается ударом
//! - Events: WeaponHit (physics → ECS) → DamageIntake + FxRequested
//!
//! Здоровье и реакция на урон живут в AI (EnemyBrain), сюда не протекают.

use bevy::prelude::*;

pub mod systems;
pub mod weapon;

#[cfg(test)]
mod weapon_tests;

// Re-export основных типов
pub use systems::resolve_weapon_hits;
pub use weapon::{MeleeWeapon, WeaponHit};

use crate::ai::{DamageIntake, FxRequested};
use crate::SimulationSet;

/// Combat Plugin
///
/// Регистрирует WeaponHit и resolve_weapon_hits в FixedUpdate
/// (SimulationSet::Combat — раньше damage intake, чтобы удар засчитался в том же тике).
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<WeaponHit>()
            .add_event::<DamageIntake>()
            .add_event::<FxRequested>();

        app.add_systems(
            FixedUpdate,
            resolve_weapon_hits.in_set(SimulationSet::Combat),
        );
    }
}
