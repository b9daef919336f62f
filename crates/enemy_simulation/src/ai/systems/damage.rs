//! Damage intake system.

use bevy::prelude::*;

use crate::ai::{DamageIntake, EnemyBrain, HealthChanged};
use crate::DeterministicRng;

/// Система: DamageIntake → EnemyBrain::apply_damage
///
/// Выполняется ДО enemy_fsm_tick: несколько попаданий в одном тике
/// дают максимум один вход в Hurt (латч сбрасывается в начале тика FSM).
/// Урон по неизвестной entity (уже деспавнена) — warning, не паника.
pub fn apply_damage_intake(
    mut intakes: EventReader<DamageIntake>,
    mut rng: ResMut<DeterministicRng>,
    mut enemies: Query<&mut EnemyBrain>,
    mut health_events: EventWriter<HealthChanged>,
) {
    for intake in intakes.read() {
        let Ok(mut brain) = enemies.get_mut(intake.enemy) else {
            crate::log_warning(&format!(
                "DamageIntake: {:?} is not an enemy (amount {})",
                intake.enemy, intake.amount
            ));
            continue;
        };

        let outcome = brain.apply_damage(intake.amount, &mut rng.rng);

        if outcome.changed_health() {
            health_events.write(HealthChanged {
                entity: intake.enemy,
                current: brain.health().current(),
                max: brain.health().max(),
            });
        }

        crate::log(&format!(
            "💥 {:?} took {} damage → {:?} (hp {}/{})",
            intake.enemy,
            intake.amount,
            outcome,
            brain.health().current(),
            brain.health().max()
        ));
    }
}
