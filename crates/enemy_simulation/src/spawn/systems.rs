//! Spawn lifecycle systems (gate activation, return to pool).

use bevy::prelude::*;

use crate::ai::{Activation, Dormant, EnemyBrain, EnemyDefeated, HealthChanged};
use crate::error::SpawnError;
use crate::perception::Player;
use crate::spawn::{EnemyPool, SpawnFailed, SpawnGate, SpawnedBy};
use crate::DeterministicRng;

/// Система: игрок вошёл в радиус гейта → активировать pooled врага
///
/// Враг появляется в позиции гейта лицом к игроку.
/// Пул пуст → SpawnFailed (один раз), гейт повторяет попытку пока игрок внутри.
/// Битый конфиг → SpawnFailed, инстанс обратно в пул, гейт выключается.
pub fn activate_spawn_gates(
    mut commands: Commands,
    mut rng: ResMut<DeterministicRng>,
    mut pool: ResMut<EnemyPool>,
    players: Query<&Transform, With<Player>>,
    mut gates: Query<(Entity, &mut SpawnGate, &Transform), Without<Player>>,
    mut enemies: Query<(&mut EnemyBrain, &mut Transform), (Without<SpawnGate>, Without<Player>)>,
    mut failures: EventWriter<SpawnFailed>,
    mut health_events: EventWriter<HealthChanged>,
) {
    let Some(player) = players.iter().next().map(|transform| transform.translation) else {
        return;
    };

    for (gate_entity, mut gate, gate_transform) in gates.iter_mut() {
        let origin = gate_transform.translation;
        if !gate.should_trigger(origin.distance(player)) {
            continue;
        }

        let enemy = match pool.acquire(&gate.archetype) {
            Ok(enemy) => enemy,
            Err(error) => {
                if gate.mark_waiting() {
                    crate::log_warning(&format!("SpawnGate {:?}: {}", gate_entity, error));
                    failures.write(SpawnFailed {
                        gate: gate_entity,
                        error,
                    });
                }
                continue;
            }
        };

        let Ok((mut brain, mut transform)) = enemies.get_mut(enemy) else {
            crate::log_error(&format!(
                "SpawnGate {:?}: pooled {:?} has no EnemyBrain",
                gate_entity, enemy
            ));
            continue;
        };

        match brain.activate(origin, &mut rng.rng) {
            Ok(Activation::Activated) => {
                brain.face_towards(player);
                transform.translation = origin;
                transform.look_to(brain.forward(), Vec3::Y);

                commands
                    .entity(enemy)
                    .remove::<Dormant>()
                    .insert(SpawnedBy(gate_entity));
                gate.occupy(enemy);

                // Reset здоровья — health bar должен увидеть полную полоску
                let health = brain.health();
                health_events.write(HealthChanged {
                    entity: enemy,
                    current: health.current(),
                    max: health.max(),
                });

                crate::log(&format!(
                    "🌱 SpawnGate {:?}: activated {:?} ({})",
                    gate_entity, enemy, gate.archetype
                ));
            }
            Ok(Activation::Ignored) => {
                // Умирающий инстанс вернётся в пул сам через EnemyDefeated
                crate::log_warning(&format!(
                    "SpawnGate {:?}: pooled {:?} is still dying",
                    gate_entity, enemy
                ));
            }
            Err(error) => {
                crate::log_error(&format!("SpawnGate {:?}: {}", gate_entity, error));
                pool.release(&gate.archetype, enemy);
                gate.spend();
                failures.write(SpawnFailed {
                    gate: gate_entity,
                    error: SpawnError::Config(error),
                });
            }
        }
    }
}

/// Система: EnemyDefeated → деактивировать, вернуть в пул, погасить гейт
pub fn release_defeated_enemies(
    mut commands: Commands,
    mut defeated: EventReader<EnemyDefeated>,
    mut pool: ResMut<EnemyPool>,
    mut enemies: Query<(&mut EnemyBrain, Option<&SpawnedBy>)>,
    mut gates: Query<&mut SpawnGate>,
) {
    for event in defeated.read() {
        let Ok((mut brain, spawned_by)) = enemies.get_mut(event.entity) else {
            continue;
        };

        brain.deactivate();
        pool.release(&brain.archetype().name, event.entity);
        commands
            .entity(event.entity)
            .insert(Dormant)
            .remove::<SpawnedBy>();

        if let Some(SpawnedBy(gate_entity)) = spawned_by {
            if let Ok(mut gate) = gates.get_mut(*gate_entity) {
                gate.release(event.entity);
            }
        }

        crate::log(&format!(
            "♻️ {:?} returned to pool ({} available)",
            event.entity,
            pool.available(&brain.archetype().name)
        ));
    }
}
