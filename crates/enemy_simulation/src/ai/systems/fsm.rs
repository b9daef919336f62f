//! FSM tick system (perception → movement → combat → death).

use bevy::prelude::*;

use crate::ai::{AnimationRequested, Dormant, EnemyBrain, EnemyDefeated, FxRequested};
use crate::perception::{PerceptionTarget, Player, TargetSnapshot};
use crate::DeterministicRng;

/// Система: один тик FSM для каждого активного врага
///
/// Target snapshot снимается ОДИН раз за проход и read-only для всех врагов.
/// Transform — authoritative позиция: brain синхронизируется с ним перед тиком,
/// movement вектор применяется после (внешней физики в headless нет).
///
/// Выход:
/// - AnimationRequested — клип (пере)запущен
/// - FxRequested — death splash
/// - EnemyDefeated — death delay истёк (ровно один раз)
pub fn enemy_fsm_tick(
    time: Res<Time<Fixed>>,
    mut rng: ResMut<DeterministicRng>,
    players: Query<(&Transform, &PerceptionTarget), With<Player>>,
    mut enemies: Query<(Entity, &mut EnemyBrain, &mut Transform), (Without<Dormant>, Without<Player>)>,
    mut animation_events: EventWriter<AnimationRequested>,
    mut fx_events: EventWriter<FxRequested>,
    mut defeated_events: EventWriter<EnemyDefeated>,
) {
    let delta = time.delta_secs();
    if delta <= 0.0 {
        return;
    }

    // Один игрок; без игрока враги просто бродят
    let snapshot: Option<TargetSnapshot> = players
        .iter()
        .next()
        .map(|(transform, target)| target.snapshot(transform.translation));

    for (entity, mut brain, mut transform) in enemies.iter_mut() {
        if !brain.is_active() {
            continue;
        }

        brain.set_position(transform.translation);
        let output = brain.tick(delta, snapshot.as_ref(), &mut rng.rng);

        transform.translation += output.movement;
        let forward = brain.forward();
        if forward.length_squared() > f32::EPSILON {
            transform.look_to(forward, Vec3::Y);
        }

        if output.animation_restarted {
            if let Some(clip) = output.animation {
                animation_events.write(AnimationRequested {
                    entity,
                    clip,
                    state: output.state,
                });
            }
        }

        if let Some(request) = output.fx {
            fx_events.write(FxRequested {
                source: entity,
                request,
                lifetime: None,
            });
        }

        if output.despawn {
            crate::log(&format!("☠️ {:?} defeated → back to pool", entity));
            defeated_events.write(EnemyDefeated { entity });
        }
    }
}
