//! Headless демо: игрок подходит к гейту, гриб появляется и получает молотом
//!
//! Запускает Bevy App без рендера, шагает FixedUpdate вручную (60Hz).

use std::sync::Arc;
use std::time::Duration;

use bevy::prelude::*;
use enemy_simulation::*;

const TICK: f32 = 1.0 / 60.0;

fn main() {
    let seed = 42;
    println!("Starting enemy simulation demo (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);
    set_log_level(LogLevel::Info);

    let archetype = Arc::new(ArchetypeConfig::mushroom());
    let table = Arc::new(BehaviorTable::mushroom());
    spawn_pooled_enemies(app.world_mut(), archetype, table, 2);

    let world = app.world_mut();
    world.spawn((
        SpawnGate::new("mushroom", 1.5),
        Transform::from_xyz(0.0, 0.0, 10.0),
    ));
    let player = world
        .spawn((Player, PerceptionTarget::default(), Transform::default()))
        .id();
    let hammer = world.spawn(MeleeWeapon::default()).id();

    // 20 секунд симуляции
    for tick in 0..1200 {
        let world = app.world_mut();

        // Игрок идёт к гейту 1.5 м/с, останавливается в 1 м от него
        if let Some(mut transform) = world.get_mut::<Transform>(player) {
            if transform.translation.z < 9.0 {
                transform.translation.z += 1.5 * TICK;
            }
        }

        // Удар молотом раз в секунду по ближайшему живому врагу
        if tick % 60 == 59 {
            let target = world
                .query::<(Entity, &EnemyBrain)>()
                .iter(world)
                .find(|(_, brain)| brain.is_active() && !brain.is_dead())
                .map(|(entity, brain)| (entity, brain.position()));

            if let Some((enemy, point)) = target {
                world.send_event(WeaponHit {
                    weapon: hammer,
                    target: enemy,
                    impact_speed: 4.0,
                    layer: 0,
                    point,
                });
            }
        }

        world
            .resource_mut::<Time<Fixed>>()
            .advance_by(Duration::from_secs_f32(TICK));
        world.run_schedule(FixedUpdate);

        if tick % 60 == 0 {
            for (entity, brain) in world.query::<(Entity, &EnemyBrain)>().iter(world) {
                if brain.is_active() {
                    println!(
                        "t={:>4.1}s {:?}: {:?} hp {}/{}",
                        tick as f32 * TICK,
                        entity,
                        brain.state(),
                        brain.health().current(),
                        brain.health().max()
                    );
                }
            }
        }
    }

    let pool = app.world().resource::<EnemyPool>();
    println!(
        "Simulation complete! {} mushroom(s) back in pool",
        pool.available("mushroom")
    );
}
