//! Enemy Simulation Core
//!
//! FSM врагов (perception → movement → combat → death) на Bevy 0.16 ECS.
//!
//! Слои:
//! - Чистое ядро: `EnemyBrain`, `PerceptionProbe`, `HealthTracker`, `BehaviorTable`
//!   (без ECS, тестируется напрямую)
//! - ECS plumbing: plugins + системы в FixedUpdate, события наружу
//!   (анимация, FX, health bar) — рендер/физика живут вне крейта

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod behavior;
pub mod combat;
pub mod config;
pub mod error;
pub mod health;
pub mod logger;
pub mod perception;
pub mod spawn;

// Re-export базовых типов для удобства
pub use ai::{
    AIPlugin, Activation, AnimationRequested, DamageIntake, DamageOutcome, DispatchPolicy,
    Dormant, EnemyBrain, EnemyDefeated, EnemyState, FxKind, FxRequest, FxRequested,
    HealthChanged, TickOutput,
};
pub use behavior::{AnimationId, BehaviorTable, BehaviorTableEntry};
pub use combat::{CombatPlugin, MeleeWeapon, WeaponHit};
pub use config::{ArchetypeConfig, ArchetypeDefinition, PerceptionMode, RoamMode, TimeRange};
pub use error::{ArchetypeLoadError, BehaviorError, ConfigError, SpawnError};
pub use health::{HealthChange, HealthDisplay, HealthTracker};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger,
    set_logger_if_needed, LogLevel, LogPrinter,
};
pub use perception::{
    LayerMask, PerceptionProbe, PerceptionTarget, Player, ProbeHit, TargetSnapshot, PLAYER_LAYER,
};
pub use spawn::{
    spawn_pooled_enemies, EnemyPool, GateState, SpawnFailed, SpawnGate, SpawnPlugin, SpawnedBy,
};

/// Порядок фаз внутри одного FixedUpdate тика.
///
/// Combat → Damage → Spawn → Think → Lifecycle:
/// удар засчитывается и применяется до тика FSM (Hurt/Dead в том же кадре),
/// побеждённые враги возвращаются в пул после тика.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Combat,
    Damage,
    Spawn,
    Think,
    Lifecycle,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Seed мог задать create_headless_app — не перезаписываем
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Combat,
                    SimulationSet::Damage,
                    SimulationSet::Spawn,
                    SimulationSet::Think,
                    SimulationSet::Lifecycle,
                )
                    .chain(), // Последовательное выполнение для детерминизма
            )
            .add_plugins((CombatPlugin, AIPlugin, SpawnPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    // Собираем все компоненты в детерминированный формат
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
