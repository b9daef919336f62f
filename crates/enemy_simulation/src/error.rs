//! Ошибки симуляции врагов.
//!
//! Категории:
//! - `ConfigError` — битая конфигурация архетипа (ловится при активации)
//! - `BehaviorError` — пустая запись behavior table
//! - `SpawnError` — пул исчерпан или конфигурация не прошла валидацию
//! - `ArchetypeLoadError` — чтение TOML определения архетипа
//!
//! Промахи perception — НЕ ошибки, это обычный control flow.

use thiserror::Error;

use crate::ai::EnemyState;

/// Ошибка конфигурации архетипа.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("state {0:?} is wired but has no behavior table entry")]
    MissingAnimations(EnemyState),

    #[error("behavior table lists {0:?} more than once")]
    DuplicateTableEntry(EnemyState),

    #[error("behavior table entry for {0:?} has no animations")]
    EmptyTableEntry(EnemyState),

    #[error("patrol checkpoints A and B are identical ({0:?})")]
    DegenerateCheckpoints([f32; 3]),

    #[error("timer range `{name}` is invalid: [{min}, {max}]")]
    InvalidTimerRange {
        name: &'static str,
        min: f32,
        max: f32,
    },

    #[error("`{name}` must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    #[error("archetype must wire {0:?}")]
    MissingState(EnemyState),

    #[error("archetype wires both Walk and Patrol")]
    AmbiguousRoamState,

    #[error("initial state {0:?} is not a passive wired state")]
    InvalidInitialState(EnemyState),

    #[error("lose-sight distance {lose_sight} must exceed sense reach {sense_reach}")]
    LoseSightInsideSenseRange { lose_sight: f32, sense_reach: f32 },

    #[error("attack distance {attack} must not exceed lose-sight distance {lose_sight}")]
    AttackBeyondLoseSight { attack: f32, lose_sight: f32 },
}

/// Ошибка выбора анимации.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BehaviorError {
    #[error("behavior table has no animations for state {0:?}")]
    EmptyState(EnemyState),
}

/// Ошибка спавна через SpawnGate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpawnError {
    #[error("no dormant `{archetype}` instance left in the pool")]
    PoolExhausted { archetype: String },

    #[error("activation rejected: {0}")]
    Config(#[from] ConfigError),
}

/// Ошибка загрузки определения архетипа.
#[derive(Debug, Error)]
pub enum ArchetypeLoadError {
    #[error("failed to read archetype file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse archetype definition: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
pub type SpawnResult<T> = Result<T, SpawnError>;
