//! Состояния FSM врага и политика dispatch.

use serde::{Deserialize, Serialize};

/// Состояние врага.
///
/// Одно перечисление покрывает оба архетипа:
/// - timed patrol: `Idle, Walk, SensePlayer, Chase, Attack, Hurt, Dead`
/// - stationary patrol: `Idle, Patrol, Chase, Attack, Dead`
///
/// Какие состояния реально подключены — решает `ArchetypeConfig::states`.
/// Инвариант: `Dead` терминален, из него нет переходов.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyState {
    Idle,
    Walk,
    Patrol,
    SensePlayer,
    Chase,
    Attack,
    Hurt,
    Dead,
}

impl EnemyState {
    pub const ALL: [EnemyState; 8] = [
        EnemyState::Idle,
        EnemyState::Walk,
        EnemyState::Patrol,
        EnemyState::SensePlayer,
        EnemyState::Chase,
        EnemyState::Attack,
        EnemyState::Hurt,
        EnemyState::Dead,
    ];

    pub fn is_terminal(self) -> bool {
        self == EnemyState::Dead
    }

    /// Пассивные состояния: враг ещё не заметил цель и опрашивает perception.
    pub fn is_passive(self) -> bool {
        matches!(self, EnemyState::Idle | EnemyState::Walk | EnemyState::Patrol)
    }

    pub fn is_roam(self) -> bool {
        matches!(self, EnemyState::Walk | EnemyState::Patrol)
    }
}

impl Default for EnemyState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Как часто пассивные состояния опрашивают perception.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispatchPolicy {
    /// Каждый тик (дорого, максимальная реакция).
    Continuous,
    /// Только на тике входа в состояние и после разворота на checkpoint'е.
    /// Chase/Attack всегда считают дистанцию каждый тик.
    EdgeTriggered,
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self::Continuous
    }
}
