//! SpawnGate — one-shot активатор pooled врага по радиусу.

use bevy::prelude::*;

/// Фаза гейта.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Ждёт игрока
    Armed,
    /// Игрок в радиусе, но пул пуст — повтор каждый тик
    Waiting,
    /// Враг активирован и жив
    Occupied(Entity),
    /// Враг побеждён (или конфиг битый) — гейт больше не срабатывает
    Spent,
}

/// Точка появления врага.
///
/// Срабатывает, когда дистанция до игрока впервые становится меньше `radius`.
#[derive(Component, Debug, Clone)]
pub struct SpawnGate {
    /// Имя архетипа в EnemyPool
    pub archetype: String,
    pub radius: f32,
    state: GateState,
}

impl SpawnGate {
    pub fn new(archetype: impl Into<String>, radius: f32) -> Self {
        Self {
            archetype: archetype.into(),
            radius,
            state: GateState::Armed,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn should_trigger(&self, distance: f32) -> bool {
        matches!(self.state, GateState::Armed | GateState::Waiting) && distance < self.radius
    }

    pub fn occupy(&mut self, enemy: Entity) {
        self.state = GateState::Occupied(enemy);
    }

    /// Пул пуст. `true` — первый отказ (о нём стоит сообщить).
    pub fn mark_waiting(&mut self) -> bool {
        let first = self.state != GateState::Waiting;
        self.state = GateState::Waiting;
        first
    }

    pub fn spend(&mut self) {
        self.state = GateState::Spent;
    }

    /// Враг побеждён. `false` — это не наш враг.
    pub fn release(&mut self, enemy: Entity) -> bool {
        if self.state == GateState::Occupied(enemy) {
            self.state = GateState::Spent;
            true
        } else {
            false
        }
    }
}

/// Обратная ссылка врага на гейт, который его активировал.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnedBy(pub Entity);
