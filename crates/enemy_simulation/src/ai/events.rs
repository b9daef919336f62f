//! AI Events — вход (damage intake) и выход (animation / FX / lifecycle) FSM врагов
//!
//! Внешние слои (рендер, анимация, FX, UI) читают эти события,
//! ECS никогда не лезет в их иерархии напрямую.

use bevy::prelude::*;

use crate::ai::{EnemyState, FxRequest};
use crate::behavior::AnimationId;

/// Урон врагу (от weapon hit, trap, скрипта)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageIntake {
    pub enemy: Entity,
    pub amount: u32,
}

/// Health изменился (для health bar)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthChanged {
    pub entity: Entity,
    pub current: u32,
    pub max: u32,
}

/// Клип (пере)запущен — анимационный слой проигрывает его
#[derive(Event, Debug, Clone, PartialEq)]
pub struct AnimationRequested {
    pub entity: Entity,
    pub clip: AnimationId,
    pub state: EnemyState,
}

/// Запрос эффекта (death splash, hit spark)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct FxRequested {
    /// Entity-источник (враг или оружие)
    pub source: Entity,
    pub request: FxRequest,
    /// Время жизни эффекта (None — решает FX слой)
    pub lifetime: Option<f32>,
}

/// Death delay истёк — враг деактивирован и вернётся в пул.
///
/// Отправляется ровно один раз на смерть.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyDefeated {
    pub entity: Entity,
}
