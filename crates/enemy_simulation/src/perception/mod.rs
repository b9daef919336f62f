//! Perception module
//!
//! - `PerceptionProbe` — stateless distance / volumetric запросы
//! - `Player` + `PerceptionTarget` — ECS источник target snapshot'а

use bevy::prelude::*;

pub mod probe;

#[cfg(test)]
mod probe_tests;

pub use probe::{LayerMask, PerceptionProbe, ProbeHit, TargetSnapshot};

/// Маркер игрока (цель всех врагов).
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Параметры цели для perception (позиция берётся из Transform).
#[derive(Component, Debug, Clone, Copy)]
pub struct PerceptionTarget {
    pub radius: f32,
    pub layer: u8,
}

impl Default for PerceptionTarget {
    fn default() -> Self {
        Self {
            radius: 0.5,
            layer: PLAYER_LAYER,
        }
    }
}

impl PerceptionTarget {
    pub fn snapshot(&self, position: Vec3) -> TargetSnapshot {
        TargetSnapshot {
            position,
            radius: self.radius,
            layer: self.layer,
        }
    }
}

/// Слой игрока по умолчанию.
pub const PLAYER_LAYER: u8 = 3;
