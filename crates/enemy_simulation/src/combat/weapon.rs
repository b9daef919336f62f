//! Melee weapon — фильтр попаданий (слой + скорость удара)
//!
//! Physics слой сообщает о контакте через WeaponHit, ECS решает:
//! засчитать ли удар (DamageIntake) и заспавнить ли hit spark.

use bevy::prelude::*;

use crate::perception::LayerMask;

/// Параметры оружия ближнего боя (молот, дубина).
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct MeleeWeapon {
    /// Урон за засчитанный удар
    pub damage: u32,
    /// Медленнее — касание, не удар
    pub min_impact_speed: f32,
    /// По каким слоям удар засчитывается
    pub hit_layers: LayerMask,
    /// Время жизни hit spark (None — не ограничено)
    pub fx_lifetime: Option<f32>,
}

impl Default for MeleeWeapon {
    fn default() -> Self {
        Self {
            damage: 1,
            min_impact_speed: 1.5,
            hit_layers: LayerMask::ALL,
            fx_lifetime: Some(2.0),
        }
    }
}

impl MeleeWeapon {
    /// Засчитывается ли контакт как удар.
    pub fn accepts(&self, hit: &WeaponHit) -> bool {
        self.hit_layers.contains(hit.layer) && hit.impact_speed >= self.min_impact_speed
    }
}

/// Event: оружие коснулось коллайдера (physics → ECS)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct WeaponHit {
    /// Entity оружия (с MeleeWeapon)
    pub weapon: Entity,
    /// Кого задели (враг, стена, пол)
    pub target: Entity,
    /// Скорость оружия в момент контакта (м/с)
    pub impact_speed: f32,
    /// Слой задетого коллайдера
    pub layer: u8,
    /// Первая точка контакта
    pub point: Vec3,
}
