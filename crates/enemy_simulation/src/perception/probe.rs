//! Perception probe: distance и swept-sphere запросы.
//!
//! Probe stateless — позиции и цели приходят параметрами.
//! "Нет попадания" — частый случай и не ошибка.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Битовая маска слоёв (аналог physics layer mask).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    /// Маска из одного слоя (0..32).
    pub const fn layer(index: u8) -> Self {
        LayerMask(1u32 << (index as u32 % 32))
    }

    pub const fn contains(self, layer: u8) -> bool {
        self.0 & (1u32 << (layer as u32 % 32)) != 0
    }

    pub const fn with(self, layer: u8) -> Self {
        LayerMask(self.0 | (1u32 << (layer as u32 % 32)))
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// Цель perception в момент тика (read-only для всего прохода).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSnapshot {
    pub position: Vec3,
    /// Радиус коллайдера цели (0 = точка)
    pub radius: f32,
    pub layer: u8,
}

impl TargetSnapshot {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            radius: 0.0,
            layer: 0,
        }
    }
}

/// Попадание volumetric cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    /// Точка контакта на поверхности цели
    pub point: Vec3,
    /// Пройденная сферой дистанция вдоль forward (0 = перекрытие на старте)
    pub distance: f32,
    pub target_position: Vec3,
    pub target_index: usize,
}

/// Stateless perception запросы.
pub struct PerceptionProbe;

impl PerceptionProbe {
    /// Евклидова дистанция (omnidirectional guard).
    pub fn distance_to(a: Vec3, b: Vec3) -> f32 {
        a.distance(b)
    }

    /// Sphere cast: сфера `radius` движется от `origin` вдоль `forward`
    /// на `max_range`. Возвращает ближайшее попадание по целям из `mask`.
    ///
    /// Цель, уже перекрывающая сферу в `origin`, — попадание на дистанции 0.
    pub fn volumetric_cast(
        origin: Vec3,
        forward: Vec3,
        radius: f32,
        max_range: f32,
        mask: LayerMask,
        targets: &[TargetSnapshot],
    ) -> Option<ProbeHit> {
        let direction = forward.normalize_or_zero();
        let max_range = max_range.max(0.0);

        let mut nearest: Option<ProbeHit> = None;

        for (index, target) in targets.iter().enumerate() {
            if !mask.contains(target.layer) {
                continue;
            }

            let combined = radius.max(0.0) + target.radius.max(0.0);
            let Some(distance) = sweep_distance(origin, direction, combined, max_range, target.position)
            else {
                continue;
            };

            let better = nearest.map_or(true, |hit| distance < hit.distance);
            if better {
                let center = origin + direction * distance;
                let point = target.position
                    + (center - target.position).normalize_or_zero() * target.radius.max(0.0);

                nearest = Some(ProbeHit {
                    point,
                    distance,
                    target_position: target.position,
                    target_index: index,
                });
            }
        }

        nearest
    }
}

/// Первое `t ∈ [0, max_range]` где |origin + direction·t − center| ≤ combined.
fn sweep_distance(
    origin: Vec3,
    direction: Vec3,
    combined: f32,
    max_range: f32,
    center: Vec3,
) -> Option<f32> {
    let offset = origin - center;
    let c = offset.length_squared() - combined * combined;

    if c <= 0.0 {
        // Уже внутри
        return Some(0.0);
    }

    if direction == Vec3::ZERO {
        return None;
    }

    let b = offset.dot(direction);
    if b > 0.0 {
        // Цель позади
        return None;
    }

    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let t = -b - discriminant.sqrt();
    (t <= max_range).then_some(t.max(0.0))
}
