//! Конфигурация архетипов врагов
//!
//! Архетип = набор подключённых состояний + guard wiring + тайминги.
//! Оба архетипа (timed patrol / stationary patrol) — одна и та же FSM,
//! отличаются только этими данными.
//!
//! Определения грузятся из TOML:
//!
//! ```toml
//! [archetype]
//! name = "mushroom"
//! ...
//!
//! [[behaviors]]
//! state = "Idle"
//! animations = ["Mushroom_IdleNormalAngry"]
//! ```

use std::path::Path;

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ai::components::brain::ARRIVAL_EPSILON;
use crate::ai::{DispatchPolicy, EnemyState};
use crate::behavior::{BehaviorTable, BehaviorTableEntry};
use crate::error::{ArchetypeLoadError, ConfigError, ConfigResult};
use crate::perception::{LayerMask, PLAYER_LAYER};

/// Диапазон случайной длительности (секунды), `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub min: f32,
    pub max: f32,
}

impl TimeRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.min >= self.max {
            self.min
        } else {
            rng.gen_range(self.min..=self.max)
        }
    }

    fn validate(&self, name: &'static str) -> ConfigResult<()> {
        let valid = self.min.is_finite()
            && self.max.is_finite()
            && self.min > 0.0
            && self.max >= self.min;

        if valid {
            Ok(())
        } else {
            Err(ConfigError::InvalidTimerRange {
                name,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Как враг замечает цель.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PerceptionMode {
    /// Omnidirectional: `distance ≤ sense_distance`.
    Distance { sense_distance: f32 },
    /// Sphere cast вдоль forward. Попадание ближе `radius` → Attack, дальше → Chase.
    Volumetric {
        radius: f32,
        max_range: f32,
        target_layers: LayerMask,
    },
}

impl PerceptionMode {
    /// Максимальная дистанция, на которой цель может быть замечена.
    pub fn sense_reach(&self) -> f32 {
        match self {
            PerceptionMode::Distance { sense_distance } => *sense_distance,
            PerceptionMode::Volumetric {
                radius, max_range, ..
            } => radius + max_range,
        }
    }
}

/// Куда враг ходит в Walk/Patrol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RoamMode {
    /// Случайная точка в квадрате `±offset` вокруг home (плоскость XZ).
    Wander { offset: f32 },
    /// Маятник между двумя checkpoint'ами.
    Checkpoints { a: [f32; 3], b: [f32; 3] },
}

/// Параметры архетипа врага.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeConfig {
    pub name: String,
    /// Подключённые состояния
    pub states: Vec<EnemyState>,
    pub initial_state: EnemyState,
    #[serde(default)]
    pub dispatch: DispatchPolicy,
    pub perception: PerceptionMode,
    pub roam: RoamMode,
    /// Сколько длится Walk/Patrol до возврата в Idle (None = пока не заметит цель)
    #[serde(default)]
    pub roam_duration: Option<TimeRange>,
    pub idle_duration: TimeRange,
    /// Вероятность Idle → Walk/Patrol по истечении idle таймера
    #[serde(default = "default_roam_chance")]
    pub roam_chance: f64,
    /// Базовая скорость (м/с)
    pub move_speed: f32,
    pub chase_speed_multiplier: f32,
    pub attack_distance: f32,
    pub lose_sight_distance: f32,
    #[serde(default = "default_sense_delay")]
    pub sense_delay: f32,
    /// Длительность attack клипа / cooldown между атаками
    pub attack_wait: f32,
    #[serde(default = "default_hurt_delay")]
    pub hurt_delay: f32,
    #[serde(default = "default_death_delay")]
    pub death_delay: f32,
    pub max_health: u32,
}

fn default_roam_chance() -> f64 {
    0.5
}

fn default_sense_delay() -> f32 {
    1.0
}

fn default_hurt_delay() -> f32 {
    0.5
}

fn default_death_delay() -> f32 {
    1.5
}

impl ArchetypeConfig {
    /// Timed-patrol архетип: idle → wander, distance sensing, SensePlayer + Hurt.
    pub fn mushroom() -> Self {
        Self {
            name: "mushroom".to_string(),
            states: vec![
                EnemyState::Idle,
                EnemyState::Walk,
                EnemyState::SensePlayer,
                EnemyState::Chase,
                EnemyState::Attack,
                EnemyState::Hurt,
                EnemyState::Dead,
            ],
            initial_state: EnemyState::Idle,
            dispatch: DispatchPolicy::Continuous,
            perception: PerceptionMode::Distance {
                sense_distance: 5.0,
            },
            roam: RoamMode::Wander { offset: 2.0 },
            roam_duration: Some(TimeRange::new(2.0, 4.0)),
            idle_duration: TimeRange::new(5.0, 8.0),
            roam_chance: 0.5,
            move_speed: 2.0,
            chase_speed_multiplier: 1.5,
            attack_distance: 2.5,
            lose_sight_distance: 6.0,
            sense_delay: 1.0,
            attack_wait: 1.0,
            hurt_delay: 0.5,
            death_delay: 1.5,
            max_health: 3,
        }
    }

    /// Stationary-patrol архетип: маятник между checkpoint'ами, sphere cast sensing.
    pub fn cactus(checkpoint_a: Vec3, checkpoint_b: Vec3) -> Self {
        Self {
            name: "cactus".to_string(),
            states: vec![
                EnemyState::Idle,
                EnemyState::Patrol,
                EnemyState::Chase,
                EnemyState::Attack,
                EnemyState::Dead,
            ],
            initial_state: EnemyState::Patrol,
            dispatch: DispatchPolicy::EdgeTriggered,
            perception: PerceptionMode::Volumetric {
                radius: 3.0,
                max_range: 6.0,
                target_layers: LayerMask::layer(PLAYER_LAYER),
            },
            roam: RoamMode::Checkpoints {
                a: checkpoint_a.to_array(),
                b: checkpoint_b.to_array(),
            },
            roam_duration: Some(TimeRange::new(3.0, 6.0)),
            idle_duration: TimeRange::new(3.0, 6.0),
            roam_chance: 0.5,
            move_speed: 2.0,
            chase_speed_multiplier: 1.75, // 3.5 м/с
            attack_distance: 1.5,
            lose_sight_distance: 10.0,
            sense_delay: 1.0,
            attack_wait: 1.2,
            hurt_delay: 0.5,
            death_delay: 1.5,
            max_health: 3,
        }
    }

    pub fn wires(&self, state: EnemyState) -> bool {
        self.states.contains(&state)
    }

    /// Walk или Patrol — то, что подключено.
    pub fn roam_state(&self) -> EnemyState {
        if self.wires(EnemyState::Patrol) {
            EnemyState::Patrol
        } else {
            EnemyState::Walk
        }
    }

    /// Состояние после того как цель замечена (distance perception).
    pub fn notice_state(&self) -> EnemyState {
        if self.wires(EnemyState::SensePlayer) {
            EnemyState::SensePlayer
        } else {
            EnemyState::Chase
        }
    }

    pub fn chase_speed(&self) -> f32 {
        self.move_speed * self.chase_speed_multiplier
    }

    pub fn validate(&self) -> ConfigResult<()> {
        for required in [
            EnemyState::Idle,
            EnemyState::Chase,
            EnemyState::Attack,
            EnemyState::Dead,
        ] {
            if !self.wires(required) {
                return Err(ConfigError::MissingState(required));
            }
        }

        match (self.wires(EnemyState::Walk), self.wires(EnemyState::Patrol)) {
            (true, true) => return Err(ConfigError::AmbiguousRoamState),
            (false, false) => return Err(ConfigError::MissingState(EnemyState::Walk)),
            _ => {}
        }

        if !self.initial_state.is_passive() || !self.wires(self.initial_state) {
            return Err(ConfigError::InvalidInitialState(self.initial_state));
        }

        self.idle_duration.validate("idle_duration")?;
        if let Some(range) = &self.roam_duration {
            range.validate("roam_duration")?;
        }

        positive("move_speed", self.move_speed)?;
        positive("chase_speed_multiplier", self.chase_speed_multiplier)?;
        positive("attack_distance", self.attack_distance)?;
        positive("lose_sight_distance", self.lose_sight_distance)?;
        positive("attack_wait", self.attack_wait)?;
        positive("death_delay", self.death_delay)?;
        positive("max_health", self.max_health as f32)?;
        if self.wires(EnemyState::SensePlayer) {
            positive("sense_delay", self.sense_delay)?;
        }
        if self.wires(EnemyState::Hurt) {
            positive("hurt_delay", self.hurt_delay)?;
        }
        if !(0.0..=1.0).contains(&self.roam_chance) {
            return Err(ConfigError::NonPositive {
                name: "roam_chance",
                value: self.roam_chance as f32,
            });
        }

        match &self.perception {
            PerceptionMode::Distance { sense_distance } => {
                positive("sense_distance", *sense_distance)?;
            }
            PerceptionMode::Volumetric {
                radius, max_range, ..
            } => {
                positive("cast_radius", *radius)?;
                positive("cast_max_range", *max_range)?;
            }
        }

        match &self.roam {
            RoamMode::Wander { offset } => {
                positive("wander_offset", *offset)?;
                // Без таймера враг навсегда застрянет у wander точки
                if self.roam_duration.is_none() {
                    return Err(ConfigError::InvalidTimerRange {
                        name: "roam_duration",
                        min: 0.0,
                        max: 0.0,
                    });
                }
            }
            RoamMode::Checkpoints { a, b } => {
                // Патруль идёт по плоскости XZ, высота checkpoint'ов не считается
                let planar = Vec2::new(a[0], a[2]).distance(Vec2::new(b[0], b[2]));
                if planar < ARRIVAL_EPSILON {
                    return Err(ConfigError::DegenerateCheckpoints(*a));
                }
            }
        }

        if self.attack_distance > self.lose_sight_distance {
            return Err(ConfigError::AttackBeyondLoseSight {
                attack: self.attack_distance,
                lose_sight: self.lose_sight_distance,
            });
        }

        let sense_reach = self.perception.sense_reach();
        if self.lose_sight_distance <= sense_reach {
            return Err(ConfigError::LoseSightInsideSenseRange {
                lose_sight: self.lose_sight_distance,
                sense_reach,
            });
        }

        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

/// Файл определения: конфиг + behavior table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchetypeDefinition {
    pub archetype: ArchetypeConfig,
    pub behaviors: Vec<BehaviorTableEntry>,
}

impl ArchetypeDefinition {
    pub fn from_toml_str(content: &str) -> Result<(ArchetypeConfig, BehaviorTable), ArchetypeLoadError> {
        let definition: ArchetypeDefinition = toml::from_str(content)?;
        definition.into_parts()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<(ArchetypeConfig, BehaviorTable), ArchetypeLoadError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    fn into_parts(self) -> Result<(ArchetypeConfig, BehaviorTable), ArchetypeLoadError> {
        self.archetype.validate()?;
        let table = BehaviorTable::from_entries(self.behaviors)?;
        table.validate(&self.archetype.states)?;
        Ok((self.archetype, table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MUSHROOM_TOML: &str = r#"
[archetype]
name = "toml_mushroom"
states = ["Idle", "Walk", "SensePlayer", "Chase", "Attack", "Hurt", "Dead"]
initial_state = "Idle"
dispatch = "Continuous"
idle_duration = { min = 5.0, max = 8.0 }
roam_duration = { min = 2.0, max = 4.0 }
move_speed = 2.0
chase_speed_multiplier = 1.5
attack_distance = 2.5
lose_sight_distance = 6.0
attack_wait = 1.0
max_health = 3

[archetype.perception]
mode = "distance"
sense_distance = 5.0

[archetype.roam]
mode = "wander"
offset = 2.0

[[behaviors]]
state = "Idle"
animations = ["idle"]

[[behaviors]]
state = "Walk"
animations = ["walk"]

[[behaviors]]
state = "SensePlayer"
animations = ["sense"]

[[behaviors]]
state = "Chase"
animations = ["run"]

[[behaviors]]
state = "Attack"
animations = ["attack_1", "attack_2"]

[[behaviors]]
state = "Hurt"
animations = ["hurt"]

[[behaviors]]
state = "Dead"
animations = ["die"]
"#;

    #[test]
    fn test_presets_are_valid() {
        assert!(ArchetypeConfig::mushroom().validate().is_ok());
        assert!(ArchetypeConfig::cactus(Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0))
            .validate()
            .is_ok());
    }

    #[test]
    fn test_identical_checkpoints_rejected() {
        let point = Vec3::new(1.0, 0.0, 1.0);
        assert_eq!(
            ArchetypeConfig::cactus(point, point).validate(),
            Err(ConfigError::DegenerateCheckpoints([1.0, 0.0, 1.0]))
        );
    }

    #[test]
    fn test_checkpoints_differing_only_in_height_rejected() {
        let config = ArchetypeConfig::cactus(Vec3::new(2.0, 0.0, 3.0), Vec3::new(2.0, 4.0, 3.0));
        assert_eq!(
            config.validate(),
            Err(ConfigError::DegenerateCheckpoints([2.0, 0.0, 3.0]))
        );
    }

    #[test]
    fn test_bad_timer_ranges_rejected() {
        let mut config = ArchetypeConfig::mushroom();
        config.idle_duration = TimeRange::new(0.0, 3.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTimerRange { name: "idle_duration", .. })
        ));

        let mut config = ArchetypeConfig::mushroom();
        config.roam_duration = Some(TimeRange::new(4.0, 2.0));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTimerRange { name: "roam_duration", .. })
        ));

        let mut config = ArchetypeConfig::mushroom();
        config.hurt_delay = -0.5;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositive {
                name: "hurt_delay",
                value: -0.5
            })
        );
    }

    #[test]
    fn test_lose_sight_must_exceed_sense_reach() {
        let mut config = ArchetypeConfig::mushroom();
        config.lose_sight_distance = 5.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::LoseSightInsideSenseRange { .. })
        ));
    }

    #[test]
    fn test_state_set_validation() {
        let mut config = ArchetypeConfig::mushroom();
        config.states.push(EnemyState::Patrol);
        assert_eq!(config.validate(), Err(ConfigError::AmbiguousRoamState));

        let mut config = ArchetypeConfig::mushroom();
        config.states.retain(|s| *s != EnemyState::Dead);
        assert_eq!(
            config.validate(),
            Err(ConfigError::MissingState(EnemyState::Dead))
        );

        let mut config = ArchetypeConfig::mushroom();
        config.initial_state = EnemyState::Chase;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidInitialState(EnemyState::Chase))
        );
    }

    #[test]
    fn test_time_range_sample_within_bounds() {
        use rand::SeedableRng;
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(3);
        let range = TimeRange::new(5.0, 8.0);

        for _ in 0..200 {
            let value = range.sample(&mut rng);
            assert!((5.0..=8.0).contains(&value));
        }
        assert_eq!(TimeRange::new(1.0, 1.0).sample(&mut rng), 1.0);
    }

    #[test]
    fn test_load_definition_from_toml() {
        let (config, table) = ArchetypeDefinition::from_toml_str(MUSHROOM_TOML).unwrap();

        assert_eq!(config.name, "toml_mushroom");
        assert_eq!(config.roam_chance, 0.5);
        assert_eq!(config.death_delay, 1.5);
        assert_eq!(
            config.perception,
            PerceptionMode::Distance {
                sense_distance: 5.0
            }
        );
        assert_eq!(table.animations_for(EnemyState::Attack).len(), 2);
    }

    #[test]
    fn test_load_definition_reports_missing_animation_row() {
        let broken = MUSHROOM_TOML.replace(
            "[[behaviors]]\nstate = \"Hurt\"\nanimations = [\"hurt\"]\n",
            "",
        );
        let result = ArchetypeDefinition::from_toml_str(&broken);

        assert!(matches!(
            result,
            Err(ArchetypeLoadError::Config(ConfigError::MissingAnimations(
                EnemyState::Hurt
            )))
        ));
    }

    #[test]
    fn test_load_definition_reports_parse_error() {
        let result = ArchetypeDefinition::from_toml_str("[archetype]\nname = 5");
        assert!(matches!(result, Err(ArchetypeLoadError::Parse(_))));
    }
}
