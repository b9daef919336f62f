//! Behavior table: state → набор символьных анимаций.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ai::EnemyState;
use crate::error::{BehaviorError, ConfigError, ConfigResult};

/// Символьный идентификатор клипа (проигрывает внешний animator).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimationId(String);

impl AnimationId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AnimationId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for AnimationId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Строка таблицы: одно состояние + упорядоченный непустой список клипов.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorTableEntry {
    pub state: EnemyState,
    pub animations: Vec<AnimationId>,
}

/// Таблица поведения архетипа.
///
/// Shared read-only между всеми инстансами архетипа (через `Arc`).
/// Lookup всегда сканирует все строки и берёт строку с совпадающим state;
/// отсутствие строки = пустой результат, а не чужая строка.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BehaviorTable {
    entries: Vec<BehaviorTableEntry>,
}

impl BehaviorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: добавить строку (валидация — при активации врага).
    pub fn with<I, A>(mut self, state: EnemyState, animations: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<AnimationId>,
    {
        self.entries.push(BehaviorTableEntry {
            state,
            animations: animations.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Собрать таблицу из готовых строк с проверкой дублей и пустых строк.
    pub fn from_entries(entries: Vec<BehaviorTableEntry>) -> ConfigResult<Self> {
        let table = Self { entries };
        table.validate_entries()?;
        Ok(table)
    }

    pub fn entries(&self) -> &[BehaviorTableEntry] {
        &self.entries
    }

    pub fn entry(&self, state: EnemyState) -> Option<&BehaviorTableEntry> {
        self.entries.iter().find(|entry| entry.state == state)
    }

    /// Все клипы состояния (пустой slice если строки нет).
    pub fn animations_for(&self, state: EnemyState) -> &[AnimationId] {
        self.entry(state)
            .map(|entry| entry.animations.as_slice())
            .unwrap_or(&[])
    }

    /// Равномерно случайный клип состояния.
    pub fn pick_random<R: Rng + ?Sized>(
        &self,
        state: EnemyState,
        rng: &mut R,
    ) -> Result<&AnimationId, BehaviorError> {
        self.animations_for(state)
            .choose(rng)
            .ok_or(BehaviorError::EmptyState(state))
    }

    /// Проверка покрытия: каждое подключённое состояние имеет непустую строку.
    pub fn validate(&self, wired: &[EnemyState]) -> ConfigResult<()> {
        self.validate_entries()?;

        for state in wired {
            if self.entry(*state).is_none() {
                return Err(ConfigError::MissingAnimations(*state));
            }
        }

        Ok(())
    }

    fn validate_entries(&self) -> ConfigResult<()> {
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.animations.is_empty() {
                return Err(ConfigError::EmptyTableEntry(entry.state));
            }
            if self.entries[..index].iter().any(|e| e.state == entry.state) {
                return Err(ConfigError::DuplicateTableEntry(entry.state));
            }
        }
        Ok(())
    }

    /// Клипы timed-patrol архетипа (гриб).
    pub fn mushroom() -> Self {
        Self::new()
            .with(
                EnemyState::Idle,
                [
                    "Mushroom_IdleNormalAngry",
                    "Mushroom_IdleBattleAngry",
                    "Mushroom_IdlePlantToBattleAngry",
                ],
            )
            .with(
                EnemyState::Walk,
                [
                    "Mushroom_walkFWDAngry",
                    "Mushroom_walkLFTAngry",
                    "Mushroom_walkRGTAngry",
                ],
            )
            .with(
                EnemyState::Attack,
                [
                    "Mushroom_Attack01Angry",
                    "Mushroom_Attack02Angry",
                    "Mushroom_Attack03Angry",
                ],
            )
            .with(EnemyState::SensePlayer, ["Mushroom_SenseSomethingStartAngry"])
            .with(EnemyState::Chase, ["Mushroom_runFWDAngry"])
            .with(EnemyState::Hurt, ["Mushroom_GetHitAngry"])
            .with(EnemyState::Dead, ["Mushroom_DieAngry"])
    }

    /// Клипы stationary-patrol архетипа (кактус).
    pub fn cactus() -> Self {
        Self::new()
            .with(EnemyState::Idle, ["Cactus_IdleNormal", "Cactus_IdleBattle"])
            .with(EnemyState::Patrol, ["Cactus_WalkFWD"])
            .with(EnemyState::Chase, ["Cactus_RunFWD"])
            .with(EnemyState::Attack, ["Cactus_Attack01", "Cactus_Attack02"])
            .with(EnemyState::Dead, ["Cactus_Die"])
    }
}
