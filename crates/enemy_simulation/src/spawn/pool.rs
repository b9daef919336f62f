//! EnemyPool — dormant инстансы по архетипам.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::error::{SpawnError, SpawnResult};

/// Пул dormant врагов (LIFO по архетипу).
///
/// Враги не деспавнятся: после смерти инстанс деактивируется
/// и возвращается сюда для повторной активации.
#[derive(Resource, Debug, Default)]
pub struct EnemyPool {
    available: HashMap<String, Vec<Entity>>,
}

impl EnemyPool {
    pub fn register(&mut self, archetype: impl Into<String>, enemy: Entity) {
        self.release(&archetype.into(), enemy);
    }

    pub fn acquire(&mut self, archetype: &str) -> SpawnResult<Entity> {
        self.available
            .get_mut(archetype)
            .and_then(|slots| slots.pop())
            .ok_or_else(|| SpawnError::PoolExhausted {
                archetype: archetype.to_string(),
            })
    }

    pub fn release(&mut self, archetype: &str, enemy: Entity) {
        let slots = self.available.entry(archetype.to_string()).or_default();
        if !slots.contains(&enemy) {
            slots.push(enemy);
        }
    }

    pub fn available(&self, archetype: &str) -> usize {
        self.available.get(archetype).map_or(0, Vec::len)
    }
}
