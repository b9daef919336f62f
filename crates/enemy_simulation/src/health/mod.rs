//! Health tracker врага
//!
//! Инвариант: 0 ≤ current ≤ max, между reset'ами current только убывает.
//! Display (health bar) — внешний collaborator, tracker только пушит значения.

use std::fmt;

/// Внешний потребитель (current, max) — health bar, UI, телеметрия.
pub trait HealthDisplay: Send + Sync {
    fn show(&mut self, current: u32, max: u32);
}

/// Результат применения урона.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthChange {
    /// amount == 0 — отклонено
    Rejected,
    /// Уже мёртв — no-op
    Ignored,
    /// Урон применён, жив
    Damaged { current: u32 },
    /// Этот вызов пересёк порог смерти (edge-triggered)
    Died,
}

impl HealthChange {
    pub fn is_lethal(&self) -> bool {
        matches!(self, HealthChange::Died)
    }
}

pub struct HealthTracker {
    current: u32,
    max: u32,
    display: Option<Box<dyn HealthDisplay>>,
}

impl HealthTracker {
    pub fn new(max: u32) -> Self {
        Self {
            current: max,
            max,
            display: None,
        }
    }

    pub fn attach_display(&mut self, display: Box<dyn HealthDisplay>) {
        self.display = Some(display);
        self.push();
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_dead(&self) -> bool {
        self.current == 0
    }

    pub fn fraction(&self) -> f32 {
        if self.max == 0 {
            0.0
        } else {
            self.current as f32 / self.max as f32
        }
    }

    /// Полное здоровье (pooled reactivation).
    pub fn reset(&mut self, max: u32) {
        self.max = max;
        self.current = max;
        self.push();
    }

    pub fn apply_damage(&mut self, amount: u32) -> HealthChange {
        if amount == 0 {
            return HealthChange::Rejected;
        }
        if self.is_dead() {
            return HealthChange::Ignored;
        }

        self.current = self.current.saturating_sub(amount);
        self.push();

        if self.current == 0 {
            HealthChange::Died
        } else {
            HealthChange::Damaged {
                current: self.current,
            }
        }
    }

    fn push(&mut self) {
        if let Some(display) = self.display.as_mut() {
            display.show(self.current, self.max);
        }
    }
}

impl fmt::Debug for HealthTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HealthTracker")
            .field("current", &self.current)
            .field("max", &self.max)
            .field("display", &self.display.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct Recorder(Arc<Mutex<Vec<(u32, u32)>>>);

    impl HealthDisplay for Recorder {
        fn show(&mut self, current: u32, max: u32) {
            self.0.lock().unwrap().push((current, max));
        }
    }

    #[test]
    fn test_damage_clamps_at_zero() {
        let mut health = HealthTracker::new(3);

        assert_eq!(health.apply_damage(1), HealthChange::Damaged { current: 2 });
        assert_eq!(health.apply_damage(10), HealthChange::Died);
        assert_eq!(health.current(), 0);
        assert!(health.is_dead());
    }

    #[test]
    fn test_death_crossing_reported_once() {
        let mut health = HealthTracker::new(3);
        health.reset(3);

        assert!(health.apply_damage(3).is_lethal());
        assert_eq!(health.apply_damage(3), HealthChange::Ignored);
        assert_eq!(health.current(), 0);
    }

    #[test]
    fn test_zero_damage_rejected() {
        let mut health = HealthTracker::new(5);
        assert_eq!(health.apply_damage(0), HealthChange::Rejected);
        assert_eq!(health.current(), 5);
    }

    #[test]
    fn test_reset_restores_full_health() {
        let mut health = HealthTracker::new(5);
        health.apply_damage(5);
        health.reset(8);

        assert_eq!(health.current(), 8);
        assert_eq!(health.max(), 8);
        assert!(!health.is_dead());
        assert_eq!(health.fraction(), 1.0);
    }

    #[test]
    fn test_display_receives_every_change() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut health = HealthTracker::new(3);
        health.attach_display(Box::new(Recorder(Arc::clone(&log))));

        health.apply_damage(1);
        health.apply_damage(0); // rejected — без push
        health.apply_damage(5);
        health.apply_damage(1); // dead — без push
        health.reset(3);

        assert_eq!(
            *log.lock().unwrap(),
            vec![(3, 3), (2, 3), (0, 3), (3, 3)]
        );
    }
}
