//! Data-driven выбор анимаций.

pub mod table;


pub use table::{AnimationId, BehaviorTable, BehaviorTableEntry};
