//! AI systems (damage intake → FSM tick)

pub mod damage;
pub mod fsm;

// Re-export all systems
pub use damage::*;
pub use fsm::*;
