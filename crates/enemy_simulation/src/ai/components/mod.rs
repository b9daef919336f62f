//! AI components

pub mod brain;
pub mod state;


// Re-export all components
pub use brain::*;
pub use state::*;
