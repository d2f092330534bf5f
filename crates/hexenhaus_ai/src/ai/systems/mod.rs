//! AI systems (perception → FSM → actuation)

pub mod actuation;
pub mod fsm;
pub mod perception;

// Re-export all systems
pub use actuation::*;
pub use fsm::*;
pub use perception::*;
