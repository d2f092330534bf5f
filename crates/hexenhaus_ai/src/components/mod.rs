//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: маркеры сущностей и здоровье (Hostile, PlayerTarget, Health)
//! - movement: команды перемещения для steering слоя (MovementCommand)
//! - animation: сигналы для animation sink (AnimationSignals, AnimationTrigger)

pub mod actor;
pub mod animation;
pub mod movement;

// Re-exports для удобного импорта
pub use actor::*;
pub use animation::*;
pub use movement::*;
