//! Movement компоненты: команда перемещения для steering контракта
//!
//! Архитектура:
//! - Actuation adapter пишет MovementCommand (high-level intent, максимум
//!   одна команда за тик)
//! - Steering bridge читает и конвертирует в вызовы NavAgent
//! - Запись дедуплицируется: повторная идентичная команда не трогает
//!   компонент и не порождает повторных вызовов коллаборатора

use bevy::prelude::*;

/// Команда движения для агента (выполняется navigation коллаборатором)
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub enum MovementCommand {
    /// Остановиться и сбросить текущий путь
    Halt,
    /// Двигаться к фиксированной точке (wander destination)
    MoveTo { target: Vec3, speed: f32 },
    /// Следовать за entity — destination перецеливается каждый тик
    Follow { target: Entity, speed: f32 },
}

impl Default for MovementCommand {
    fn default() -> Self {
        Self::Halt
    }
}
