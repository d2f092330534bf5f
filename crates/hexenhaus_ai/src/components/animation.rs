//! Animation sink surface: именованные boolean-флаги плюс trigger pulse
//!
//! Вместо animator parameter hash'ей движка — плоский набор флагов,
//! fire-and-forget. Engine bridge читает компонент (Changed<>) и события.

use bevy::prelude::*;

/// Boolean-набор для анимационного контроллера агента.
///
/// Пишется actuation adapter'ом только при изменении, чтобы
/// Changed<AnimationSignals> на стороне моста не спамил.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct AnimationSignals {
    pub is_walking: bool,
    pub is_running: bool,
    pub is_attacking: bool,
}

/// Discrete trigger pulse — ровно один на инициацию атаки.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationTrigger {
    Attack { entity: Entity },
}
