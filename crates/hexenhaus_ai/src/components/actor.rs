//! Базовые компоненты акторов: Hostile, PlayerTarget, Health

use bevy::prelude::*;

use crate::ai::{AttackClock, BehaviorConfig, BehaviorState, Perception};
use crate::audio::{AgentSounds, AudioChannel};
use crate::components::{AnimationSignals, MovementCommand};
use crate::nav::NavAgent;

/// Враждебный NPC — владелец behavior controller.
///
/// Автоматически добавляет весь AI-стек через Required Components:
/// state machine, таймеры, perception, steering и sink-компоненты.
/// `BehaviorConfig::default()` валиден; кастомный конфиг вставляется
/// при спавне поверх required-значения.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(
    Transform,
    Health,
    BehaviorState,
    BehaviorConfig,
    AttackClock,
    Perception,
    MovementCommand,
    NavAgent,
    AnimationSignals,
    AudioChannel,
    AgentSounds
)]
pub struct Hostile;

/// Маркер цели преследования (игрок). В мире ожидается максимум один.
///
/// Отсутствие маркера — не ошибка: perception репортит "unavailable"
/// и все агенты уходят в Idle.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(Transform, Health)]
pub struct PlayerTarget;

/// Здоровье актора
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100) // Default 100 HP
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    pub fn heal(&mut self, amount: u32) {
        self.current = (self.current + amount).min(self.max);
    }
}
