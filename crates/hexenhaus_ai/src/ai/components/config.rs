//! Behavior tunables + construction-time валидация
//!
//! Диапазоны обязаны образовывать непересекающиеся band'ы:
//! `attack_range + attack_leeway < run_threshold < chase_range`.
//! Инвертированный/перекрытый конфиг — ошибка конструирования, не
//! undefined runtime поведение.

use bevy::ecs::component::HookContext;
use bevy::ecs::world::DeferredWorld;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error(
        "range bands inverted or overlapping: need attack_range + attack_leeway ({attack_threshold}) < run_threshold ({run_threshold}) < chase_range ({chase_range})"
    )]
    InvalidBands {
        attack_threshold: f32,
        run_threshold: f32,
        chase_range: f32,
    },

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },
}

/// Иммутабельные tunables одного агента (задаются при спавне).
///
/// Default-значения — из сериализованных полей исходных пресетов
/// (chase 15м, атака 1.5м + 0.2 leeway, бег ближе 6м).
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[component(on_add = reject_invalid_config)]
pub struct BehaviorConfig {
    /// Дальше этого — Wander, ближе — преследование
    pub chase_range: f32,
    /// Радиус удара
    pub attack_range: f32,
    /// Допуск поверх attack_range (гасит дрожание на границе)
    pub attack_leeway: f32,
    /// Ближе этого — Pursue (бег), дальше — Approach (шаг)
    pub run_threshold: f32,
    pub walk_speed: f32,
    pub run_speed: f32,
    /// Минимальный интервал между инициациями атак (секунды)
    pub time_between_attacks: f32,
    /// Длительность attack lock (steering подавлен)
    pub attack_lock_duration: f32,
    pub wander_radius: f32,
    /// Период выбора новой случайной wander-точки (секунды)
    pub wander_interval: f32,
    pub attack_damage: u32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            chase_range: 15.0,
            attack_range: 1.5,
            attack_leeway: 0.2,
            run_threshold: 6.0,
            walk_speed: 3.0,
            run_speed: 6.0,
            time_between_attacks: 1.2,
            attack_lock_duration: 1.0,
            wander_radius: 8.0,
            wander_interval: 3.0,
            attack_damage: 10,
        }
    }
}

impl BehaviorConfig {
    /// Консьюмит конфиг, возвращая его только если band'ы согласованы.
    ///
    /// Использование: `BehaviorConfig { chase_range: 20.0, ..Default::default() }.validated()?`
    pub fn validated(self) -> Result<Self, ConfigError> {
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("chase_range", self.chase_range),
            ("attack_range", self.attack_range),
            ("run_threshold", self.run_threshold),
            ("walk_speed", self.walk_speed),
            ("run_speed", self.run_speed),
            ("wander_radius", self.wander_radius),
            ("wander_interval", self.wander_interval),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        for (field, value) in [
            ("attack_leeway", self.attack_leeway),
            ("time_between_attacks", self.time_between_attacks),
            ("attack_lock_duration", self.attack_lock_duration),
        ] {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        let attack_threshold = self.attack_threshold();
        if !(attack_threshold < self.run_threshold && self.run_threshold < self.chase_range) {
            return Err(ConfigError::InvalidBands {
                attack_threshold,
                run_threshold: self.run_threshold,
                chase_range: self.chase_range,
            });
        }

        Ok(())
    }

    /// Нижняя граница attack band: attack_range + attack_leeway
    pub fn attack_threshold(&self) -> f32 {
        self.attack_range + self.attack_leeway
    }
}

/// Невалидный конфиг не должен дожить до первого тика: хук выполняет
/// ту же проверку, что и `validated()`, на любом пути вставки компонента.
fn reject_invalid_config(world: DeferredWorld, context: HookContext) {
    if let Some(config) = world.get::<BehaviorConfig>(context.entity) {
        if let Err(err) = config.validate() {
            panic!("BehaviorConfig rejected for {:?}: {err}", context.entity);
        }
    }
}
