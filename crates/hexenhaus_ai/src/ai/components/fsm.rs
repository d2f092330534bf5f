//! Behavior FSM components (state machine, attack clock, perception).

use bevy::prelude::*;

/// Состояния behavior controller'а враждебного NPC.
///
/// За тик активно ровно одно; порядок приоритетов живёт в
/// `ai::systems::fsm`, здесь только данные.
#[derive(Component, Debug, Clone, PartialEq)]
pub enum BehaviorState {
    /// Idle — начальное состояние; также форс при perception unavailable
    Idle,

    /// Wander — цель дальше chase_range, бродим случайными точками
    Wander {
        /// Время до выбора следующей случайной точки
        retarget_timer: f32,
        /// Текущая wander-точка (None пока не выбрана)
        destination: Option<Vec3>,
    },

    /// Approach — идём к цели шагом (band между run_threshold и chase_range)
    Approach,

    /// Pursue — бежим к цели (band между attack threshold и run_threshold)
    Pursue,

    /// AttackWindup — в радиусе удара, но cooldown ещё не истёк:
    /// steering остановлен, разворачиваемся на цель, атаки нет
    AttackWindup,

    /// AttackLocked — атака в процессе; липкое состояние, игнорирует
    /// дистанцию и подавляет движение до истечения `until`
    AttackLocked { until: f32 },
}

impl Default for BehaviorState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Per-agent таймер атак: время последней *инициированной* атаки.
///
/// None == агент ещё ни разу не атаковал, первая атака разрешена сразу.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct AttackClock {
    pub last_attack_at: Option<f32>,
}

impl AttackClock {
    /// Прошёл ли cooldown. Инвариант анти-спама: инициация возможна
    /// только если now - last_attack_at >= cooldown.
    pub fn ready(&self, now: f32, cooldown: f32) -> bool {
        match self.last_attack_at {
            None => true,
            Some(last) => now - last >= cooldown,
        }
    }

    pub fn mark(&mut self, now: f32) {
        self.last_attack_at = Some(now);
    }
}

/// Результат perception за текущий тик.
///
/// None == цель недоступна (нет маркера, цель мертва/деспавнута, либо
/// агент вне navmesh) — state machine форсируется в Idle.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Perception {
    pub contact: Option<TargetContact>,
}

/// Видимая цель: entity, её позиция и ground-plane дистанция до неё.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetContact {
    pub entity: Entity,
    pub position: Vec3,
    pub distance: f32,
}
