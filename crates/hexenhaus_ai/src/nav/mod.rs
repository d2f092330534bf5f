//! Navigation коллаборатор на границе интерфейса
//!
//! Контракт (то что видит behavior core):
//! - `set_destination(point, speed)` / `halt()` — fire-and-forget, без
//!   подтверждения и без предположения о синхронном применении
//! - `velocity_magnitude()` — текущая скорость (для animation gating)
//! - `is_on_navigable_surface()` — false трактуется как
//!   perception-unavailable (агент уходит в Idle)
//!
//! Сам pathfinding — внешняя ответственность; в headless запусках
//! `drive_nav_agents` кинематически двигает Transform к destination
//! (замена движковому NavigationAgent, аналогично headless-коллизиям).

use bevy::prelude::*;

use crate::components::MovementCommand;

/// Состояние navigation-агента + счётчики вызовов для stub-ассертов в тестах.
#[derive(Component, Debug, Clone)]
pub struct NavAgent {
    destination: Option<Vec3>,
    speed: f32,
    stopped: bool,
    velocity: Vec3,
    /// false == агент вне navmesh (форсирует Idle через perception)
    pub on_navmesh: bool,
    pub set_destination_calls: u32,
    pub halt_calls: u32,
}

impl Default for NavAgent {
    fn default() -> Self {
        Self {
            destination: None,
            speed: 0.0,
            stopped: true,
            velocity: Vec3::ZERO,
            on_navmesh: true,
            set_destination_calls: 0,
            halt_calls: 0,
        }
    }
}

impl NavAgent {
    pub fn set_destination(&mut self, point: Vec3, speed: f32) {
        self.set_destination_calls += 1;
        self.destination = Some(point);
        self.speed = speed;
        self.stopped = false;
    }

    /// Остановка: сбрасывает путь и velocity.
    pub fn halt(&mut self) {
        self.halt_calls += 1;
        self.destination = None;
        self.velocity = Vec3::ZERO;
        self.stopped = true;
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn velocity_magnitude(&self) -> f32 {
        self.velocity.length()
    }

    pub fn is_on_navigable_surface(&self) -> bool {
        self.on_navmesh
    }
}

/// Система: steering bridge — MovementCommand → вызовы NavAgent
///
/// Идемпотентность на уровне коллаборатора: вызов уходит только если он
/// изменил бы состояние агента. Повторный Halt по уже остановленному
/// агенту не инкрементит halt_calls.
pub fn apply_movement_commands(
    mut agents: Query<(&MovementCommand, &mut NavAgent)>,
    transforms: Query<&Transform>,
) {
    for (command, mut nav) in agents.iter_mut() {
        match *command {
            MovementCommand::Halt => {
                if !nav.is_stopped() {
                    nav.halt();
                }
            }
            MovementCommand::MoveTo { target, speed } => {
                if nav.destination() != Some(target) || nav.speed() != speed {
                    nav.set_destination(target, speed);
                }
            }
            MovementCommand::Follow { target, speed } => {
                // Перецеливание каждый тик: destination = текущая позиция цели
                let Ok(target_transform) = transforms.get(target) else {
                    if !nav.is_stopped() {
                        nav.halt();
                    }
                    continue;
                };
                let dest = target_transform.translation;
                if nav.destination() != Some(dest) || nav.speed() != speed {
                    nav.set_destination(dest, speed);
                }
            }
        }
    }
}

/// Система: кинематический headless mover
///
/// Двигает Transform к destination по ground plane с заданной скоростью.
/// По прибытии velocity обнуляется, destination сохраняется (как у
/// движкового NavigationAgent) — animation epsilon гасит флаппинг флагов.
pub fn drive_nav_agents(mut agents: Query<(&mut Transform, &mut NavAgent)>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for (mut transform, mut nav) in agents.iter_mut() {
        if nav.stopped {
            nav.velocity = Vec3::ZERO;
            continue;
        }
        let Some(dest) = nav.destination else {
            nav.velocity = Vec3::ZERO;
            continue;
        };

        let mut to_dest = dest - transform.translation;
        to_dest.y = 0.0;
        let distance = to_dest.length();
        let step = nav.speed * delta;

        if distance <= step || distance < 1e-4 {
            transform.translation += to_dest;
            nav.velocity = Vec3::ZERO;
        } else {
            let dir = to_dest / distance;
            transform.translation += dir * step;
            nav.velocity = dir * nav.speed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_agent_starts_halted() {
        let nav = NavAgent::default();
        assert!(nav.is_stopped());
        assert_eq!(nav.destination(), None);
        assert_eq!(nav.velocity_magnitude(), 0.0);
        assert!(nav.is_on_navigable_surface());
    }

    #[test]
    fn test_set_destination_then_halt() {
        let mut nav = NavAgent::default();

        nav.set_destination(Vec3::new(3.0, 0.0, 4.0), 2.0);
        assert!(!nav.is_stopped());
        assert_eq!(nav.set_destination_calls, 1);

        nav.halt();
        assert!(nav.is_stopped());
        assert_eq!(nav.destination(), None);
        assert_eq!(nav.halt_calls, 1);
    }
}
