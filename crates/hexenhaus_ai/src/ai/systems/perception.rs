//! Perception: скалярная дистанция агент→цель, раз в тик
//!
//! Чистая функция от текущих позиций, без памяти. Вертикальный offset
//! игнорируется: band-проверки работают по ground-plane дистанции.

use bevy::prelude::*;

use crate::ai::{Perception, TargetContact};
use crate::components::{Health, Hostile, PlayerTarget};
use crate::nav::NavAgent;

/// Система: обновление Perception каждого агента
///
/// Цель недоступна если: маркера PlayerTarget нет в мире, цель мертва,
/// или сам агент вне navmesh (последнее — safety-эквивалент отсутствия
/// цели, см. steering контракт).
pub fn update_perception(
    mut agents: Query<(&Transform, &NavAgent, &mut Perception), With<Hostile>>,
    target: Query<(Entity, &Transform, &Health), With<PlayerTarget>>,
) {
    // Максимум одна цель в мире; мёртвая цель == отсутствующая
    let live_target = target
        .iter()
        .next()
        .filter(|(_, _, health)| health.is_alive());

    for (transform, nav, mut perception) in agents.iter_mut() {
        perception.contact = if !nav.is_on_navigable_surface() {
            None
        } else {
            live_target.map(|(entity, target_transform, _)| {
                let mut to_target = target_transform.translation - transform.translation;
                to_target.y = 0.0; // ground-plane проекция
                TargetContact {
                    entity,
                    position: target_transform.translation,
                    distance: to_target.length(),
                }
            })
        };
    }
}
