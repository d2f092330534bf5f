//! Actuation adapter: resolved state → movement / animation / facing
//!
//! Единственное место, которое трогает интерфейсы коллабораторов.
//! За тик: максимум одна movement-команда, максимум одно обновление
//! animation-флагов; всё дедуплицировано против текущего состояния.

use bevy::prelude::*;

use crate::ai::{AttackStarted, BehaviorConfig, BehaviorState, Perception};
use crate::components::{AnimationSignals, AnimationTrigger, Hostile, MovementCommand};
use crate::nav::NavAgent;
use crate::{FACE_TURN_RATE, MOVE_EPSILON};

/// Система: state → MovementCommand
///
/// Idle/AttackWindup/AttackLocked полностью подавляют steering (Halt,
/// destination сброшена). Approach/Pursue — Follow с непрерывным
/// перецеливанием на позицию цели.
pub fn movement_from_state(
    mut agents: Query<
        (&BehaviorState, &Perception, &BehaviorConfig, &mut MovementCommand),
        With<Hostile>,
    >,
) {
    for (state, perception, config, mut command) in agents.iter_mut() {
        let next = match state {
            BehaviorState::Idle
            | BehaviorState::AttackWindup
            | BehaviorState::AttackLocked { .. } => MovementCommand::Halt,

            BehaviorState::Wander { destination, .. } => match destination {
                Some(dest) => MovementCommand::MoveTo {
                    target: *dest,
                    speed: config.walk_speed,
                },
                None => MovementCommand::Halt,
            },

            BehaviorState::Approach => follow_contact(perception, config.walk_speed),
            BehaviorState::Pursue => follow_contact(perception, config.run_speed),
        };

        // Дедуп записи: иначе Changed<MovementCommand> спамит мост
        if *command != next {
            *command = next;
        }
    }
}

fn follow_contact(perception: &Perception, speed: f32) -> MovementCommand {
    match perception.contact.as_ref() {
        Some(contact) => MovementCommand::Follow {
            target: contact.entity,
            speed,
        },
        // Approach/Pursue без контакта не резолвятся; на всякий случай стоим
        None => MovementCommand::Halt,
    }
}

/// Система: state → animation-флаги
///
/// Wander репортит "moving" только по фактической скорости steering'а —
/// гасим фликер анимации пока агент стоит на wander-точке.
pub fn animation_from_state(
    mut agents: Query<(&BehaviorState, &NavAgent, &mut AnimationSignals), With<Hostile>>,
) {
    for (state, nav, mut signals) in agents.iter_mut() {
        let next = match state {
            BehaviorState::Idle | BehaviorState::AttackWindup => AnimationSignals::default(),
            BehaviorState::Wander { .. } => AnimationSignals {
                is_walking: nav.velocity_magnitude() > MOVE_EPSILON,
                ..Default::default()
            },
            BehaviorState::Approach => AnimationSignals {
                is_walking: true,
                ..Default::default()
            },
            BehaviorState::Pursue => AnimationSignals {
                is_running: true,
                ..Default::default()
            },
            BehaviorState::AttackLocked { .. } => AnimationSignals {
                is_attacking: true,
                ..Default::default()
            },
        };

        if *signals != next {
            *signals = next;
        }
    }
}

/// Система: attack trigger pulse — ровно один на AttackStarted.
pub fn pulse_attack_triggers(
    mut attacks: EventReader<AttackStarted>,
    mut triggers: EventWriter<AnimationTrigger>,
) {
    for attack in attacks.read() {
        triggers.write(AnimationTrigger::Attack {
            entity: attack.attacker,
        });
    }
}

/// Система: плавный разворот на цель
///
/// Во всех состояниях кроме Wander (и кроме unavailable) heading
/// слерпится к flattened-вектору на цель с фиксированной угловой
/// скоростью — в том числе стоя (AttackWindup, AttackLocked).
pub fn face_target(
    mut agents: Query<(&BehaviorState, &Perception, &mut Transform), With<Hostile>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (state, perception, mut transform) in agents.iter_mut() {
        if matches!(state, BehaviorState::Wander { .. }) {
            continue;
        }
        let Some(contact) = perception.contact.as_ref() else {
            continue;
        };

        let mut dir = contact.position - transform.translation;
        dir.y = 0.0;
        if dir.length_squared() < 0.001 {
            continue;
        }

        let target_rotation = Transform::default().looking_to(dir, Vec3::Y).rotation;
        let t = (FACE_TURN_RATE * delta).min(1.0);
        transform.rotation = transform.rotation.slerp(target_rotation, t);
    }
}
