//! Behavior FSM transitions (приоритетная таблица переходов)
//!
//! Порядок правил, первый матч выигрывает:
//! 1. AttackLocked липкий до истечения; на истечении проваливаемся к 2+
//!    на этом же тике
//! 2. perception unavailable → Idle
//! 3. d > chase_range → Wander
//! 4. attack_threshold < d <= chase_range, d > run_threshold → Approach
//! 5. attack_threshold < d <= run_threshold → Pursue
//! 6. d <= attack_threshold → AttackWindup (cooldown идёт) либо инициация
//!    атаки → AttackLocked
//!
//! Приоритет, а не величины, разрешает любые граничные неоднозначности;
//! сами band'ы валидируются при конструировании конфига.

use bevy::prelude::*;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::ai::{AttackClock, AttackStarted, BehaviorConfig, BehaviorState, Perception, TargetContact};
use crate::components::Hostile;
use crate::DeterministicRng;

/// Исход одного шага резолюции состояния.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub state: BehaviorState,
    /// true == на этом тике инициирована атака (ровно одна)
    pub attack_initiated: bool,
}

/// Чистое ядро: (state, perception, clock, config, now) → следующее состояние.
///
/// Побочных эффектов нет — rng нужен только Wander'у для выбора точки.
/// Вызывается системой раз в тик на агента; now сэмплирован один раз
/// на весь тик и не перечитывается.
pub fn resolve(
    state: &BehaviorState,
    contact: Option<&TargetContact>,
    clock: &AttackClock,
    config: &BehaviorConfig,
    agent_pos: Vec3,
    now: f32,
    delta: f32,
    rng: &mut ChaCha8Rng,
) -> Resolved {
    // Правило 1: AttackLocked игнорирует дистанцию до истечения
    if let BehaviorState::AttackLocked { until } = state {
        if now < *until {
            return Resolved {
                state: state.clone(),
                attack_initiated: false,
            };
        }
        // Лок истёк — падаем к правилам 2+ на этом же тике
    }

    // Правило 2: без цели (или вне navmesh) делать нечего
    let Some(contact) = contact else {
        return Resolved {
            state: BehaviorState::Idle,
            attack_initiated: false,
        };
    };

    let d = contact.distance;
    let attack_threshold = config.attack_threshold();

    // Правило 3: цель вне chase_range → бродим
    if d > config.chase_range {
        // Таймер и точка переживают тик только внутри Wander
        let (mut timer, mut destination) = match state {
            BehaviorState::Wander {
                retarget_timer,
                destination,
            } => (*retarget_timer, *destination),
            _ => (0.0, None),
        };

        timer -= delta;
        if timer <= 0.0 {
            destination = Some(random_wander_point(agent_pos, config.wander_radius, rng));
            timer = config.wander_interval;
        }

        return Resolved {
            state: BehaviorState::Wander {
                retarget_timer: timer,
                destination,
            },
            attack_initiated: false,
        };
    }

    // Правила 4/5: band'ы преследования
    if d > attack_threshold {
        let state = if d > config.run_threshold {
            BehaviorState::Approach
        } else {
            BehaviorState::Pursue
        };
        return Resolved {
            state,
            attack_initiated: false,
        };
    }

    // Правило 6: в радиусе удара
    if !clock.ready(now, config.time_between_attacks) {
        // Пережидаем cooldown вплотную к цели, без спама атак
        return Resolved {
            state: BehaviorState::AttackWindup,
            attack_initiated: false,
        };
    }

    Resolved {
        state: BehaviorState::AttackLocked {
            until: now + config.attack_lock_duration,
        },
        attack_initiated: true,
    }
}

/// Случайная точка в круге wander_radius вокруг origin, ground plane
/// (y сохраняется, как в исходном RandomNavmeshPoint).
fn random_wander_point(origin: Vec3, radius: f32, rng: &mut ChaCha8Rng) -> Vec3 {
    let angle = rng.gen::<f32>() * std::f32::consts::TAU;
    // sqrt для равномерности по площади круга
    let dist = rng.gen::<f32>().sqrt() * radius;
    origin + Vec3::new(angle.cos() * dist, 0.0, angle.sin() * dist)
}

/// Система: behavior FSM transitions
///
/// Сэмплирует монотонные часы один раз и резолвит состояние каждого
/// агента. Инициация атаки помечает AttackClock и эмитит AttackStarted;
/// все прочие эффекты (movement, animation, audio) — в actuation.
pub fn behavior_transitions(
    mut agents: Query<
        (
            Entity,
            &Transform,
            &Perception,
            &BehaviorConfig,
            &mut BehaviorState,
            &mut AttackClock,
        ),
        With<Hostile>,
    >,
    mut attacks: EventWriter<AttackStarted>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
) {
    // Один clock sample на тик, переиспользуется во всех сравнениях
    let now = time.elapsed_secs();
    let delta = time.delta_secs();

    for (entity, transform, perception, config, mut state, mut clock) in agents.iter_mut() {
        let resolved = resolve(
            &state,
            perception.contact.as_ref(),
            &clock,
            config,
            transform.translation,
            now,
            delta,
            &mut rng.rng,
        );

        if resolved.attack_initiated {
            clock.mark(now);
            // contact гарантирован: правило 6 достижимо только с целью
            if let Some(contact) = perception.contact.as_ref() {
                attacks.write(AttackStarted {
                    attacker: entity,
                    target: contact.entity,
                    damage: config.attack_damage,
                });
            }
            crate::logger::log(&format!(
                "AI: {:?} attack initiated, locked until t={:.2}",
                entity,
                now + config.attack_lock_duration
            ));
        }

        // Логируем только смену состояния, не смену таймеров внутри Wander
        if std::mem::discriminant(&*state) != std::mem::discriminant(&resolved.state) {
            crate::logger::log(&format!(
                "AI: {:?} {} → {}",
                entity,
                state_name(&state),
                state_name(&resolved.state)
            ));
        }
        if *state != resolved.state {
            *state = resolved.state;
        }
    }
}

fn state_name(state: &BehaviorState) -> &'static str {
    match state {
        BehaviorState::Idle => "Idle",
        BehaviorState::Wander { .. } => "Wander",
        BehaviorState::Approach => "Approach",
        BehaviorState::Pursue => "Pursue",
        BehaviorState::AttackWindup => "AttackWindup",
        BehaviorState::AttackLocked { .. } => "AttackLocked",
    }
}
