//! Audio sink surface: loop start/stop + one-shot cues
//!
//! Контракт идемпотентен против уже играющего loop-состояния:
//! `play_loop` того же клипа который уже играет — no-op, `stop_loop`
//! не играющего клипа — no-op (семантика walk-loop из исходных скриптов).
//! Наружу уходят AudioCue события; engine bridge их проигрывает.

use bevy::prelude::*;

use crate::ai::BehaviorState;
use crate::components::Hostile;
use crate::nav::NavAgent;

/// Идентификатор аудио-клипа (маппинг на ассеты — на стороне хоста).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AudioClipId(pub u32);

/// Назначенные агенту клипы. None == клип не задан, cue молча пропускается.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct AgentSounds {
    pub walk_loop: Option<AudioClipId>,
    pub attack: Option<AudioClipId>,
}

/// Per-agent состояние loop-канала (что сейчас зациклено).
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct AudioChannel {
    current_loop: Option<AudioClipId>,
}

impl AudioChannel {
    /// Запустить loop; None если этот клип уже играет.
    pub fn play_loop(&mut self, clip: AudioClipId) -> Option<AudioCueKind> {
        if self.current_loop == Some(clip) {
            return None;
        }
        self.current_loop = Some(clip);
        Some(AudioCueKind::LoopStarted(clip))
    }

    /// Остановить loop; None если этот клип и так не играет.
    pub fn stop_loop(&mut self, clip: AudioClipId) -> Option<AudioCueKind> {
        if self.current_loop != Some(clip) {
            return None;
        }
        self.current_loop = None;
        Some(AudioCueKind::LoopStopped(clip))
    }

    pub fn current_loop(&self) -> Option<AudioClipId> {
        self.current_loop
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCueKind {
    LoopStarted(AudioClipId),
    LoopStopped(AudioClipId),
    OneShot(AudioClipId),
}

/// Аудио-запрос агента (максимум loop-start/loop-stop + one-shot за тик).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioCue {
    pub entity: Entity,
    pub kind: AudioCueKind,
}

/// Система: walk loop от состояния и фактической скорости
///
/// Loop играет пока агент в движущемся состоянии и steering реально
/// двигается (velocity > epsilon); иначе останавливается. Агент без
/// назначенного клипа пропускается — sink не load-bearing.
pub fn update_walk_loops(
    mut agents: Query<(Entity, &BehaviorState, &NavAgent, &AgentSounds, &mut AudioChannel), With<Hostile>>,
    mut cues: EventWriter<AudioCue>,
) {
    for (entity, state, nav, sounds, mut channel) in agents.iter_mut() {
        let Some(walk_clip) = sounds.walk_loop else {
            continue;
        };

        let moving_state = matches!(
            state,
            BehaviorState::Wander { .. } | BehaviorState::Approach | BehaviorState::Pursue
        );
        let moving = moving_state && nav.velocity_magnitude() > crate::MOVE_EPSILON;

        let cue = if moving {
            channel.play_loop(walk_clip)
        } else {
            channel.stop_loop(walk_clip)
        };
        if let Some(kind) = cue {
            cues.write(AudioCue { entity, kind });
        }
    }
}

/// Система: attack one-shot — ровно один на инициацию атаки.
pub fn play_attack_oneshots(
    mut attacks: EventReader<crate::ai::AttackStarted>,
    agents: Query<&AgentSounds>,
    mut cues: EventWriter<AudioCue>,
) {
    for attack in attacks.read() {
        let Ok(sounds) = agents.get(attack.attacker) else {
            continue;
        };
        let Some(clip) = sounds.attack else {
            continue; // клип не назначен — пропускаем
        };
        cues.write(AudioCue {
            entity: attack.attacker,
            kind: AudioCueKind::OneShot(clip),
        });
    }
}
