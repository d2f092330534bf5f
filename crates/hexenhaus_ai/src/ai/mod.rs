//! Hostile NPC behavior controller
//!
//! Три кооперирующих ответственности, данные текут в одну сторону за тик:
//! Perception → Behavior FSM → Actuation Adapter → коллабораторы.
//! Каждый агент владеет независимым состоянием, между агентами нет
//! shared mutable state.

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;

// Re-export основных типов
pub use components::{
    AttackClock, BehaviorConfig, BehaviorState, ConfigError, Perception, TargetContact,
};
pub use events::AttackStarted;

/// AI Plugin
///
/// Регистрирует pipeline в FixedUpdate. Порядок выполнения (chain для
/// детерминизма и консистентности внутри тика):
/// 1. update_perception — дистанция до цели
/// 2. behavior_transitions — FSM резолюция + инициация атак
/// 3. movement_from_state — state → MovementCommand
/// 4. animation_from_state / pulse_attack_triggers — animation sink
/// 5. update_walk_loops / play_attack_oneshots — audio sink
/// 6. face_target — разворот на цель
/// 7. apply_movement_commands — мост MovementCommand → NavAgent
/// 8. drive_nav_agents — headless кинематика
pub struct AiPlugin;

impl Plugin for AiPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AttackStarted>()
            .add_event::<crate::components::AnimationTrigger>()
            .add_event::<crate::audio::AudioCue>();

        app.add_systems(
            FixedUpdate,
            (
                systems::update_perception,
                systems::behavior_transitions,
                systems::movement_from_state,
                systems::animation_from_state,
                systems::pulse_attack_triggers,
                crate::audio::update_walk_loops,
                crate::audio::play_attack_oneshots,
                systems::face_target,
                crate::nav::apply_movement_commands,
                crate::nav::drive_nav_agents,
            )
                .chain(), // Последовательное выполнение для детерминизма
        );
    }
}
