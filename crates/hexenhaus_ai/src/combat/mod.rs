//! Damage application + death handling
//!
//! ApplyDamage вызывается ровно один раз на инициацию атаки: единственный
//! продюсер — AttackStarted из FSM, событие консьюмится здесь однократно.

use bevy::prelude::*;

use crate::ai::{AttackStarted, BehaviorState, Perception};
use crate::audio::{AudioChannel, AudioCue};
use crate::components::{Health, Hostile, MovementCommand};
use crate::nav::NavAgent;

/// Событие: урон нанесен
///
/// Используется хостом для UI, эффектов, реакций.
#[derive(Event, Debug, Clone)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: u32,
    pub target_died: bool,
}

/// Событие: entity умер (health == 0)
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Компонент-маркер: entity мертв. Behavior-компоненты сняты,
/// труп остаётся в мире до деспавна хостом.
#[derive(Component, Debug)]
pub struct Dead;

/// Система: применение урона от AttackStarted
///
/// Цель без Health — не ошибка (удар в пустоту), логируем и пропускаем.
pub fn apply_damage(
    mut attacks: EventReader<AttackStarted>,
    mut dealt: EventWriter<DamageDealt>,
    mut died: EventWriter<EntityDied>,
    mut targets: Query<&mut Health>,
) {
    for attack in attacks.read() {
        let Ok(mut health) = targets.get_mut(attack.target) else {
            crate::logger::log(&format!(
                "combat: target {:?} has no Health, hit dropped",
                attack.target
            ));
            continue;
        };

        let was_alive = health.is_alive();
        health.take_damage(attack.damage);
        let target_died = was_alive && !health.is_alive();

        dealt.write(DamageDealt {
            attacker: attack.attacker,
            target: attack.target,
            damage: attack.damage,
            target_died,
        });

        if target_died {
            died.write(EntityDied {
                entity: attack.target,
                killer: Some(attack.attacker),
            });
            crate::logger::log_info(&format!(
                "combat: {:?} killed by {:?}",
                attack.target, attack.attacker
            ));
        }
    }
}

/// Система: teardown агента при смерти
///
/// Steering останавливается и loop-звук глушится немедленно (до того как
/// Commands применятся), behavior-компоненты снимаются через Commands.
/// Никакие таймеры агента не переживают его смерть; свежий спавн всегда
/// стартует из Idle.
pub fn disable_on_death(
    mut commands: Commands,
    mut deaths: EventReader<EntityDied>,
    mut agents: Query<(&mut NavAgent, &mut AudioChannel, &mut MovementCommand), With<Hostile>>,
    mut cues: EventWriter<AudioCue>,
) {
    for death in deaths.read() {
        let Ok((mut nav, mut channel, mut command)) = agents.get_mut(death.entity) else {
            continue; // умер не-агент (например цель) — тут делать нечего
        };

        if !nav.is_stopped() {
            nav.halt();
        }
        if *command != MovementCommand::Halt {
            *command = MovementCommand::Halt;
        }
        if let Some(clip) = channel.current_loop() {
            if let Some(kind) = channel.stop_loop(clip) {
                cues.write(AudioCue {
                    entity: death.entity,
                    kind,
                });
            }
        }

        if let Ok(mut entity_commands) = commands.get_entity(death.entity) {
            entity_commands.remove::<BehaviorState>();
            entity_commands.remove::<Perception>();
            entity_commands.insert(Dead);
        }

        crate::logger::log_info(&format!("combat: behavior disabled for dead {:?}", death.entity));
    }
}

/// Combat Plugin
///
/// Порядок: урон и death teardown идут после всей AI-цепочки (FSM →
/// actuation → nav) того же тика. Removal компонентов deferred до конца
/// schedule, поэтому teardown обязан быть последним — иначе actuation
/// того же тика перезапишет halt.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DamageDealt>().add_event::<EntityDied>();

        app.add_systems(
            FixedUpdate,
            (apply_damage, disable_on_death)
                .chain()
                .after(crate::nav::drive_nav_agents),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_dealt_event() {
        let event = DamageDealt {
            attacker: Entity::PLACEHOLDER,
            target: Entity::PLACEHOLDER,
            damage: 10,
            target_died: false,
        };

        assert_eq!(event.damage, 10);
        assert!(!event.target_died);
    }

    #[test]
    fn test_entity_died_event() {
        let event = EntityDied {
            entity: Entity::PLACEHOLDER,
            killer: Some(Entity::PLACEHOLDER),
        };

        assert!(event.killer.is_some());
    }
}
