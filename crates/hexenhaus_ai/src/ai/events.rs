//! AI events — исходящие события behavior controller'а
//!
//! AttackStarted — ровно одно на инициацию атаки. Его консьюмят три
//! независимых sink'а: damage application, animation trigger pulse и
//! attack one-shot audio. Event-семантика гарантирует "exactly once".

use bevy::prelude::*;

/// Атака инициирована (FSM вошёл в AttackLocked).
#[derive(Event, Debug, Clone)]
pub struct AttackStarted {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: u32,
}
