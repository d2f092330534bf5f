//! HEXENHAUS AI Core
//!
//! Headless ECS-симуляция behavior controller'а враждебных NPC на Bevy 0.16.
//! Агенты — независимые entity; perception → FSM → actuation гоняются
//! системами на FixedUpdate 60Hz, без shared mutable state между агентами
//! (параллельная evaluation бесплатно из ECS scheduler).
//!
//! Engine-слой (rendering, физика, настоящий pathfinding, ассеты) — внешний:
//! он читает MovementCommand/AnimationSignals/AudioCue и владеет NavAgent
//! транспортом. В headless запусках эти роли закрывают встроенные стабы.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod ai;
pub mod audio;
pub mod combat;
pub mod components;
pub mod logger;
pub mod nav;

// Re-export базовых типов для удобства
pub use ai::{
    AiPlugin, AttackClock, AttackStarted, BehaviorConfig, BehaviorState, ConfigError, Perception,
    TargetContact,
};
pub use audio::{AgentSounds, AudioChannel, AudioClipId, AudioCue, AudioCueKind};
pub use combat::{CombatPlugin, DamageDealt, Dead, EntityDied};
pub use components::*;
pub use nav::NavAgent;

/// Порог скорости ниже которого агент считается стоящим
/// (animation/audio gating, гасит фликер на wander-точке)
pub const MOVE_EPSILON: f32 = 0.1;

/// Угловая скорость разворота на цель (slerp-фактор в секунду)
pub const FACE_TURN_RATE: f32 = 10.0;

/// Частота simulation tick (FixedUpdate)
pub const TICK_HZ: f64 = 60.0;

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(TICK_HZ))
            // Детерминистичный RNG (seed по умолчанию)
            .insert_resource(DeterministicRng::new(42))
            .add_plugins((AiPlugin, CombatPlugin));
    }
}

/// Детерминистичный RNG resource (seeded, ChaCha8)
///
/// Единственный потребитель — выбор wander-точек; одинаковый seed даёт
/// побайтово одинаковые прогоны.
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время двигается вручную ровно на один tick за app.update() — тесты
/// и headless прогоны детерминированы и не зависят от wall clock.
pub fn create_headless_app(seed: u64) -> App {
    logger::init_logger();

    let tick = Duration::from_secs_f64(1.0 / TICK_HZ);

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(tick))
        .insert_resource(Time::<Fixed>::from_hz(TICK_HZ))
        .insert_resource(DeterministicRng::new(seed))
        .add_plugins((AiPlugin, CombatPlugin));

    // Warm-up: первый update только инициализирует Time<Real> (delta == 0,
    // FixedUpdate не гоняется). Прогоняем его здесь, чтобы каждый
    // caller-visible app.update() двигал ровно один tick.
    app.update();

    app
}
