//! Headless прогон симуляции
//!
//! Один враждебный агент + неподвижная цель, 1000 тиков, прогресс в консоль.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

use hexenhaus_ai::{
    logger, BehaviorState, Health, Hostile, PlayerTarget, SimulationPlugin, TICK_HZ,
};

fn main() {
    logger::init_logger();
    println!("Starting HEXENHAUS headless simulation");

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / TICK_HZ,
        )))
        .add_plugins(SimulationPlugin);

    let agent = app
        .world_mut()
        .spawn((Hostile, Transform::from_xyz(0.0, 0.0, 20.0)))
        .id();
    app.world_mut()
        .spawn((PlayerTarget, Health::new(100), Transform::from_xyz(0.0, 0.0, 0.0)));

    for tick in 0..1000 {
        app.update();

        if tick % 100 == 0 {
            let state = app.world().get::<BehaviorState>(agent);
            println!("Tick {}: agent state {:?}", tick, state);
        }
    }

    println!("Simulation complete!");
}
