//! The small robot: driver control only.

use log::{LevelFilter, error};
use vexide::prelude::*;
use vexops::{config, fs::logger, hardware::Brain, robots::small_boi};

#[vexide::main]
async fn main(peripherals: Peripherals) {
    logger::init(LevelFilter::Info).unwrap_or_else(|e| println!("Logger Error: {}", e));

    let mut brain = match Brain::new(peripherals, &config::SMALL_BOI) {
        Ok(brain) => brain,
        Err(e) => {
            error!("Robot Setup Error: {}", e);
            return;
        }
    };
    small_boi::run(
        &mut brain.robot,
        &mut brain.controller,
        &mut brain.screen,
        &brain.clock,
    )
    .await;
}
