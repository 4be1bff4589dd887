//! Runs the example autonomous routine once on the bench chassis.

use log::{LevelFilter, error};
use vexide::prelude::*;
use vexops::{config, fs::logger, hardware::Brain, robots::template};

#[vexide::main]
async fn main(peripherals: Peripherals) {
    logger::init(LevelFilter::Debug).unwrap_or_else(|e| println!("Logger Error: {}", e));

    let mut brain = match Brain::new(peripherals, &config::TEMPLATE_BIG) {
        Ok(brain) => brain,
        Err(e) => {
            error!("Robot Setup Error: {}", e);
            return;
        }
    };
    template::run(&mut brain.robot, &mut brain.screen, &brain.clock).await;
}
