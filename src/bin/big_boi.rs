//! The large competition robot: autonomous turn check, then driver control.

use log::{LevelFilter, error};
use vexide::prelude::*;
use vexops::{config, fs::logger, hardware::Brain, robots::big_boi};

#[vexide::main]
async fn main(peripherals: Peripherals) {
    logger::init(LevelFilter::Info).unwrap_or_else(|e| println!("Logger Error: {}", e));

    let mut brain = match Brain::new(peripherals, &config::BIG_BOI) {
        Ok(brain) => brain,
        Err(e) => {
            error!("Robot Setup Error: {}", e);
            return;
        }
    };
    big_boi::run(
        &mut brain.robot,
        &mut brain.controller,
        &mut brain.screen,
        &brain.clock,
    )
    .await;
}
