//! Autonomous starter program.
//!
//! Shows every verb of the [`Routine`] builder in one run on the bench
//! wiring from [`TEMPLATE_BIG`](crate::config::TEMPLATE_BIG): timed drives
//! and turns, two relative rotations of the left front motor, and a belt
//! run of five seconds.

use std::time::Duration;

use crate::{
    auton::{Routine, run_routine},
    display::Screen,
    peripherals::{BrakeMode, Clock, SmartMotor},
    robots::{MotorRole, Robot},
};

pub fn example_routine() -> Routine {
    Routine::new()
        .banner("Autonomous Started")
        .drive_forward(50.0, Duration::from_millis(2000))
        .turn_left(30.0, Duration::from_millis(1000))
        .drive_forward(60.0, Duration::from_millis(1500))
        .turn_right(30.0, Duration::from_millis(500))
        .stop_motors()
        .rotate_motor(MotorRole::LeftFront, 180.0, 50.0)
        .rotate_motor(MotorRole::LeftFront, 90.0, 35.0)
        .run_belt_motor(MotorRole::Belt, 50.0)
        .wait(Duration::from_secs(5))
        .stop_motor(MotorRole::Belt, BrakeMode::Coast)
}

pub async fn run<M, S, K>(robot: &mut Robot<M>, screen: &mut S, clock: &K)
where
    M: SmartMotor,
    S: Screen,
    K: Clock,
{
    run_routine(&example_routine(), robot, screen, clock).await;
}
