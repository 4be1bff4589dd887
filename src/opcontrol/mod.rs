//! Operator control for driver control periods.
//!
//! This module turns controller input into robot actions during the
//! driver-controlled portion of a match.
//!
//! # Features
//!
//! - **Input curves**: joystick-to-speed scaling for the drivetrain.
//! - **Toggles**: edge-triggered, debounced two- and three-state mechanisms.
//! - **Momentary controls**: mechanisms that run while a button is held.
//! - **Polling loop**: [`run_driver_control`] reads the controller, hands the
//!   snapshot to a [`DriverControls`] implementation and sleeps, until the
//!   controls ask to stop.
//!
//! # Example
//!
//! ```ignore
//! use vexops::opcontrol::run_driver_control;
//!
//! let mut controls = BigBoiControls::new(&config::BIG_BOI);
//! run_driver_control(&mut controls, &mut robot, &mut gamepad, &mut screen, &clock).await;
//! ```

use std::{ops::ControlFlow, time::Duration};

use log::{info, warn};

use crate::{
    display::Screen,
    peripherals::{BrakeMode, Clock, Gamepad, SmartMotor, controller::ControllerSnapshot},
    robots::Robot,
};

/// Joystick response curves.
///
/// Provides [`InputCurve`](curve::InputCurve) with the cubic/linear precision
/// curve and the linear curve with deadzone.
pub mod curve;

/// Momentary dual-button motor control.
pub mod hold;

/// Toggled mechanisms and the [`MotorCommand`](toggle::MotorCommand) they
/// produce.
pub mod toggle;

/// One robot's mapping from controller input to actions.
pub trait DriverControls {
    /// Handles one controller poll taken at `now`.
    ///
    /// Returns [`ControlFlow::Break`] to end driver control.
    fn update<M: SmartMotor, S: Screen>(
        &mut self,
        snapshot: &ControllerSnapshot,
        now: Duration,
        robot: &mut Robot<M>,
        screen: &mut S,
    ) -> ControlFlow<()>;
}

/// Polls the controller at the robot's loop interval until `controls`
/// breaks, then lets the drivetrain coast.
///
/// A controller that cannot be read is treated as centred sticks with no
/// buttons held, and a warning is logged.
pub async fn run_driver_control<C, M, G, S, K>(
    controls: &mut C,
    robot: &mut Robot<M>,
    gamepad: &mut G,
    screen: &mut S,
    clock: &K,
) where
    C: DriverControls,
    M: SmartMotor,
    G: Gamepad,
    S: Screen,
    K: Clock,
{
    let interval = robot.config().timing.loop_interval;
    info!("Driver control loop started");
    loop {
        let snapshot = gamepad.snapshot().unwrap_or_else(|e| {
            warn!("Controller State Error: {}", e);
            ControllerSnapshot::default()
        });

        if controls.update(&snapshot, clock.now(), robot, screen).is_break() {
            break;
        }
        clock.sleep(interval).await;
    }
    robot.drivetrain.stop(BrakeMode::Coast);
    info!("Driver control loop ended");
}
