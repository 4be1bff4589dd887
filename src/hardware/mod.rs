//! vexide implementations of the hardware seams.
//!
//! Only built with the `hardware` feature, for the `armv7a-vex-v5` target.
//! [`Brain::new`] claims every device a [`RobotConfig`] needs and hands back
//! a robot, the primary controller, the screen and a clock, ready for the
//! program functions in [`robots`](crate::robots).
//!
//! # Example
//!
//! ```ignore
//! use vexide::prelude::*;
//! use vexops::{config, hardware::Brain, robots::big_boi};
//!
//! #[vexide::main]
//! async fn main(peripherals: Peripherals) {
//!     let mut brain = Brain::new(peripherals, &config::BIG_BOI).unwrap();
//!     big_boi::run(&mut brain.robot, &mut brain.controller, &mut brain.screen, &brain.clock)
//!         .await;
//! }
//! ```

use std::{convert::Infallible, fmt, time::Duration};

use embedded_graphics::{
    Pixel,
    pixelcolor::Rgb888,
    prelude::{DrawTarget, OriginDimensions, RgbColor, Size},
};
use log::info;
use vexide::{
    color::Rgb,
    controller::{ButtonState, Controller, ControllerState},
    display::{Display, Rect},
    math::Angle,
    peripherals::{DynamicPeripherals, Peripherals},
    smart::{
        SmartPort,
        motor::{BrakeMode as VexBrakeMode, Direction, Gearset as VexGearset, Motor},
    },
    time::{sleep, user_uptime},
};

use crate::{
    config::{MotorSpec, RobotConfig},
    display::Console,
    error::{ConfigError, DeviceError},
    peripherals::{
        BrakeMode, Clock, Gamepad, Gearset, Percent, SmartMotor,
        controller::{ControllerAxis, ControllerButton, ControllerSnapshot},
    },
    robots::Robot,
};

/// A V5 smart motor on a claimed port.
pub struct VexMotor {
    motor:   Motor,
    port:    u8,
    gearset: Gearset,
}

impl VexMotor {
    pub fn new(port: SmartPort, spec: MotorSpec) -> Self {
        let direction = if spec.reversed {
            Direction::Reverse
        } else {
            Direction::Forward
        };
        let gearset = match spec.gearset {
            Gearset::Red => VexGearset::Red,
            Gearset::Green => VexGearset::Green,
            Gearset::Blue => VexGearset::Blue,
        };
        Self {
            motor: Motor::new(port, gearset, direction),
            port: spec.port,
            gearset: spec.gearset,
        }
    }

    fn rpm(&self, velocity: Percent) -> i32 { self.gearset.rpm_for(velocity).round() as i32 }

    fn port_error(&self, e: impl fmt::Display) -> DeviceError {
        DeviceError::Port {
            port:   self.port,
            reason: e.to_string(),
        }
    }
}

impl SmartMotor for VexMotor {
    fn spin(&mut self, velocity: Percent) -> Result<(), DeviceError> {
        let rpm = self.rpm(velocity);
        self.motor.set_velocity(rpm).map_err(|e| self.port_error(e))
    }

    fn stop(&mut self, brake: BrakeMode) -> Result<(), DeviceError> {
        let mode = match brake {
            BrakeMode::Coast => VexBrakeMode::Coast,
            BrakeMode::Brake => VexBrakeMode::Brake,
            BrakeMode::Hold => VexBrakeMode::Hold,
        };
        self.motor.brake(mode).map_err(|e| self.port_error(e))
    }

    fn position(&self) -> Result<f64, DeviceError> {
        self.motor
            .position()
            .map(|angle| angle.as_degrees())
            .map_err(|e| self.port_error(e))
    }

    fn move_to(&mut self, degrees: f64, velocity: Percent) -> Result<(), DeviceError> {
        let rpm = self.rpm(velocity.abs());
        self.motor
            .set_position_target(Angle::from_degrees(degrees), rpm)
            .map_err(|e| self.port_error(e))
    }
}

/// The primary controller.
pub struct VexController {
    controller: Controller,
}

impl VexController {
    pub fn new(controller: Controller) -> Self { Self { controller } }
}

impl Gamepad for VexController {
    fn snapshot(&mut self) -> Result<ControllerSnapshot, DeviceError> {
        let state = self
            .controller
            .state()
            .map_err(|e| DeviceError::Controller(e.to_string()))?;

        let snapshot = ControllerSnapshot::default()
            .with_axis(ControllerAxis::Axis1, state.right_stick.x() * 100.0)
            .with_axis(ControllerAxis::Axis2, state.right_stick.y() * 100.0)
            .with_axis(ControllerAxis::Axis3, state.left_stick.y() * 100.0)
            .with_axis(ControllerAxis::Axis4, state.left_stick.x() * 100.0);
        Ok(ControllerButton::ALL
            .into_iter()
            .fold(snapshot, |snapshot, button| {
                snapshot.with_button(button, button_state(&state, button).is_pressed())
            }))
    }
}

fn button_state(state: &ControllerState, button: ControllerButton) -> ButtonState {
    match button {
        ControllerButton::ButtonA => state.button_a,
        ControllerButton::ButtonB => state.button_b,
        ControllerButton::ButtonX => state.button_x,
        ControllerButton::ButtonY => state.button_y,
        ControllerButton::ButtonUp => state.button_up,
        ControllerButton::ButtonDown => state.button_down,
        ControllerButton::ButtonLeft => state.button_left,
        ControllerButton::ButtonRight => state.button_right,
        ControllerButton::ButtonL1 => state.button_l1,
        ControllerButton::ButtonL2 => state.button_l2,
        ControllerButton::ButtonR1 => state.button_r1,
        ControllerButton::ButtonR2 => state.button_r2,
    }
}

/// Time since the user program started.
#[derive(Debug, Clone, Copy, Default)]
pub struct VexClock;

impl Clock for VexClock {
    fn now(&self) -> Duration { user_uptime() }

    async fn sleep(&self, duration: Duration) { sleep(duration).await; }
}

/// An embedded-graphics draw target over the brain display.
pub struct DisplayDriver {
    display: Display,
}

impl DisplayDriver {
    pub fn new(display: Display) -> Self { Self { display } }
}

impl OriginDimensions for DisplayDriver {
    fn size(&self) -> Size {
        Size::new(
            Display::HORIZONTAL_RESOLUTION as u32,
            Display::VERTICAL_RESOLUTION as u32,
        )
    }
}

impl DrawTarget for DisplayDriver {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let size = self.size();
        for Pixel(point, color) in pixels {
            if point.x < 0 ||
                point.y < 0 ||
                point.x as u32 >= size.width ||
                point.y as u32 >= size.height
            {
                continue;
            }
            let (x, y) = (point.x as i16, point.y as i16);
            self.display.fill(
                &Rect::new([x, y], [x, y]),
                Rgb::new(color.r(), color.g(), color.b()),
            );
        }
        Ok(())
    }
}

/// Everything a program runs against on the real brain.
pub struct Brain {
    pub robot:      Robot<VexMotor>,
    pub controller: VexController,
    pub screen:     Console<DisplayDriver>,
    pub clock:      VexClock,
}

impl Brain {
    /// Claims the ports in `config`, the primary controller and the display.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the profile is invalid or a device was
    /// already claimed.
    pub fn new(peripherals: Peripherals, config: &RobotConfig) -> Result<Self, ConfigError> {
        let mut dynamic = DynamicPeripherals::new(peripherals);
        let robot = Robot::from_config(config, |role, spec| {
            dynamic
                .take_smart_port(spec.port)
                .map(|port| VexMotor::new(port, spec))
                .ok_or(ConfigError::PortUnavailable {
                    role,
                    port: spec.port,
                })
        })?;
        let controller = dynamic
            .take_primary_controller()
            .ok_or(ConfigError::DeviceTaken("primary controller"))?;
        let display = dynamic
            .take_display()
            .ok_or(ConfigError::DeviceTaken("display"))?;

        info!("{} configured", config.name);
        Ok(Self {
            robot,
            controller: VexController::new(controller),
            screen: Console::new(DisplayDriver::new(display)),
            clock: VexClock,
        })
    }
}
