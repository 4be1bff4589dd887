//! Hardware seams for the brain's devices.
//!
//! Everything the programs need from the robot goes through the traits in
//! this module: [`SmartMotor`] for motors, [`Gamepad`] for the controller and
//! [`Clock`] for time. The `hardware` module implements them with vexide;
//! the [`sim`](crate::sim) module implements them for host tests.
//!
//! # Example
//!
//! ```ignore
//! use vexops::peripherals::{Percent, SmartMotor};
//!
//! motor.spin(Percent::new(75.0))?;
//! motor.stop(BrakeMode::Hold)?;
//! ```

use std::{ops::Neg, time::Duration};

use crate::error::DeviceError;

/// Controller snapshots, buttons and axes.
pub mod controller;

/// Differential drivetrain control.
///
/// Provides the [`Differential`](drivetrain::Differential) struct for
/// robots with left and right motor groups.
pub mod drivetrain;

/// A motor speed as a percentage of the gearset's free speed.
///
/// The value is always within `[-100, 100]`; negative values spin the
/// motor in reverse.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Percent(pub(crate) f64);

impl Percent {
    pub const ZERO: Percent = Percent(0.0);
    pub const MAX: Percent = Percent(100.0);

    /// Clamps `value` into `[-100, 100]`. NaN becomes zero.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            Self::ZERO
        } else {
            Self(value.clamp(-100.0, 100.0))
        }
    }

    pub fn get(self) -> f64 { self.0 }

    /// The value as a fraction in `[-1, 1]`.
    pub fn fraction(self) -> f64 { self.0 / 100.0 }

    pub fn abs(self) -> Self { Self(self.0.abs()) }
}

impl Neg for Percent {
    type Output = Percent;

    fn neg(self) -> Percent { Percent(-self.0) }
}

impl From<f64> for Percent {
    fn from(value: f64) -> Self { Self::new(value) }
}

/// The internal gear cartridge of a V5 smart motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gearset {
    /// 36:1, 100 rpm.
    Red,
    /// 18:1, 200 rpm.
    #[default]
    Green,
    /// 6:1, 600 rpm.
    Blue,
}

impl Gearset {
    pub fn max_rpm(self) -> f64 {
        match self {
            Gearset::Red => 100.0,
            Gearset::Green => 200.0,
            Gearset::Blue => 600.0,
        }
    }

    /// Output shaft rpm for a percent velocity.
    pub fn rpm_for(self, velocity: Percent) -> f64 { velocity.fraction() * self.max_rpm() }
}

/// How a motor behaves once it is told to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrakeMode {
    /// Spin down freely.
    #[default]
    Coast,
    /// Short the windings to slow down quickly.
    Brake,
    /// Actively hold the current position.
    Hold,
}

/// Spin direction for commands that take an unsigned speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spin {
    Forward,
    Reverse,
}

impl Spin {
    /// Applies the direction to a speed magnitude.
    pub fn apply(self, speed: Percent) -> Percent {
        match self {
            Spin::Forward => speed.abs(),
            Spin::Reverse => -speed.abs(),
        }
    }
}

/// A V5 smart motor.
///
/// Positions are in degrees of the motor's output shaft, counted from
/// wherever the motor was when it was configured.
#[cfg_attr(test, mockall::automock)]
pub trait SmartMotor {
    /// Runs the motor continuously at `velocity`.
    fn spin(&mut self, velocity: Percent) -> Result<(), DeviceError>;

    /// Stops the motor with the given brake mode.
    fn stop(&mut self, brake: BrakeMode) -> Result<(), DeviceError>;

    /// Current encoder position in degrees.
    fn position(&self) -> Result<f64, DeviceError>;

    /// Sets an onboard position target in degrees. Returns immediately.
    fn move_to(&mut self, degrees: f64, velocity: Percent) -> Result<(), DeviceError>;
}

/// Starts a move of `degrees` relative to the motor's current position.
///
/// Returns the absolute target so callers can wait on it.
pub fn rotate_by<M: SmartMotor + ?Sized>(
    motor: &mut M,
    degrees: f64,
    velocity: Percent,
) -> Result<f64, DeviceError> {
    let target = motor.position()? + degrees;
    motor.move_to(target, velocity.abs())?;
    Ok(target)
}

/// A source of controller snapshots.
pub trait Gamepad {
    fn snapshot(&mut self) -> Result<controller::ControllerSnapshot, DeviceError>;
}

/// Time since program start, and a way to wait.
#[allow(async_fn_in_trait)]
pub trait Clock {
    fn now(&self) -> Duration;

    async fn sleep(&self, duration: Duration);
}
