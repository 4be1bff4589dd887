//! Differential drivetrain control.
//!
//! This module provides the `Differential` struct for controlling robots with
//! separate left and right motor groups, commonly known as a "tank drive" or
//! "differential drive" configuration.
//!
//! # Supported Commands
//!
//! - **Tank**: each side runs at its own speed.
//! - **Drive / Turn**: all motors together, or the two sides opposed.
//! - **Drive for / Turn for**: distance and angle moves using the motors'
//!   onboard position targets and the configured [`DriveGeometry`].
//!
//! # Example
//!
//! ```ignore
//! use vexops::peripherals::{Percent, drivetrain::Differential};
//!
//! let mut drivetrain = Differential::new([left_front, left_rear], [right_front, right_rear])?;
//!
//! // In your control loop:
//! drivetrain.tank(Percent::new(left_stick), Percent::new(right_stick));
//! ```

use log::warn;

use crate::{
    config::DriveGeometry,
    error::{ConfigError, DeviceError},
    peripherals::{BrakeMode, Percent, SmartMotor, rotate_by},
};

/// Most motors a single drive side can hold.
pub const MAX_SIDE_MOTORS: usize = 4;

/// Which way a point turn goes, seen from above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnDirection {
    /// Counter-clockwise.
    Left,
    /// Clockwise.
    Right,
}

/// Position targets issued by a distance or angle move.
///
/// Entries are `None` for motors whose move could not be started.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DriveTargets {
    pub left:  heapless::Vec<Option<f64>, MAX_SIDE_MOTORS>,
    pub right: heapless::Vec<Option<f64>, MAX_SIDE_MOTORS>,
}

impl DriveTargets {
    /// Number of motors that accepted a target.
    pub fn issued(&self) -> usize { self.left.iter().chain(self.right.iter()).flatten().count() }
}

/// A differential drivetrain controller.
///
/// This struct manages a robot with separate left and right motor groups.
/// Motors that are mounted mirrored should be configured as reversed when
/// they are created, so a positive speed always moves the robot forward.
pub struct Differential<M> {
    /// The left motor group.
    pub left:  heapless::Vec<M, MAX_SIDE_MOTORS>,
    /// The right motor group.
    pub right: heapless::Vec<M, MAX_SIDE_MOTORS>,
    geometry:  Option<DriveGeometry>,
}

impl<M: SmartMotor> Differential<M> {
    /// Creates a new drivetrain with the provided left/right motors.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::GroupSize`] if a side is empty or has more than
    /// [`MAX_SIDE_MOTORS`] motors.
    pub fn new(
        left: impl IntoIterator<Item = M>,
        right: impl IntoIterator<Item = M>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            left:     collect_side(left)?,
            right:    collect_side(right)?,
            geometry: None,
        })
    }

    /// Attaches wheel and gearing dimensions for distance moves.
    pub fn with_geometry(mut self, geometry: DriveGeometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn geometry(&self) -> Option<&DriveGeometry> { self.geometry.as_ref() }

    /// Runs each side at its own speed.
    pub fn tank(&mut self, left: Percent, right: Percent) {
        spin_all(&mut self.left, left);
        spin_all(&mut self.right, right);
    }

    /// Runs every drive motor at `speed`. Negative speeds drive backwards.
    pub fn drive(&mut self, speed: Percent) { self.tank(speed, speed); }

    /// Turns in place, with the sides running at `speed` in opposition.
    pub fn turn(&mut self, direction: TurnDirection, speed: Percent) {
        let speed = speed.abs();
        match direction {
            TurnDirection::Left => self.tank(-speed, speed),
            TurnDirection::Right => self.tank(speed, -speed),
        }
    }

    /// Stops every drive motor.
    pub fn stop(&mut self, brake: BrakeMode) {
        for motor in self.left.iter_mut().chain(self.right.iter_mut()) {
            motor.stop(brake).unwrap_or_else(|e| {
                warn!("Motor Stop Error: {}", e);
            });
        }
    }

    /// Returns the average encoder position of all motors, in degrees.
    ///
    /// Motors whose position cannot be read are left out of the average
    /// with a warning. Returns `None` if no motor could be read.
    pub fn position(&self) -> Option<f64> {
        let mut sum = 0.0;
        let mut count = 0usize;
        for motor in self.left.iter().chain(self.right.iter()) {
            match motor.position() {
                Ok(degrees) => {
                    sum += degrees;
                    count += 1;
                }
                Err(e) => warn!("Error Getting Motor Encoder Position: {}", e),
            }
        }
        (count > 0).then(|| sum / count as f64)
    }

    /// Starts a straight move of `distance_mm`. Negative distances reverse.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingGeometry`] if no geometry is attached.
    pub fn drive_for(
        &mut self,
        distance_mm: f64,
        speed: Percent,
    ) -> Result<DriveTargets, ConfigError> {
        let geometry = self.geometry.ok_or(ConfigError::MissingGeometry)?;
        let degrees = geometry.motor_degrees_for_distance(distance_mm);
        Ok(self.move_sides(degrees, degrees, speed))
    }

    /// Starts a point turn of `degrees` in `direction`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingGeometry`] if no geometry is attached.
    pub fn turn_for(
        &mut self,
        direction: TurnDirection,
        degrees: f64,
        speed: Percent,
    ) -> Result<DriveTargets, ConfigError> {
        let geometry = self.geometry.ok_or(ConfigError::MissingGeometry)?;
        let travel = geometry.motor_degrees_for_turn(degrees.abs());
        Ok(match direction {
            TurnDirection::Left => self.move_sides(-travel, travel, speed),
            TurnDirection::Right => self.move_sides(travel, -travel, speed),
        })
    }

    /// True once every issued target is within `tolerance` degrees.
    ///
    /// Motors that cannot be read count as not settled.
    pub fn settled(&self, targets: &DriveTargets, tolerance: f64) -> bool {
        let side_settled = |motors: &[M], targets: &[Option<f64>]| {
            motors.iter().zip(targets).all(|(motor, target)| match target {
                Some(target) => motor
                    .position()
                    .is_ok_and(|position| (position - target).abs() <= tolerance),
                None => true,
            })
        };
        side_settled(self.left.as_slice(), targets.left.as_slice())
            && side_settled(self.right.as_slice(), targets.right.as_slice())
    }

    /// Iterates over every drive motor, left side first.
    pub fn motors_mut(&mut self) -> impl Iterator<Item = &mut M> {
        self.left.iter_mut().chain(self.right.iter_mut())
    }

    fn move_sides(&mut self, left: f64, right: f64, speed: Percent) -> DriveTargets {
        DriveTargets {
            left:  move_all(&mut self.left, left, speed),
            right: move_all(&mut self.right, right, speed),
        }
    }
}

fn collect_side<M>(
    motors: impl IntoIterator<Item = M>,
) -> Result<heapless::Vec<M, MAX_SIDE_MOTORS>, ConfigError> {
    let mut side = heapless::Vec::new();
    let mut count = 0;
    for motor in motors {
        count += 1;
        // overflow is reported below once the full count is known
        let _ = side.push(motor);
    }
    if count == 0 || count > MAX_SIDE_MOTORS {
        return Err(ConfigError::GroupSize {
            count,
            max: MAX_SIDE_MOTORS,
        });
    }
    Ok(side)
}

fn spin_all<M: SmartMotor>(motors: &mut [M], speed: Percent) {
    for motor in motors {
        motor.spin(speed).unwrap_or_else(|e| {
            warn!("Motor Spin Error: {}", e);
        });
    }
}

fn move_all<M: SmartMotor>(
    motors: &mut [M],
    degrees: f64,
    speed: Percent,
) -> heapless::Vec<Option<f64>, MAX_SIDE_MOTORS> {
    motors
        .iter_mut()
        .map(|motor| {
            rotate_by(motor, degrees, speed)
                .map_err(|e: DeviceError| warn!("Motor Move Error: {}", e))
                .ok()
        })
        .collect()
}
