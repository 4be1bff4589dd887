//! The robots and their programs.
//!
//! A [`Robot`] owns every motor of one chassis, addressed by [`MotorRole`].
//! It is built from a [`RobotConfig`] and a motor factory, so the same
//! program code runs against vexide motors on the brain and simulated
//! motors in tests.
//!
//! - [`big_boi`]: autonomous turn check, then tank drive with belt, roller
//!   and lever toggles.
//! - [`small_boi`]: tank drive with hold-to-run belt and arm.
//! - [`template`]: the autonomous function library and its example routine.

use log::{info, warn};

use crate::{
    config::{MotorSpec, RobotConfig, Timing},
    display::Screen,
    error::{ConfigError, DeviceError},
    opcontrol::toggle::MotorCommand,
    peripherals::{Clock, SmartMotor, drivetrain::Differential},
};

pub mod big_boi;
pub mod small_boi;
pub mod template;

/// A named job a motor does on the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotorRole {
    LeftFront,
    LeftRear,
    RightFront,
    RightRear,
    Belt,
    Roller,
    Lever,
    Arm,
}

impl MotorRole {
    fn drive_slot(self) -> Option<usize> {
        match self {
            MotorRole::LeftFront => Some(0),
            MotorRole::LeftRear => Some(1),
            MotorRole::RightFront => Some(2),
            MotorRole::RightRear => Some(3),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Every motor on one robot.
pub struct Robot<M> {
    pub drivetrain: Differential<M>,
    belt:           Option<M>,
    roller:         Option<M>,
    lever:          Option<M>,
    arm:            Option<M>,
    /// Where each drive role sits inside the drivetrain groups.
    drive_slots:    [Option<(Side, usize)>; 4],
    config:         RobotConfig,
}

impl<M: SmartMotor> Robot<M> {
    /// Validates `config` and creates each wired motor with `make_motor`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] from validation or from the
    /// factory.
    pub fn from_config<F>(config: &RobotConfig, mut make_motor: F) -> Result<Self, ConfigError>
    where
        F: FnMut(MotorRole, MotorSpec) -> Result<M, ConfigError>,
    {
        config.validate()?;

        let mut left = Vec::new();
        let mut right = Vec::new();
        let mut drive_slots = [None; 4];
        for (role, spec, side) in [
            (MotorRole::LeftFront, config.left_front, Side::Left),
            (MotorRole::LeftRear, config.left_rear, Side::Left),
            (MotorRole::RightFront, config.right_front, Side::Right),
            (MotorRole::RightRear, config.right_rear, Side::Right),
        ] {
            let Some(spec) = spec else { continue };
            let motor = make_motor(role, spec)?;
            let group = match side {
                Side::Left => &mut left,
                Side::Right => &mut right,
            };
            if let Some(slot) = role.drive_slot() {
                drive_slots[slot] = Some((side, group.len()));
            }
            group.push(motor);
        }

        let mut drivetrain = Differential::new(left, right)?;
        if let Some(geometry) = config.geometry {
            drivetrain = drivetrain.with_geometry(geometry);
        }

        let mut build = |role, spec: Option<MotorSpec>| {
            spec.map(|spec| make_motor(role, spec)).transpose()
        };
        Ok(Self {
            drivetrain,
            belt: build(MotorRole::Belt, config.belt)?,
            roller: build(MotorRole::Roller, config.roller)?,
            lever: build(MotorRole::Lever, config.lever)?,
            arm: build(MotorRole::Arm, config.arm)?,
            drive_slots,
            config: *config,
        })
    }

    pub fn config(&self) -> &RobotConfig { &self.config }

    pub fn motor(&self, role: MotorRole) -> Result<&M, DeviceError> {
        let motor = match role.drive_slot() {
            Some(slot) => match self.drive_slots[slot] {
                Some((Side::Left, index)) => self.drivetrain.left.get(index),
                Some((Side::Right, index)) => self.drivetrain.right.get(index),
                None => None,
            },
            None => match role {
                MotorRole::Belt => self.belt.as_ref(),
                MotorRole::Roller => self.roller.as_ref(),
                MotorRole::Lever => self.lever.as_ref(),
                _ => self.arm.as_ref(),
            },
        };
        motor.ok_or(DeviceError::Unassigned(role))
    }

    pub fn motor_mut(&mut self, role: MotorRole) -> Result<&mut M, DeviceError> {
        let motor = match role.drive_slot() {
            Some(slot) => match self.drive_slots[slot] {
                Some((Side::Left, index)) => self.drivetrain.left.get_mut(index),
                Some((Side::Right, index)) => self.drivetrain.right.get_mut(index),
                None => None,
            },
            None => match role {
                MotorRole::Belt => self.belt.as_mut(),
                MotorRole::Roller => self.roller.as_mut(),
                MotorRole::Lever => self.lever.as_mut(),
                _ => self.arm.as_mut(),
            },
        };
        motor.ok_or(DeviceError::Unassigned(role))
    }

    /// Sends `command` to the motor in `role`, logging any failure.
    pub fn command(&mut self, role: MotorRole, command: MotorCommand) {
        if let Err(e) = self
            .motor_mut(role)
            .and_then(|motor| command.apply(motor))
        {
            warn!("{:?} Command Error: {}", role, e);
        }
    }
}

/// Announces the program on the screen and waits out the startup delay.
pub async fn startup<S: Screen, K: Clock>(screen: &mut S, clock: &K, timing: &Timing) {
    info!("Program Started");
    screen.banner("Program Started");
    clock.sleep(timing.startup_delay).await;
}

/// Tells the driver the controller is live, after the banner pause.
pub async fn driver_banner<S: Screen, K: Clock>(screen: &mut S, clock: &K, timing: &Timing) {
    info!("Driver Control Active");
    screen.banner("Driver Control Active");
    clock.sleep(timing.driver_banner).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{BIG_BOI, SMALL_BOI},
        peripherals::{BrakeMode, Percent},
        sim::SimMotor,
    };

    fn sim(config: &RobotConfig) -> Robot<SimMotor> {
        Robot::from_config(config, |_, spec| Ok(SimMotor::new(spec.port))).unwrap()
    }

    #[test]
    fn roles_resolve_to_their_ports() {
        let robot = sim(&BIG_BOI);
        for (role, port) in [
            (MotorRole::LeftFront, 15),
            (MotorRole::LeftRear, 14),
            (MotorRole::RightFront, 18),
            (MotorRole::RightRear, 19),
            (MotorRole::Belt, 13),
            (MotorRole::Roller, 20),
            (MotorRole::Lever, 11),
        ] {
            assert_eq!(robot.motor(role).unwrap().port(), port, "{role:?}");
        }
        assert_eq!(robot.motor(MotorRole::Arm).err(), Some(DeviceError::Unassigned(MotorRole::Arm)));
        assert!(robot.drivetrain.geometry().is_some());
    }

    #[test]
    fn small_robot_has_one_motor_per_side() {
        let robot = sim(&SMALL_BOI);
        assert_eq!(robot.drivetrain.left.len(), 1);
        assert_eq!(robot.drivetrain.right.len(), 1);
        assert_eq!(robot.motor(MotorRole::LeftRear).unwrap().port(), 9);
        assert!(robot.motor(MotorRole::LeftFront).is_err());
        assert_eq!(robot.motor(MotorRole::Arm).unwrap().port(), 10);
    }

    #[test]
    fn factory_errors_abort_construction() {
        let result = Robot::<SimMotor>::from_config(&SMALL_BOI, |role, spec| {
            if role == MotorRole::Arm {
                Err(ConfigError::PortUnavailable { role, port: spec.port })
            } else {
                Ok(SimMotor::new(spec.port))
            }
        });
        assert!(matches!(result, Err(ConfigError::PortUnavailable { port: 10, .. })));
    }

    #[test]
    fn command_to_missing_role_is_ignored() {
        let mut robot = sim(&SMALL_BOI);
        robot.command(MotorRole::Roller, MotorCommand::Spin(Percent::MAX));
        robot.command(MotorRole::Belt, MotorCommand::Stop(BrakeMode::Hold));
        assert_eq!(robot.motor(MotorRole::Belt).unwrap().brake(), Some(BrakeMode::Hold));
    }
}
