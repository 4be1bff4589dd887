//! Robot profiles: which motor sits on which port, and the constants each
//! program runs with.
//!
//! Profiles are plain `const` data. [`RobotConfig::validate`] is called when
//! a robot is built so a mis-wired profile is reported once at startup
//! instead of as a stream of port errors in the control loop.

use std::time::Duration;

use crate::{
    error::ConfigError,
    peripherals::{Gearset, Percent},
    robots::MotorRole,
};

/// Highest smart port number on the V5 brain.
pub const MAX_PORT: u8 = 21;

/// How one motor is plugged in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorSpec {
    pub port:     u8,
    pub gearset:  Gearset,
    /// Mounted mirrored, so positive commands spin it backwards.
    pub reversed: bool,
}

impl MotorSpec {
    /// A Green (18:1) motor, the cartridge every profile here uses.
    pub const fn green(port: u8, reversed: bool) -> Self {
        Self {
            port,
            gearset: Gearset::Green,
            reversed,
        }
    }
}

/// Physical dimensions used to turn distances into motor rotations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveGeometry {
    /// Wheel circumference in millimetres.
    pub wheel_travel_mm:   f64,
    /// Distance between the left and right wheels.
    pub track_width_mm:    f64,
    /// Distance between the front and rear axles.
    pub wheel_base_mm:     f64,
    /// Motor turns per wheel turn.
    pub external_ratio:    f64,
}

impl DriveGeometry {
    /// Motor-shaft degrees needed to roll `distance_mm`.
    pub fn motor_degrees_for_distance(&self, distance_mm: f64) -> f64 {
        distance_mm / self.wheel_travel_mm * 360.0 * self.external_ratio
    }

    /// Motor-shaft degrees each side needs for a point turn of `degrees`.
    pub fn motor_degrees_for_turn(&self, degrees: f64) -> f64 {
        let arc = degrees / 360.0 * std::f64::consts::PI * self.track_width_mm;
        self.motor_degrees_for_distance(arc)
    }
}

/// Loop and pause lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Sleep between controller polls.
    pub loop_interval:  Duration,
    /// Minimum time between two actions of the same toggle.
    pub debounce:       Duration,
    /// Pause after "Program Started".
    pub startup_delay:  Duration,
    /// Pause after "Driver Control Active".
    pub driver_banner:  Duration,
}

impl Timing {
    pub const fn with_driver_banner(driver_banner: Duration) -> Self {
        Self {
            loop_interval: Duration::from_millis(20),
            debounce: Duration::from_millis(300),
            startup_delay: Duration::from_millis(1000),
            driver_banner,
        }
    }
}

impl Default for Timing {
    fn default() -> Self { Self::with_driver_banner(Duration::from_millis(3000)) }
}

/// Speeds for the driver-controlled mechanisms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MechanismSpeeds {
    pub belt:         Percent,
    pub roller:       Percent,
    pub lever:        Percent,
    pub arm:          Percent,
    /// Lever travel between its two positions, in motor degrees.
    pub lever_stroke: f64,
}

/// A complete robot profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobotConfig {
    pub name:        &'static str,
    pub left_front:  Option<MotorSpec>,
    pub left_rear:   Option<MotorSpec>,
    pub right_front: Option<MotorSpec>,
    pub right_rear:  Option<MotorSpec>,
    pub belt:        Option<MotorSpec>,
    pub roller:      Option<MotorSpec>,
    pub lever:       Option<MotorSpec>,
    pub arm:         Option<MotorSpec>,
    pub geometry:    Option<DriveGeometry>,
    pub speeds:      MechanismSpeeds,
    pub timing:      Timing,
}

impl RobotConfig {
    /// Every wired motor with its role, drive motors first.
    pub fn assignments(&self) -> impl Iterator<Item = (MotorRole, MotorSpec)> + '_ {
        [
            (MotorRole::LeftFront, self.left_front),
            (MotorRole::LeftRear, self.left_rear),
            (MotorRole::RightFront, self.right_front),
            (MotorRole::RightRear, self.right_rear),
            (MotorRole::Belt, self.belt),
            (MotorRole::Roller, self.roller),
            (MotorRole::Lever, self.lever),
            (MotorRole::Arm, self.arm),
        ]
        .into_iter()
        .filter_map(|(role, spec)| spec.map(|spec| (role, spec)))
    }

    pub fn spec(&self, role: MotorRole) -> Option<MotorSpec> {
        self.assignments()
            .find(|(assigned, _)| *assigned == role)
            .map(|(_, spec)| spec)
    }

    /// Checks port ranges, port reuse and drive side sizes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen: heapless::Vec<(u8, MotorRole), 8> = heapless::Vec::new();
        for (role, spec) in self.assignments() {
            if !(1..=MAX_PORT).contains(&spec.port) {
                return Err(ConfigError::PortOutOfRange {
                    role,
                    port: spec.port,
                });
            }
            if let Some(&(_, first)) = seen.iter().find(|(port, _)| *port == spec.port) {
                return Err(ConfigError::DuplicatePort {
                    port: spec.port,
                    first,
                    second: role,
                });
            }
            // at most eight roles exist, so this cannot overflow
            let _ = seen.push((spec.port, role));
        }

        for side in [
            [self.left_front, self.left_rear],
            [self.right_front, self.right_rear],
        ] {
            let count = side.iter().flatten().count();
            if count == 0 {
                return Err(ConfigError::GroupSize {
                    count,
                    max: crate::peripherals::drivetrain::MAX_SIDE_MOTORS,
                });
            }
        }
        Ok(())
    }
}

const DEFAULT_SPEEDS: MechanismSpeeds = MechanismSpeeds {
    belt:         Percent(75.0),
    roller:       Percent(60.0),
    lever:        Percent(80.0),
    arm:          Percent(10.0),
    lever_stroke: 50.0,
};

/// The large competition robot.
pub const BIG_BOI: RobotConfig = RobotConfig {
    name:        "big_boi",
    left_front:  Some(MotorSpec::green(15, true)),
    left_rear:   Some(MotorSpec::green(14, true)),
    right_front: Some(MotorSpec::green(18, false)),
    right_rear:  Some(MotorSpec::green(19, false)),
    belt:        Some(MotorSpec::green(13, false)),
    roller:      Some(MotorSpec::green(20, false)),
    lever:       Some(MotorSpec::green(11, false)),
    arm:         None,
    geometry:    Some(DriveGeometry {
        wheel_travel_mm: 326.17,
        track_width_mm:  431.8,
        wheel_base_mm:   282.58,
        external_ratio:  2.67,
    }),
    speeds:      DEFAULT_SPEEDS,
    timing:      Timing::with_driver_banner(Duration::from_millis(3000)),
};

/// The small two-motor robot.
pub const SMALL_BOI: RobotConfig = RobotConfig {
    name:        "small_boi",
    left_front:  None,
    left_rear:   Some(MotorSpec::green(9, false)),
    right_front: None,
    right_rear:  Some(MotorSpec::green(1, true)),
    belt:        Some(MotorSpec::green(2, false)),
    roller:      None,
    lever:       None,
    arm:         Some(MotorSpec::green(10, false)),
    geometry:    None,
    speeds:      MechanismSpeeds {
        belt: Percent(40.0),
        ..DEFAULT_SPEEDS
    },
    timing:      Timing::with_driver_banner(Duration::from_millis(5000)),
};

/// Bench wiring used with the autonomous function template, big chassis.
pub const TEMPLATE_BIG: RobotConfig = RobotConfig {
    name:        "template_big",
    left_front:  Some(MotorSpec::green(1, true)),
    left_rear:   Some(MotorSpec::green(2, true)),
    right_front: Some(MotorSpec::green(3, false)),
    right_rear:  Some(MotorSpec::green(4, false)),
    belt:        Some(MotorSpec::green(5, false)),
    roller:      None,
    lever:       Some(MotorSpec::green(8, false)),
    arm:         None,
    geometry:    None,
    speeds:      DEFAULT_SPEEDS,
    timing:      Timing::with_driver_banner(Duration::from_millis(3000)),
};

/// Bench wiring used with the autonomous function template, small chassis.
pub const TEMPLATE_SMALL: RobotConfig = RobotConfig {
    name:        "template_small",
    left_front:  Some(MotorSpec::green(1, false)),
    left_rear:   None,
    right_front: Some(MotorSpec::green(3, true)),
    right_rear:  None,
    belt:        None,
    roller:      None,
    lever:       None,
    arm:         Some(MotorSpec::green(8, false)),
    geometry:    None,
    speeds:      DEFAULT_SPEEDS,
    timing:      Timing::with_driver_banner(Duration::from_millis(3000)),
};
