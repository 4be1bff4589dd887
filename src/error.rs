//! Error types shared across the crate.
//!
//! Device errors are never fatal inside the control loops: callers log them
//! with [`log::warn!`] and keep going. Configuration errors are reported once,
//! when a robot is built from its profile.

use crate::robots::MotorRole;

/// A failure talking to a device on the brain.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DeviceError {
    /// The smart port reported an error (unplugged, wrong device, ...).
    #[error("Smart port {port} error: {reason}")]
    Port { port: u8, reason: String },

    /// The controller could not be read.
    #[error("Controller unavailable: {0}")]
    Controller(String),

    /// The requested role has no motor wired on this robot.
    #[error("No motor assigned to {0:?}")]
    Unassigned(MotorRole),
}

/// A robot profile that cannot be wired as written.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Port {port} for {role:?} is outside 1..=21")]
    PortOutOfRange { role: MotorRole, port: u8 },

    #[error("Port {port} is assigned to both {first:?} and {second:?}")]
    DuplicatePort {
        port:   u8,
        first:  MotorRole,
        second: MotorRole,
    },

    #[error("Drive side must have between 1 and {max} motors, got {count}")]
    GroupSize { count: usize, max: usize },

    #[error("Port {port} is not available to {role:?}")]
    PortUnavailable { role: MotorRole, port: u8 },

    #[error("Drivetrain has no geometry configured")]
    MissingGeometry,

    /// A brain device other than a smart port was already claimed.
    #[error("{0} has already been taken")]
    DeviceTaken(&'static str),
}
