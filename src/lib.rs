//! # vexops
//!
//! Driver control and autonomous programs for VEX V5 competition robots,
//! built on top of [Vexide](https://vexide.dev).
//!
//! - **Robot profiles**: typed, validated port and speed tables for each
//!   robot.
//! - **Driver Control**: tank drive through joystick curves, toggled and
//!   held mechanisms, polled at a fixed rate.
//! - **Autonomous**: scripted routines of timed and position moves.
//! - **Display**: a small text console on the V5 Brain display using
//!   [`embedded-graphics`](https://crates.io/crates/embedded-graphics).
//! - **Logging**: console and SD card logging.
//!
//! The programs only talk to hardware through the traits in
//! [`peripherals`], so everything except the [`hardware`] bindings builds
//! and tests on a host machine. Enable the `hardware` feature to build the
//! robot binaries.
//!
//! ## Quick Start
//!
//! ```ignore
//! use vexide::prelude::*;
//! use vexops::{config, fs::logger, hardware::Brain, robots::big_boi};
//!
//! #[vexide::main]
//! async fn main(peripherals: Peripherals) {
//!     logger::init(log::LevelFilter::Info).unwrap_or_else(|e| println!("Logger Error: {}", e));
//!     let mut brain = Brain::new(peripherals, &config::BIG_BOI).unwrap();
//!     big_boi::run(&mut brain.robot, &mut brain.controller, &mut brain.screen, &brain.clock)
//!         .await;
//! }
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Robot profiles.
//! - [`peripherals`]: Hardware seams and the differential drivetrain.
//! - [`opcontrol`]: Driver control loop, curves and toggles.
//! - [`auton`]: Autonomous routines.
//! - [`robots`]: The robots and their programs.
//! - [`display`]: Text output on the brain screen.
//! - [`fs`]: Logging.

/// Scripted autonomous routines.
///
/// Provides the [`Routine`](auton::Routine) builder and
/// [`run_routine`](auton::run_routine), which plays a routine back with
/// settle-or-timeout waits on position moves.
pub mod auton;

/// Robot profiles.
///
/// Port maps, drive geometry, mechanism speeds and loop timing for each
/// robot, as `const` data checked by
/// [`RobotConfig::validate`](config::RobotConfig::validate).
pub mod config;

/// V5 Brain display output.
///
/// A cursor-addressed text screen, and a console that draws it onto any
/// [`embedded-graphics`](https://crates.io/crates/embedded-graphics) target.
pub mod display;

/// Error types for device access and robot configuration.
pub mod error;

/// Filesystem utilities module.
///
/// Contains the logger that records robot telemetry and debug information
/// to the console and the V5 Brain's SD card.
pub mod fs;

/// vexide bindings for the hardware seams.
#[cfg(feature = "hardware")]
pub mod hardware;

/// Operator control utilities module.
///
/// Turns controller snapshots into drivetrain and mechanism commands during
/// driver control, with joystick curves, debounced toggles and held
/// buttons.
pub mod opcontrol;

/// Hardware seams: motors, controller and clock.
///
/// Also provides the [`Differential`](peripherals::drivetrain::Differential)
/// drivetrain built on top of them.
pub mod peripherals;

/// The robots and their programs.
pub mod robots;

/// Simulated motors, controller and clock for running programs off the
/// robot.
pub mod sim;
