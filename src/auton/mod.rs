//! Scripted autonomous routines.
//!
//! A [`Routine`] is a list of [`Step`]s built with the same verbs the robot
//! programs use (`drive_forward`, `turn_left`, `rotate_motor`, ...).
//! [`run_routine`] plays it back against a [`Robot`].
//!
//! Timed steps run the motors, sleep, and stop. Position steps set onboard
//! motor targets and poll every [`SETTLE_POLL`] until each targeted motor is
//! within [`SETTLE_TOLERANCE`] degrees, giving up after a timeout derived
//! from the size and speed of the move.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use vexops::auton::{Routine, run_routine};
//!
//! let routine = Routine::new()
//!     .banner("Autonomous Started")
//!     .drive_forward(50.0, Duration::from_millis(2000))
//!     .turn_left(30.0, Duration::from_millis(1000))
//!     .stop_motors();
//! run_routine(&routine, &mut robot, &mut screen, &clock).await;
//! ```

use std::time::Duration;

use log::{debug, info, warn};

use crate::{
    display::Screen,
    opcontrol::toggle::MotorCommand,
    peripherals::{
        BrakeMode, Clock, Gearset, Percent, SmartMotor,
        drivetrain::{DriveTargets, TurnDirection},
        rotate_by,
    },
    robots::{MotorRole, Robot},
};

/// How close a position move must get to count as finished, in degrees.
pub const SETTLE_TOLERANCE: f64 = 3.0;
/// Time between position checks while a move is running.
pub const SETTLE_POLL: Duration = Duration::from_millis(10);
/// Shortest timeout any position move gets.
pub const MIN_MOVE_TIMEOUT: Duration = Duration::from_millis(500);

/// Brake applied when a timed or position move ends. A plain motor stop
/// coasts on the brain, so routines do the same.
const END_OF_MOVE: BrakeMode = BrakeMode::Coast;

/// One action of an autonomous routine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Clear the screen and print a line at the top.
    Banner(&'static str),
    /// Run every drive motor at `speed` for `duration`, then stop.
    Drive { speed: Percent, duration: Duration },
    /// Turn in place at `speed` for `duration`, then stop.
    Turn {
        direction: TurnDirection,
        speed:     Percent,
        duration:  Duration,
    },
    /// Stop every drive motor.
    StopDrive,
    /// Roll a measured distance using the drive geometry.
    DriveFor { distance_mm: f64, speed: Percent },
    /// Turn a measured angle using the drive geometry.
    TurnFor {
        direction: TurnDirection,
        degrees:   f64,
        speed:     Percent,
    },
    /// Move one motor by `degrees`, wait for it to arrive, then stop it.
    RotateMotor {
        role:    MotorRole,
        degrees: f64,
        speed:   Percent,
    },
    /// Spin one motor until a later step stops it.
    RunMotor { role: MotorRole, speed: Percent },
    StopMotor { role: MotorRole, brake: BrakeMode },
    Wait(Duration),
}

/// An ordered list of steps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Routine {
    steps: Vec<Step>,
}

impl Routine {
    pub fn new() -> Self { Self::default() }

    pub fn then(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn banner(self, text: &'static str) -> Self { self.then(Step::Banner(text)) }

    /// Drives straight for `duration`. Negative speeds drive backwards.
    pub fn drive_forward(self, speed: impl Into<Percent>, duration: Duration) -> Self {
        self.then(Step::Drive {
            speed: speed.into(),
            duration,
        })
    }

    pub fn turn_left(self, speed: impl Into<Percent>, duration: Duration) -> Self {
        self.timed_turn(TurnDirection::Left, speed.into(), duration)
    }

    pub fn turn_right(self, speed: impl Into<Percent>, duration: Duration) -> Self {
        self.timed_turn(TurnDirection::Right, speed.into(), duration)
    }

    /// Stops every drive motor.
    pub fn stop_motors(self) -> Self { self.then(Step::StopDrive) }

    pub fn drive_for(self, distance_mm: f64, speed: impl Into<Percent>) -> Self {
        self.then(Step::DriveFor {
            distance_mm,
            speed: speed.into(),
        })
    }

    pub fn turn_for(self, direction: TurnDirection, degrees: f64, speed: impl Into<Percent>) -> Self {
        self.then(Step::TurnFor {
            direction,
            degrees,
            speed: speed.into(),
        })
    }

    pub fn rotate_motor(self, role: MotorRole, degrees: f64, speed: impl Into<Percent>) -> Self {
        self.then(Step::RotateMotor {
            role,
            degrees,
            speed: speed.into(),
        })
    }

    /// Starts `role` spinning and moves on immediately.
    pub fn run_belt_motor(self, role: MotorRole, speed: impl Into<Percent>) -> Self {
        self.then(Step::RunMotor {
            role,
            speed: speed.into(),
        })
    }

    pub fn stop_motor(self, role: MotorRole, brake: BrakeMode) -> Self {
        self.then(Step::StopMotor { role, brake })
    }

    pub fn wait(self, duration: Duration) -> Self { self.then(Step::Wait(duration)) }

    pub fn steps(&self) -> &[Step] { &self.steps }

    /// Sum of every fixed-length step. Position moves are not counted since
    /// their length depends on the robot.
    pub fn total_timed_duration(&self) -> Duration {
        self.steps
            .iter()
            .map(|step| match *step {
                Step::Drive { duration, .. } | Step::Turn { duration, .. } | Step::Wait(duration) => {
                    duration
                }
                _ => Duration::ZERO,
            })
            .sum()
    }

    fn timed_turn(self, direction: TurnDirection, speed: Percent, duration: Duration) -> Self {
        self.then(Step::Turn {
            direction,
            speed,
            duration,
        })
    }
}

/// How long a position move of `degrees` at `speed` may take before it is
/// abandoned: twice the time at full commanded speed, and never less than
/// [`MIN_MOVE_TIMEOUT`].
pub fn move_timeout(degrees: f64, speed: Percent, gearset: Gearset) -> Duration {
    // rpm * 6 = degrees per second
    let degrees_per_second = gearset.rpm_for(speed.abs()) * 6.0;
    if degrees_per_second <= 0.0 {
        return MIN_MOVE_TIMEOUT;
    }
    let millis = (2000.0 * degrees.abs() / degrees_per_second).ceil() as u64;
    Duration::from_millis(millis).max(MIN_MOVE_TIMEOUT)
}

/// Runs every step of `routine` in order.
///
/// Device errors and missing motors are logged and the affected step is
/// skipped; the routine itself always runs to the end.
pub async fn run_routine<M, S, K>(routine: &Routine, robot: &mut Robot<M>, screen: &mut S, clock: &K)
where
    M: SmartMotor,
    S: Screen,
    K: Clock,
{
    info!("Routine started with {} steps", routine.steps().len());
    for step in routine.steps() {
        debug!("step {:?}", step);
        run_step(*step, robot, screen, clock).await;
    }
    info!("Routine finished");
}

async fn run_step<M, S, K>(step: Step, robot: &mut Robot<M>, screen: &mut S, clock: &K)
where
    M: SmartMotor,
    S: Screen,
    K: Clock,
{
    match step {
        Step::Banner(text) => screen.banner(text),
        Step::Drive { speed, duration } => {
            robot.drivetrain.drive(speed);
            clock.sleep(duration).await;
            robot.drivetrain.stop(END_OF_MOVE);
        }
        Step::Turn {
            direction,
            speed,
            duration,
        } => {
            robot.drivetrain.turn(direction, speed);
            clock.sleep(duration).await;
            robot.drivetrain.stop(END_OF_MOVE);
        }
        Step::StopDrive => robot.drivetrain.stop(END_OF_MOVE),
        Step::DriveFor { distance_mm, speed } => {
            let geometry = robot.drivetrain.geometry().copied();
            match robot.drivetrain.drive_for(distance_mm, speed) {
                Ok(targets) => {
                    let degrees = geometry
                        .map(|g| g.motor_degrees_for_distance(distance_mm))
                        .unwrap_or_default();
                    settle_drive(robot, &targets, degrees, speed, clock).await;
                }
                Err(e) => warn!("Drive For Error: {}", e),
            }
        }
        Step::TurnFor {
            direction,
            degrees,
            speed,
        } => {
            let geometry = robot.drivetrain.geometry().copied();
            match robot.drivetrain.turn_for(direction, degrees, speed) {
                Ok(targets) => {
                    let travel = geometry
                        .map(|g| g.motor_degrees_for_turn(degrees.abs()))
                        .unwrap_or_default();
                    settle_drive(robot, &targets, travel, speed, clock).await;
                }
                Err(e) => warn!("Turn For Error: {}", e),
            }
        }
        Step::RotateMotor {
            role,
            degrees,
            speed,
        } => rotate_motor(robot, role, degrees, speed, clock).await,
        Step::RunMotor { role, speed } => robot.command(role, MotorCommand::Spin(speed)),
        Step::StopMotor { role, brake } => robot.command(role, MotorCommand::Stop(brake)),
        Step::Wait(duration) => clock.sleep(duration).await,
    }
}

async fn settle_drive<M: SmartMotor, K: Clock>(
    robot: &mut Robot<M>,
    targets: &DriveTargets,
    degrees: f64,
    speed: Percent,
    clock: &K,
) {
    if targets.issued() > 0 {
        let gearset = drive_gearset(robot);
        let timeout = move_timeout(degrees, speed, gearset);
        let drivetrain = &robot.drivetrain;
        if !wait_until(clock, timeout, || drivetrain.settled(targets, SETTLE_TOLERANCE)).await {
            warn!("Drive move timed out after {:?}", timeout);
        }
    }
    robot.drivetrain.stop(END_OF_MOVE);
}

async fn rotate_motor<M: SmartMotor, K: Clock>(
    robot: &mut Robot<M>,
    role: MotorRole,
    degrees: f64,
    speed: Percent,
    clock: &K,
) {
    let started = robot
        .motor_mut(role)
        .and_then(|motor| rotate_by(motor, degrees, speed));
    let target = match started {
        Ok(target) => target,
        Err(e) => {
            warn!("Rotate {:?} skipped: {}", role, e);
            return;
        }
    };

    let gearset = robot.config().spec(role).map(|spec| spec.gearset).unwrap_or_default();
    let timeout = move_timeout(degrees, speed, gearset);
    if let Ok(motor) = robot.motor(role) {
        let arrived = wait_until(clock, timeout, || {
            motor
                .position()
                .is_ok_and(|position| (position - target).abs() <= SETTLE_TOLERANCE)
        })
        .await;
        if !arrived {
            warn!("Rotate {:?} timed out after {:?}", role, timeout);
        }
    }
    robot.command(role, MotorCommand::Stop(END_OF_MOVE));
}

/// Polls `done` until it returns true or `timeout` passes. Returns whether
/// it finished in time.
async fn wait_until<K: Clock>(clock: &K, timeout: Duration, mut done: impl FnMut() -> bool) -> bool {
    let start = clock.now();
    loop {
        if done() {
            return true;
        }
        if clock.now().saturating_sub(start) >= timeout {
            return false;
        }
        clock.sleep(SETTLE_POLL).await;
    }
}

fn drive_gearset<M: SmartMotor>(robot: &Robot<M>) -> Gearset {
    robot
        .config()
        .assignments()
        .next()
        .map(|(_, spec)| spec.gearset)
        .unwrap_or_default()
}
