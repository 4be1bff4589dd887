//! Host-side stand-ins for the brain's devices.
//!
//! These implement the [`peripherals`](crate::peripherals) traits without any
//! hardware so whole programs can run on a development machine:
//!
//! - [`SimMotor`] records every command and reaches position targets
//!   instantly (unless jammed).
//! - [`ScriptedGamepad`] replays a fixed list of controller snapshots.
//! - [`SimClock`] advances virtual time on every sleep instead of waiting.

use std::{cell::RefCell, collections::VecDeque, time::Duration};

use crate::{
    error::DeviceError,
    peripherals::{
        BrakeMode, Clock, Gamepad, Percent, SmartMotor, controller::ControllerSnapshot,
    },
};

/// A command received by a [`SimMotor`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotorEvent {
    Spin(Percent),
    Stop(BrakeMode),
    MoveTo { degrees: f64, velocity: Percent },
}

/// A motor that remembers what it was told.
#[derive(Debug, Clone, Default)]
pub struct SimMotor {
    port:     u8,
    velocity: Percent,
    brake:    Option<BrakeMode>,
    position: f64,
    jammed:   bool,
    fault:    Option<String>,
    events:   Vec<MotorEvent>,
}

impl SimMotor {
    pub fn new(port: u8) -> Self {
        Self {
            port,
            ..Self::default()
        }
    }

    pub fn port(&self) -> u8 { self.port }

    /// Last commanded velocity; zero after a stop.
    pub fn velocity(&self) -> Percent { self.velocity }

    /// Brake mode of the last stop, `None` while spinning.
    pub fn brake(&self) -> Option<BrakeMode> { self.brake }

    pub fn events(&self) -> &[MotorEvent] { &self.events }

    pub fn set_position(&mut self, degrees: f64) { self.position = degrees; }

    /// Position targets are accepted but never reached.
    pub fn jam(&mut self) { self.jammed = true; }

    /// Every later command fails with a port error.
    pub fn fail_with(&mut self, reason: &str) { self.fault = Some(reason.to_owned()); }

    fn check(&self) -> Result<(), DeviceError> {
        match &self.fault {
            Some(reason) => Err(DeviceError::Port {
                port:   self.port,
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl SmartMotor for SimMotor {
    fn spin(&mut self, velocity: Percent) -> Result<(), DeviceError> {
        self.check()?;
        self.velocity = velocity;
        self.brake = None;
        self.events.push(MotorEvent::Spin(velocity));
        Ok(())
    }

    fn stop(&mut self, brake: BrakeMode) -> Result<(), DeviceError> {
        self.check()?;
        self.velocity = Percent::ZERO;
        self.brake = Some(brake);
        self.events.push(MotorEvent::Stop(brake));
        Ok(())
    }

    fn position(&self) -> Result<f64, DeviceError> {
        self.check()?;
        Ok(self.position)
    }

    fn move_to(&mut self, degrees: f64, velocity: Percent) -> Result<(), DeviceError> {
        self.check()?;
        if !self.jammed {
            self.position = degrees;
        }
        self.brake = None;
        self.events.push(MotorEvent::MoveTo { degrees, velocity });
        Ok(())
    }
}

/// Replays controller snapshots in order.
///
/// Once the script runs out every read fails, which the control loop treats
/// like a disconnected controller.
#[derive(Debug, Clone, Default)]
pub struct ScriptedGamepad {
    script: VecDeque<Result<ControllerSnapshot, DeviceError>>,
    reads:  usize,
}

impl ScriptedGamepad {
    pub fn new() -> Self { Self::default() }

    /// Adds `ticks` polls that all return `snapshot`.
    pub fn hold(mut self, snapshot: ControllerSnapshot, ticks: usize) -> Self {
        self.script.extend(std::iter::repeat_n(Ok(snapshot), ticks));
        self
    }

    /// Adds a single poll.
    pub fn then(self, snapshot: ControllerSnapshot) -> Self { self.hold(snapshot, 1) }

    /// Adds a poll that fails as if the controller were unplugged.
    pub fn disconnect(mut self) -> Self {
        self.script
            .push_back(Err(DeviceError::Controller("disconnected".to_owned())));
        self
    }

    /// Number of polls served so far.
    pub fn reads(&self) -> usize { self.reads }

    pub fn remaining(&self) -> usize { self.script.len() }
}

impl Gamepad for ScriptedGamepad {
    fn snapshot(&mut self) -> Result<ControllerSnapshot, DeviceError> {
        self.reads += 1;
        self.script
            .pop_front()
            .unwrap_or_else(|| Err(DeviceError::Controller("script exhausted".to_owned())))
    }
}

/// Virtual time that jumps forward on every sleep.
#[derive(Debug, Default)]
pub struct SimClock {
    now:    RefCell<Duration>,
    sleeps: RefCell<Vec<Duration>>,
}

impl SimClock {
    pub fn new() -> Self { Self::default() }

    /// Every sleep requested so far, in order.
    pub fn sleeps(&self) -> Vec<Duration> { self.sleeps.borrow().clone() }

    pub fn advance(&self, duration: Duration) { *self.now.borrow_mut() += duration; }
}

impl Clock for SimClock {
    fn now(&self) -> Duration { *self.now.borrow() }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
        self.advance(duration);
    }
}
