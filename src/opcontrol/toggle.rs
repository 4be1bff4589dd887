//! Toggled mechanisms.
//!
//! Each mechanism is a small state machine that turns a button press into a
//! [`MotorCommand`]. The state machines never touch hardware themselves, so
//! the driver loop decides when to apply the command and what to do with a
//! device error.
//!
//! Presses are edge-triggered by the caller and rate-limited with a
//! [`Debounce`] per mechanism.

use std::time::Duration;

use log::debug;

use crate::{
    error::DeviceError,
    peripherals::{BrakeMode, Percent, SmartMotor, Spin, rotate_by},
};

/// Lets an action through at most once per `interval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debounce {
    interval: Duration,
    last:     Option<Duration>,
}

impl Debounce {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Returns true and starts a new interval if the previous one is over.
    pub fn try_fire(&mut self, now: Duration) -> bool {
        match self.last {
            Some(last) if now.saturating_sub(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

/// Something to do with one motor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotorCommand {
    Spin(Percent),
    Stop(BrakeMode),
    /// Move by `degrees` from the current position and hold there.
    ///
    /// The onboard position controller keeps holding the target once it is
    /// reached, so no separate stop is issued.
    RotateAndHold { degrees: f64, velocity: Percent },
}

impl MotorCommand {
    pub fn apply<M: SmartMotor + ?Sized>(self, motor: &mut M) -> Result<(), DeviceError> {
        match self {
            MotorCommand::Spin(velocity) => motor.spin(velocity),
            MotorCommand::Stop(brake) => motor.stop(brake),
            MotorCommand::RotateAndHold { degrees, velocity } => {
                rotate_by(motor, degrees, velocity).map(|_| ())
            }
        }
    }
}

/// What the belt is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BeltState {
    #[default]
    Off,
    Forward,
    Reverse,
}

/// A belt with separate forward and reverse buttons.
///
/// Pressing the button for the direction the belt is already running stops
/// it; pressing the other one switches direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeltToggle {
    state: BeltState,
    speed: Percent,
}

impl BeltToggle {
    pub fn new(speed: Percent) -> Self {
        Self {
            state: BeltState::Off,
            speed,
        }
    }

    pub fn state(&self) -> BeltState { self.state }

    pub fn press(&mut self, direction: Spin) -> MotorCommand {
        let wanted = match direction {
            Spin::Forward => BeltState::Forward,
            Spin::Reverse => BeltState::Reverse,
        };
        if self.state == wanted {
            self.state = BeltState::Off;
            debug!("belt off");
            MotorCommand::Stop(BrakeMode::Coast)
        } else {
            self.state = wanted;
            debug!("belt {:?}", wanted);
            MotorCommand::Spin(direction.apply(self.speed))
        }
    }
}

/// A roller that either button starts and either button stops.
///
/// Only "running" is tracked, not the direction: the reverse button stops a
/// roller that is running forward rather than reversing it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollerToggle {
    running: bool,
    speed:   Percent,
}

impl RollerToggle {
    pub fn new(speed: Percent) -> Self {
        Self {
            running: false,
            speed,
        }
    }

    pub fn running(&self) -> bool { self.running }

    pub fn press(&mut self, direction: Spin) -> MotorCommand {
        self.running = !self.running;
        if self.running {
            debug!("roller {:?}", direction);
            MotorCommand::Spin(direction.apply(self.speed))
        } else {
            debug!("roller off");
            MotorCommand::Stop(BrakeMode::Coast)
        }
    }
}

/// The two rest positions of the lever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeverPosition {
    Up,
    Down,
}

/// A lever that swings a fixed stroke between two held positions.
///
/// Lowering moves the motor `+stroke` degrees and is only possible from
/// [`LeverPosition::Up`]; raising moves `-stroke` and is only possible from
/// [`LeverPosition::Down`]. The lever starts down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeverToggle {
    position: LeverPosition,
    stroke:   f64,
    speed:    Percent,
}

impl LeverToggle {
    pub fn new(stroke: f64, speed: Percent) -> Self {
        Self {
            position: LeverPosition::Down,
            stroke,
            speed,
        }
    }

    pub fn position(&self) -> LeverPosition { self.position }

    pub fn can_lower(&self) -> bool { self.position == LeverPosition::Up }

    pub fn can_raise(&self) -> bool { self.position == LeverPosition::Down }

    pub fn lower(&mut self) -> Option<MotorCommand> {
        self.can_lower().then(|| {
            self.position = LeverPosition::Down;
            debug!("lever down");
            self.stroke_command(self.stroke)
        })
    }

    pub fn raise(&mut self) -> Option<MotorCommand> {
        self.can_raise().then(|| {
            self.position = LeverPosition::Up;
            debug!("lever up");
            self.stroke_command(-self.stroke)
        })
    }

    fn stroke_command(&self, degrees: f64) -> MotorCommand {
        MotorCommand::RotateAndHold {
            degrees,
            velocity: self.speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::peripherals::MockSmartMotor;

    fn ms(millis: u64) -> Duration { Duration::from_millis(millis) }

    #[test]
    fn debounce_blocks_inside_interval() {
        let mut debounce = Debounce::new(ms(300));
        assert!(debounce.try_fire(ms(1000)));
        assert!(!debounce.try_fire(ms(1200)));
        assert!(!debounce.try_fire(ms(1299)));
        assert!(debounce.try_fire(ms(1300)));
    }

    #[test]
    fn belt_cycles_through_states() {
        let mut belt = BeltToggle::new(Percent::new(75.0));
        assert_eq!(belt.press(Spin::Forward), MotorCommand::Spin(Percent::new(75.0)));
        assert_eq!(belt.state(), BeltState::Forward);

        // reverse while running forward switches direction
        assert_eq!(belt.press(Spin::Reverse), MotorCommand::Spin(Percent::new(-75.0)));
        assert_eq!(belt.state(), BeltState::Reverse);

        assert_eq!(belt.press(Spin::Reverse), MotorCommand::Stop(BrakeMode::Coast));
        assert_eq!(belt.state(), BeltState::Off);
    }

    #[test]
    fn roller_reverse_stops_forward_run() {
        let mut roller = RollerToggle::new(Percent::new(60.0));
        assert_eq!(roller.press(Spin::Forward), MotorCommand::Spin(Percent::new(60.0)));
        assert_eq!(roller.press(Spin::Reverse), MotorCommand::Stop(BrakeMode::Coast));
        assert!(!roller.running());
        assert_eq!(roller.press(Spin::Reverse), MotorCommand::Spin(Percent::new(-60.0)));
    }

    #[test]
    fn lever_moves_only_between_positions() {
        let mut lever = LeverToggle::new(50.0, Percent::new(80.0));
        assert_eq!(lever.position(), LeverPosition::Down);
        assert_eq!(lever.lower(), None);

        assert_eq!(
            lever.raise(),
            Some(MotorCommand::RotateAndHold {
                degrees:  -50.0,
                velocity: Percent::new(80.0),
            })
        );
        assert_eq!(lever.raise(), None);
        assert_eq!(lever.position(), LeverPosition::Up);

        assert!(matches!(
            lever.lower(),
            Some(MotorCommand::RotateAndHold { degrees, .. }) if degrees == 50.0
        ));
    }

    #[test]
    fn commands_reach_the_motor() {
        let mut motor = MockSmartMotor::new();
        motor
            .expect_spin()
            .with(eq(Percent::new(-75.0)))
            .times(1)
            .returning(|_| Ok(()));
        motor
            .expect_stop()
            .with(eq(BrakeMode::Coast))
            .times(1)
            .returning(|_| Ok(()));
        motor.expect_position().return_const(Ok(10.0));
        motor
            .expect_move_to()
            .with(eq(-40.0), eq(Percent::new(80.0)))
            .times(1)
            .returning(|_, _| Ok(()));

        MotorCommand::Spin(Percent::new(-75.0)).apply(&mut motor).unwrap();
        MotorCommand::Stop(BrakeMode::Coast).apply(&mut motor).unwrap();
        MotorCommand::RotateAndHold {
            degrees:  -50.0,
            velocity: Percent::new(80.0),
        }
        .apply(&mut motor)
        .unwrap();
    }

    #[test]
    fn device_errors_are_returned() {
        let mut motor = MockSmartMotor::new();
        motor.expect_spin().returning(|_| {
            Err(DeviceError::Port {
                port:   13,
                reason: "unplugged".into(),
            })
        });
        assert!(MotorCommand::Spin(Percent::MAX).apply(&mut motor).is_err());
    }
}
