//! Momentary controls: a mechanism runs only while its button is held.

use crate::{
    opcontrol::toggle::MotorCommand,
    peripherals::{
        BrakeMode, Percent,
        controller::{ControllerButton, ControllerSnapshot},
    },
};

/// Maps 2 buttons to one motor. The forward button runs it at `+speed`, the
/// reverse button at `-speed`, and with neither held the motor stops with
/// `idle_brake`. Forward wins if both are held.
///
/// # Example
///
/// ```ignore
/// let belt = DualButtonHold::new(ButtonL1, ButtonL2, Percent::new(40.0), BrakeMode::Hold);
/// belt.command(&snapshot).apply(&mut belt_motor)?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DualButtonHold {
    pub forward:    ControllerButton,
    pub reverse:    ControllerButton,
    pub speed:      Percent,
    pub idle_brake: BrakeMode,
}

impl DualButtonHold {
    pub fn new(
        forward: ControllerButton,
        reverse: ControllerButton,
        speed: Percent,
        idle_brake: BrakeMode,
    ) -> Self {
        Self {
            forward,
            reverse,
            speed: speed.abs(),
            idle_brake,
        }
    }

    pub fn command(&self, snapshot: &ControllerSnapshot) -> MotorCommand {
        if snapshot.pressing(self.forward) {
            MotorCommand::Spin(self.speed)
        } else if snapshot.pressing(self.reverse) {
            MotorCommand::Spin(-self.speed)
        } else {
            MotorCommand::Stop(self.idle_brake)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peripherals::controller::ControllerButton::*;

    #[test]
    fn runs_only_while_held() {
        let arm = DualButtonHold::new(ButtonR1, ButtonR2, Percent::new(10.0), BrakeMode::Hold);
        assert_eq!(
            arm.command(&ControllerSnapshot::pressed(&[ButtonR1])),
            MotorCommand::Spin(Percent::new(10.0))
        );
        assert_eq!(
            arm.command(&ControllerSnapshot::pressed(&[ButtonR2])),
            MotorCommand::Spin(Percent::new(-10.0))
        );
        assert_eq!(
            arm.command(&ControllerSnapshot::pressed(&[ButtonR1, ButtonR2])),
            MotorCommand::Spin(Percent::new(10.0))
        );
        assert_eq!(
            arm.command(&ControllerSnapshot::default()),
            MotorCommand::Stop(BrakeMode::Hold)
        );
    }
}
