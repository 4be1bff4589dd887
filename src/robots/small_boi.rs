//! The small two-motor robot.
//!
//! Tank drive on a scaled stick with a deadzone, with the belt and arm
//! running only while their buttons are held. The drive speeds are shown on
//! the brain screen every tick. There is no exit button: the program runs
//! until the brain stops it.

use std::{ops::ControlFlow, time::Duration};

use crate::{
    config::RobotConfig,
    display::Screen,
    opcontrol::{DriverControls, curve::InputCurve, hold::DualButtonHold, run_driver_control},
    peripherals::{
        BrakeMode, Clock, Gamepad, SmartMotor,
        controller::{ControllerAxis, ControllerButton, ControllerSnapshot},
    },
    robots::{MotorRole, Robot, driver_banner, startup},
};

/// Driver mapping for the small robot.
#[derive(Debug, Clone, Copy)]
pub struct SmallBoiControls {
    curve: InputCurve,
    belt:  DualButtonHold,
    arm:   DualButtonHold,
}

impl SmallBoiControls {
    pub fn new(config: &RobotConfig) -> Self {
        Self {
            curve: InputCurve::SCALED,
            belt:  DualButtonHold::new(
                ControllerButton::ButtonL1,
                ControllerButton::ButtonL2,
                config.speeds.belt,
                BrakeMode::Hold,
            ),
            arm:   DualButtonHold::new(
                ControllerButton::ButtonR1,
                ControllerButton::ButtonR2,
                config.speeds.arm,
                BrakeMode::Hold,
            ),
        }
    }
}

impl DriverControls for SmallBoiControls {
    fn update<M: SmartMotor, S: Screen>(
        &mut self,
        snapshot: &ControllerSnapshot,
        _now: Duration,
        robot: &mut Robot<M>,
        screen: &mut S,
    ) -> ControlFlow<()> {
        let left = self.curve.apply(snapshot.axis(ControllerAxis::Axis3));
        let right = self.curve.apply(snapshot.axis(ControllerAxis::Axis2));

        screen.banner(&format!("L: {:.1} R: {:.1}", left.get(), right.get()));
        robot.drivetrain.tank(left, right);

        robot.command(MotorRole::Belt, self.belt.command(snapshot));
        robot.command(MotorRole::Arm, self.arm.command(snapshot));

        ControlFlow::Continue(())
    }
}

/// The whole program: startup, then driver control for as long as the brain
/// keeps it running.
pub async fn run<M, G, S, K>(robot: &mut Robot<M>, gamepad: &mut G, screen: &mut S, clock: &K)
where
    M: SmartMotor,
    G: Gamepad,
    S: Screen,
    K: Clock,
{
    let timing = robot.config().timing;
    startup(screen, clock, &timing).await;
    driver_banner(screen, clock, &timing).await;

    let mut controls = SmallBoiControls::new(robot.config());
    run_driver_control(&mut controls, robot, gamepad, screen, clock).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::SMALL_BOI, display::TextScreen, peripherals::Percent, sim::SimMotor};

    #[test]
    fn screen_shows_scaled_drive_speeds() {
        let mut robot =
            Robot::from_config(&SMALL_BOI, |_, spec| Ok(SimMotor::new(spec.port))).unwrap();
        let mut screen = TextScreen::new();
        let mut controls = SmallBoiControls::new(&SMALL_BOI);
        let snapshot = ControllerSnapshot::default()
            .with_axis(ControllerAxis::Axis3, 50.0)
            .with_axis(ControllerAxis::Axis2, -4.0);

        let flow = controls.update(&snapshot, Duration::ZERO, &mut robot, &mut screen);

        assert!(flow.is_continue());
        assert_eq!(screen.line(1), "L: 40.0 R: 0.0");
        assert_eq!(robot.drivetrain.left[0].velocity(), Percent::new(40.0));
        assert_eq!(
            robot.motor(MotorRole::Arm).unwrap().brake(),
            Some(BrakeMode::Hold)
        );
    }
}
