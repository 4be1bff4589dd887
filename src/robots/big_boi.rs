//! The large competition robot.
//!
//! Four-motor tank drive on the precision curve, a belt and a roller that
//! toggle on and off, and a lever that swings between two held positions.
//!
//! | Input       | Action                                  |
//! |-------------|-----------------------------------------|
//! | Axis 3 / 2  | left / right drive side                 |
//! | L1 / L2     | belt forward / reverse, again to stop   |
//! | A / X       | roller forward / reverse, again to stop |
//! | R1 / R2     | lever down / up                         |
//! | Down        | end the program                         |

use std::{ops::ControlFlow, time::Duration};

use log::info;

use crate::{
    auton::{Routine, run_routine},
    config::RobotConfig,
    display::Screen,
    opcontrol::{
        DriverControls,
        curve::InputCurve,
        run_driver_control,
        toggle::{BeltState, BeltToggle, Debounce, LeverPosition, LeverToggle, RollerToggle},
    },
    peripherals::{
        Clock, Gamepad, SmartMotor, Spin,
        controller::{ControllerAxis, ControllerButton, ControllerSnapshot},
        drivetrain::TurnDirection,
    },
    robots::{MotorRole, Robot, driver_banner, startup},
};

/// Driver mapping for the big robot.
#[derive(Debug, Clone)]
pub struct BigBoiControls {
    curve:           InputCurve,
    belt:            BeltToggle,
    roller:          RollerToggle,
    lever:           LeverToggle,
    belt_debounce:   Debounce,
    roller_debounce: Debounce,
    lever_debounce:  Debounce,
    previous:        ControllerSnapshot,
}

impl BigBoiControls {
    pub fn new(config: &RobotConfig) -> Self {
        let speeds = config.speeds;
        let debounce = Debounce::new(config.timing.debounce);
        Self {
            curve:           InputCurve::PRECISION,
            belt:            BeltToggle::new(speeds.belt),
            roller:          RollerToggle::new(speeds.roller),
            lever:           LeverToggle::new(speeds.lever_stroke, speeds.lever),
            belt_debounce:   debounce,
            roller_debounce: debounce,
            lever_debounce:  debounce,
            previous:        ControllerSnapshot::default(),
        }
    }

    pub fn belt(&self) -> BeltState { self.belt.state() }

    pub fn roller_running(&self) -> bool { self.roller.running() }

    pub fn lever(&self) -> LeverPosition { self.lever.position() }
}

impl DriverControls for BigBoiControls {
    fn update<M: SmartMotor, S: Screen>(
        &mut self,
        snapshot: &ControllerSnapshot,
        now: Duration,
        robot: &mut Robot<M>,
        _screen: &mut S,
    ) -> ControlFlow<()> {
        use ControllerButton::*;

        // Down wins over everything else read in the same tick. The loop coasts
        // the drive on exit, so skipping this tick's stick update changes nothing.
        if snapshot.pressing(ButtonDown) {
            info!("Down pressed, leaving driver control");
            return ControlFlow::Break(());
        }

        robot.drivetrain.tank(
            self.curve.apply(snapshot.axis(ControllerAxis::Axis3)),
            self.curve.apply(snapshot.axis(ControllerAxis::Axis2)),
        );

        let previous = std::mem::replace(&mut self.previous, *snapshot);
        let rising = |button| snapshot.rising(&previous, button);

        let belt = if rising(ButtonL1) {
            Some(Spin::Forward)
        } else if rising(ButtonL2) {
            Some(Spin::Reverse)
        } else {
            None
        };
        if let Some(direction) = belt {
            if self.belt_debounce.try_fire(now) {
                robot.command(MotorRole::Belt, self.belt.press(direction));
            }
        }

        // A and X both act in one tick, A first. The lockout is taken once per tick.
        let mut roller_fired = false;
        for (button, direction) in [(ButtonA, Spin::Forward), (ButtonX, Spin::Reverse)] {
            if rising(button) && (roller_fired || self.roller_debounce.try_fire(now)) {
                roller_fired = true;
                robot.command(MotorRole::Roller, self.roller.press(direction));
            }
        }

        // a press that cannot move the lever does not start a lockout
        let lever = if rising(ButtonR1) && self.lever.can_lower() {
            Some(LeverPosition::Down)
        } else if rising(ButtonR2) && self.lever.can_raise() {
            Some(LeverPosition::Up)
        } else {
            None
        };
        if let Some(target) = lever {
            if self.lever_debounce.try_fire(now) {
                let command = match target {
                    LeverPosition::Down => self.lever.lower(),
                    LeverPosition::Up => self.lever.raise(),
                };
                if let Some(command) = command {
                    robot.command(MotorRole::Lever, command);
                }
            }
        }

        ControlFlow::Continue(())
    }
}

/// Turns right then back left, 45 degrees each way at 10%.
pub fn autonomous_routine() -> Routine {
    Routine::new()
        .banner("Autonomous Mode")
        .turn_for(TurnDirection::Right, 45.0, 10.0)
        .turn_for(TurnDirection::Left, 45.0, 10.0)
        .banner("Autonomous Complete")
}

/// The whole program: startup, autonomous, then driver control until Down
/// is pressed.
pub async fn run<M, G, S, K>(robot: &mut Robot<M>, gamepad: &mut G, screen: &mut S, clock: &K)
where
    M: SmartMotor,
    G: Gamepad,
    S: Screen,
    K: Clock,
{
    let timing = robot.config().timing;
    startup(screen, clock, &timing).await;
    run_routine(&autonomous_routine(), robot, screen, clock).await;
    driver_banner(screen, clock, &timing).await;

    let mut controls = BigBoiControls::new(robot.config());
    run_driver_control(&mut controls, robot, gamepad, screen, clock).await;
    info!("{} finished", robot.config().name);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::BIG_BOI, display::TextScreen, sim::SimMotor};

    fn ms(millis: u64) -> Duration { Duration::from_millis(millis) }

    fn setup() -> (BigBoiControls, Robot<SimMotor>, TextScreen) {
        let robot = Robot::from_config(&BIG_BOI, |_, spec| Ok(SimMotor::new(spec.port))).unwrap();
        (BigBoiControls::new(&BIG_BOI), robot, TextScreen::new())
    }

    #[test]
    fn held_button_toggles_once() {
        let (mut controls, mut robot, mut screen) = setup();
        let l1 = ControllerSnapshot::pressed(&[ControllerButton::ButtonL1]);
        for tick in 0..30 {
            let _ = controls.update(&l1, ms(tick * 20), &mut robot, &mut screen);
        }
        assert_eq!(controls.belt(), BeltState::Forward);
    }

    #[test]
    fn lever_press_in_wrong_position_is_ignored() {
        let (mut controls, mut robot, mut screen) = setup();
        let idle = ControllerSnapshot::default();
        let r1 = ControllerSnapshot::pressed(&[ControllerButton::ButtonR1]);
        let r2 = ControllerSnapshot::pressed(&[ControllerButton::ButtonR2]);

        // lever starts down, so lowering does nothing and starts no lockout
        let _ = controls.update(&r1, ms(0), &mut robot, &mut screen);
        let _ = controls.update(&idle, ms(20), &mut robot, &mut screen);
        let _ = controls.update(&r2, ms(40), &mut robot, &mut screen);
        assert_eq!(controls.lever(), LeverPosition::Up);
    }

    #[test]
    fn roller_buttons_together_start_then_stop() {
        use crate::{peripherals::{BrakeMode, Percent}, sim::MotorEvent};

        let (mut controls, mut robot, mut screen) = setup();
        let both =
            ControllerSnapshot::pressed(&[ControllerButton::ButtonA, ControllerButton::ButtonX]);
        let _ = controls.update(&both, ms(0), &mut robot, &mut screen);

        assert!(!controls.roller_running());
        assert_eq!(
            robot.motor(MotorRole::Roller).unwrap().events(),
            &[
                MotorEvent::Spin(Percent::new(60.0)),
                MotorEvent::Stop(BrakeMode::Coast)
            ]
        );

        // the pair still took the lockout
        let idle = ControllerSnapshot::default();
        let a = ControllerSnapshot::pressed(&[ControllerButton::ButtonA]);
        let _ = controls.update(&idle, ms(20), &mut robot, &mut screen);
        let _ = controls.update(&a, ms(40), &mut robot, &mut screen);
        assert!(!controls.roller_running());
    }

    #[test]
    fn down_ends_driver_control() {
        let (mut controls, mut robot, mut screen) = setup();
        let down = ControllerSnapshot::pressed(&[ControllerButton::ButtonDown]);
        assert!(
            controls
                .update(&down, ms(0), &mut robot, &mut screen)
                .is_break()
        );
    }
}
