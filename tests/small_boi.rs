use std::{cell::Cell, ops::ControlFlow, time::Duration};

use futures::{FutureExt, executor::block_on, future};
use vexops::{
    config::SMALL_BOI,
    display::{Screen, TextScreen},
    opcontrol::{DriverControls, run_driver_control},
    peripherals::{
        BrakeMode, Clock, Percent, SmartMotor,
        controller::{ControllerAxis, ControllerButton::*, ControllerSnapshot},
    },
    robots::{
        MotorRole, Robot,
        small_boi::{self, SmallBoiControls},
    },
    sim::{MotorEvent, ScriptedGamepad, SimClock, SimMotor},
};

/// The small robot never leaves driver control on its own, so tests cut it
/// off after a fixed number of ticks.
struct Ticks<C> {
    inner: C,
    left:  usize,
}

impl<C: DriverControls> DriverControls for Ticks<C> {
    fn update<M: SmartMotor, S: Screen>(
        &mut self,
        snapshot: &ControllerSnapshot,
        now: Duration,
        robot: &mut Robot<M>,
        screen: &mut S,
    ) -> ControlFlow<()> {
        if self.left == 0 {
            return ControlFlow::Break(());
        }
        self.left -= 1;
        self.inner.update(snapshot, now, robot, screen)
    }
}

/// A clock that stops waking after `budget` sleeps, which parks the whole
/// program on its next sleep. The sleep that parks is still recorded.
struct StallingClock {
    inner:  SimClock,
    budget: Cell<usize>,
}

impl StallingClock {
    fn new(budget: usize) -> Self {
        Self {
            inner:  SimClock::new(),
            budget: Cell::new(budget),
        }
    }
}

impl Clock for StallingClock {
    fn now(&self) -> Duration { self.inner.now() }

    async fn sleep(&self, duration: Duration) {
        self.inner.sleep(duration).await;
        match self.budget.get() {
            0 => future::pending::<()>().await,
            left => self.budget.set(left - 1),
        }
    }
}

fn ms(millis: u64) -> Duration { Duration::from_millis(millis) }

fn robot() -> Robot<SimMotor> {
    Robot::from_config(&SMALL_BOI, |_, spec| Ok(SimMotor::new(spec.port))).unwrap()
}

#[test]
fn held_buttons_run_belt_and_arm() {
    let mut robot = robot();
    let mut screen = TextScreen::new();
    let clock = SimClock::new();
    let mut gamepad = ScriptedGamepad::new()
        .then(ControllerSnapshot::pressed(&[ButtonL2, ButtonR1]))
        .then(ControllerSnapshot::default());
    let mut controls = Ticks {
        inner: SmallBoiControls::new(&SMALL_BOI),
        left:  2,
    };

    block_on(run_driver_control(
        &mut controls,
        &mut robot,
        &mut gamepad,
        &mut screen,
        &clock,
    ));

    assert_eq!(clock.sleeps(), vec![Duration::from_millis(20); 2]);
    assert_eq!(
        robot.motor(MotorRole::Belt).unwrap().events(),
        &[
            MotorEvent::Spin(Percent::new(-40.0)),
            MotorEvent::Stop(BrakeMode::Hold)
        ]
    );
    assert_eq!(
        robot.motor(MotorRole::Arm).unwrap().events(),
        &[
            MotorEvent::Spin(Percent::new(10.0)),
            MotorEvent::Stop(BrakeMode::Hold)
        ]
    );
}

#[test]
fn screen_is_redrawn_every_tick() {
    let mut robot = robot();
    let mut screen = TextScreen::new();
    let clock = SimClock::new();
    let mut gamepad = ScriptedGamepad::new()
        .then(
            ControllerSnapshot::default()
                .with_axis(ControllerAxis::Axis3, -100.0)
                .with_axis(ControllerAxis::Axis2, 25.0),
        )
        // read by the tick that ends the first run
        .then(ControllerSnapshot::default())
        .then(ControllerSnapshot::default().with_axis(ControllerAxis::Axis3, 3.0));
    let mut controls = Ticks {
        inner: SmallBoiControls::new(&SMALL_BOI),
        left:  1,
    };

    block_on(run_driver_control(
        &mut controls,
        &mut robot,
        &mut gamepad,
        &mut screen,
        &clock,
    ));
    assert_eq!(screen.lines(), vec!["L: -80.0 R: 20.0"]);
    assert_eq!(
        robot.drivetrain.left[0].events()[0],
        MotorEvent::Spin(Percent::new(-80.0))
    );

    controls.left = 1;
    block_on(run_driver_control(
        &mut controls,
        &mut robot,
        &mut gamepad,
        &mut screen,
        &clock,
    ));
    // 3 * 0.8 is inside the deadzone
    assert_eq!(screen.lines(), vec!["L: 0.0 R: 0.0"]);
}

#[test]
fn program_shows_the_banner_before_driving() {
    let mut robot = robot();
    let mut screen = TextScreen::new();
    let clock = StallingClock::new(1);
    let mut gamepad = ScriptedGamepad::new().then(ControllerSnapshot::pressed(&[ButtonL1]));

    let finished = small_boi::run(&mut robot, &mut gamepad, &mut screen, &clock).now_or_never();

    assert!(finished.is_none());
    // parked inside the driver banner wait
    assert_eq!(clock.inner.sleeps(), vec![ms(1000), ms(5000)]);
    assert_eq!(screen.lines(), vec!["Driver Control Active"]);
    assert_eq!(gamepad.reads(), 0);
    assert!(robot.motor(MotorRole::Belt).unwrap().events().is_empty());
}

#[test]
fn program_goes_straight_to_driver_control() {
    let mut robot = robot();
    let mut screen = TextScreen::new();
    let clock = StallingClock::new(4);
    let mut gamepad = ScriptedGamepad::new().hold(
        ControllerSnapshot::pressed(&[ButtonL1]).with_axis(ControllerAxis::Axis3, 100.0),
        3,
    );

    let finished = small_boi::run(&mut robot, &mut gamepad, &mut screen, &clock).now_or_never();

    assert!(finished.is_none());
    assert_eq!(
        clock.inner.sleeps(),
        vec![ms(1000), ms(5000), ms(20), ms(20), ms(20)]
    );
    assert_eq!(gamepad.reads(), 3);
    assert_eq!(screen.lines(), vec!["L: 80.0 R: 0.0"]);
    assert_eq!(
        robot.motor(MotorRole::Belt).unwrap().velocity(),
        Percent::new(40.0)
    );
    // no autonomous phase, so the drive only ever saw speed commands
    for motor in robot.drivetrain.motors_mut() {
        assert!(motor
            .events()
            .iter()
            .all(|event| matches!(event, MotorEvent::Spin(_))));
    }
}
