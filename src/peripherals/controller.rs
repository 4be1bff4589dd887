//! Controller state as seen by the driver control loop.
//!
//! A [`ControllerSnapshot`] is one poll of the controller: the four joystick
//! axes in percent and the pressed state of the twelve buttons. Edge
//! detection compares two consecutive snapshots.
//!
//! # Example
//!
//! ```ignore
//! use vexops::peripherals::controller::{ControllerAxis, ControllerButton};
//!
//! let snapshot = gamepad.snapshot()?;
//! let throttle = snapshot.axis(ControllerAxis::Axis3);
//! if snapshot.rising(&previous, ControllerButton::ButtonL1) {
//!     // L1 was just pressed
//! }
//! ```

/// A list of Controller Buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerButton {
    ButtonA,
    ButtonB,
    ButtonX,
    ButtonY,
    ButtonUp,
    ButtonDown,
    ButtonLeft,
    ButtonRight,
    ButtonL1,
    ButtonL2,
    ButtonR1,
    ButtonR2,
}

impl ControllerButton {
    pub const ALL: [ControllerButton; 12] = [
        ControllerButton::ButtonA,
        ControllerButton::ButtonB,
        ControllerButton::ButtonX,
        ControllerButton::ButtonY,
        ControllerButton::ButtonUp,
        ControllerButton::ButtonDown,
        ControllerButton::ButtonLeft,
        ControllerButton::ButtonRight,
        ControllerButton::ButtonL1,
        ControllerButton::ButtonL2,
        ControllerButton::ButtonR1,
        ControllerButton::ButtonR2,
    ];

    fn index(self) -> usize {
        match self {
            ControllerButton::ButtonA => 0,
            ControllerButton::ButtonB => 1,
            ControllerButton::ButtonX => 2,
            ControllerButton::ButtonY => 3,
            ControllerButton::ButtonUp => 4,
            ControllerButton::ButtonDown => 5,
            ControllerButton::ButtonLeft => 6,
            ControllerButton::ButtonRight => 7,
            ControllerButton::ButtonL1 => 8,
            ControllerButton::ButtonL2 => 9,
            ControllerButton::ButtonR1 => 10,
            ControllerButton::ButtonR2 => 11,
        }
    }
}

/// The joystick axes, numbered the way the controller labels them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerAxis {
    /// Right stick, horizontal.
    Axis1,
    /// Right stick, vertical.
    Axis2,
    /// Left stick, vertical.
    Axis3,
    /// Left stick, horizontal.
    Axis4,
}

/// One poll of the controller.
///
/// The default snapshot is neutral: sticks centred and nothing pressed.
/// The control loop falls back to it when the controller cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControllerSnapshot {
    axes:    [f64; 4],
    buttons: [bool; 12],
}

impl ControllerSnapshot {
    /// Axis position in percent, `[-100, 100]`.
    pub fn axis(&self, axis: ControllerAxis) -> f64 { self.axes[axis_index(axis)] }

    pub fn pressing(&self, button: ControllerButton) -> bool { self.buttons[button.index()] }

    /// True when `button` is pressed now but was not in `previous`.
    pub fn rising(&self, previous: &ControllerSnapshot, button: ControllerButton) -> bool {
        self.pressing(button) && !previous.pressing(button)
    }

    /// Sets an axis, clamping to `[-100, 100]`.
    pub fn with_axis(mut self, axis: ControllerAxis, percent: f64) -> Self {
        self.axes[axis_index(axis)] = percent.clamp(-100.0, 100.0);
        self
    }

    pub fn with_button(mut self, button: ControllerButton, pressed: bool) -> Self {
        self.buttons[button.index()] = pressed;
        self
    }

    /// Builds a snapshot with the given buttons held.
    pub fn pressed(buttons: &[ControllerButton]) -> Self {
        buttons
            .iter()
            .fold(Self::default(), |snapshot, &button| snapshot.with_button(button, true))
    }
}

fn axis_index(axis: ControllerAxis) -> usize {
    match axis {
        ControllerAxis::Axis1 => 0,
        ControllerAxis::Axis2 => 1,
        ControllerAxis::Axis3 => 2,
        ControllerAxis::Axis4 => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::{ControllerAxis::*, ControllerButton::*, *};

    #[test]
    fn rising_edge_needs_release_in_between() {
        let idle = ControllerSnapshot::default();
        let held = ControllerSnapshot::pressed(&[ButtonL1]);

        assert!(held.rising(&idle, ButtonL1));
        assert!(!held.rising(&held, ButtonL1));
        assert!(!idle.rising(&held, ButtonL1));
        assert!(!held.rising(&idle, ButtonL2));
    }

    #[test]
    fn axes_are_clamped() {
        let snapshot = ControllerSnapshot::default()
            .with_axis(Axis3, 140.0)
            .with_axis(Axis2, -35.0);
        assert_eq!(snapshot.axis(Axis3), 100.0);
        assert_eq!(snapshot.axis(Axis2), -35.0);
        assert_eq!(snapshot.axis(Axis1), 0.0);
    }

    #[test]
    fn every_button_has_its_own_slot() {
        for button in ControllerButton::ALL {
            let snapshot = ControllerSnapshot::pressed(&[button]);
            let count = ControllerButton::ALL
                .iter()
                .filter(|&&b| snapshot.pressing(b))
                .count();
            assert_eq!(count, 1, "{button:?}");
        }
    }
}
