//! Joystick response curves.
//!
//! Raw stick positions are percentages in `[-100, 100]`. A curve maps them to
//! a motor [`Percent`], trading top speed for precision near the centre.

use crate::peripherals::Percent;

/// A joystick-to-speed mapping.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputCurve {
    /// Pass the stick straight through.
    #[default]
    Identity,
    /// Cubic below `threshold`, linear above it.
    ///
    /// Inside the threshold the output is `v³ / threshold³`, reaching 1% at
    /// the threshold. Past it the output is `v * linear_gain`, so a 20 / 0.8
    /// curve steps from 1% to 16.8% as the stick leaves the cubic band.
    CubicLinear { threshold: f64, linear_gain: f64 },
    /// Scale by `gain`, then zero anything smaller than `deadzone`.
    Linear { gain: f64, deadzone: f64 },
}

impl InputCurve {
    /// The big robot's precision curve.
    pub const PRECISION: InputCurve = InputCurve::CubicLinear {
        threshold:   20.0,
        linear_gain: 0.8,
    };

    /// The small robot's scaled stick with a deadzone.
    pub const SCALED: InputCurve = InputCurve::Linear {
        gain:     0.8,
        deadzone: 5.0,
    };

    pub fn apply(&self, value: f64) -> Percent {
        let output = match *self {
            InputCurve::Identity => value,
            InputCurve::CubicLinear {
                threshold,
                linear_gain,
            } => {
                if value.abs() <= threshold {
                    value.powi(3) / threshold.powi(3)
                } else {
                    value * linear_gain
                }
            }
            InputCurve::Linear { gain, deadzone } => {
                let scaled = value * gain;
                if scaled.abs() < deadzone { 0.0 } else { scaled }
            }
        };
        Percent::new(output)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn precision_curve_is_cubic_inside_threshold() {
        let curve = InputCurve::PRECISION;
        assert_relative_eq!(curve.apply(20.0).get(), 1.0);
        assert_relative_eq!(curve.apply(-20.0).get(), -1.0);
        assert_relative_eq!(curve.apply(10.0).get(), 0.125);
        assert_eq!(curve.apply(0.0), Percent::ZERO);
    }

    #[test]
    fn precision_curve_is_linear_outside_threshold() {
        let curve = InputCurve::PRECISION;
        assert_relative_eq!(curve.apply(21.0).get(), 16.8);
        assert_relative_eq!(curve.apply(100.0).get(), 80.0);
        assert_relative_eq!(curve.apply(-100.0).get(), -80.0);
    }

    #[test]
    fn scaled_curve_deadzone() {
        let curve = InputCurve::SCALED;
        // 6 * 0.8 = 4.8 is inside the deadzone
        assert_eq!(curve.apply(6.0), Percent::ZERO);
        assert_relative_eq!(curve.apply(7.0).get(), 5.6);
        assert_relative_eq!(curve.apply(-50.0).get(), -40.0);
    }

    #[test]
    fn output_stays_in_range() {
        let curve = InputCurve::Linear {
            gain:     3.0,
            deadzone: 0.0,
        };
        assert_eq!(curve.apply(90.0).get(), 100.0);
        assert_eq!(InputCurve::Identity.apply(-180.0).get(), -100.0);
    }
}
