//! The squashing function applied at every unit.
//!
//! The network uses a single fixed [logistic function]
//! (https://en.wikipedia.org/wiki/Logistic_function) for every layer.

/// Clamp bounds keeping the squashed output inside the open interval (0, 1).
/// Past `|x|` of roughly 37 the raw quotient rounds to exactly 0.0 or 1.0,
/// collapsing the derivative at a saturated unit to zero.
const FLOOR: f64 = f64::MIN_POSITIVE;
const CEILING: f64 = 1.0 - f64::EPSILON / 2.0;

/// Evaluates the logistic function `1 / (1 + e^-x)`, clamped to the nearest
/// representable values inside `(0, 1)` at saturation.
pub fn activate(x: f64) -> f64 {
    (1.0 / (1.0 + (-x).exp())).clamp(FLOOR, CEILING)
}

/// Evaluates the derivative of the logistic function.
///
/// Note that this takes the *pre-activation* sum, not the squashed output.
/// Training passes retain every pre-activation value (theta) exactly so that
/// the derivative can be evaluated here during backpropagation.
pub fn activate_derivative(x: f64) -> f64 {
    let y = activate(x);
    y * (1.0 - y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activation_is_bounded() {
        for &x in &[-50.0, -10.0, -1.5, 0.0, 1.5, 10.0, 50.0] {
            let y = activate(x);
            assert!(y > 0.0 && y < 1.0, "activate({}) = {}", x, y);
        }
    }

    #[test]
    fn derivative_is_bounded() {
        for &x in &[-50.0, -10.0, -1.5, 0.0, 1.5, 10.0, 50.0] {
            let dy = activate_derivative(x);
            assert!(dy > 0.0 && dy <= 0.25, "activate_derivative({}) = {}", x, dy);
        }
    }

    #[test]
    fn saturated_inputs_stay_inside_open_interval() {
        for &x in &[37.0, 50.0, 710.0, 1000.0] {
            assert!(activate(x) < 1.0, "activate({}) saturated high", x);
            assert!(activate(-x) > 0.0, "activate({}) saturated low", -x);
            assert!(activate_derivative(x) > 0.0);
            assert!(activate_derivative(-x) > 0.0);
        }
    }

    #[test]
    fn derivative_peaks_at_zero() {
        assert_eq!(activate_derivative(0.0), 0.25);
    }

    #[test]
    fn activation_is_deterministic() {
        for &x in &[-3.25, 0.1, 7.75] {
            assert_eq!(activate(x).to_bits(), activate(x).to_bits());
        }
    }
}
