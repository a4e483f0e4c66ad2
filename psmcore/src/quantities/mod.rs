mod isotope_correction;
mod tolerance;

pub use isotope_correction::*;
pub use tolerance::*;

/// Round a value to the given number of digits after the decimal point
pub fn round_to_digits(value: f64, digits: u8) -> f64 {
    let factor = 10_f64.powi(i32::from(digits));
    (value * factor).round() / factor
}

/// Check if two masses are equal after rounding their difference to the given number of digits
/// ```rust
/// use psmcore::quantities::masses_equal;
/// assert!(masses_equal(15.9949, 15.995, 3));
/// assert!(!masses_equal(15.9949, 15.985, 3));
/// assert!(masses_equal(15.9949, 15.99, 1));
/// ```
pub fn masses_equal(a: f64, b: f64, digits: u8) -> bool {
    round_to_digits((a - b).abs(), digits) == 0.0
}
