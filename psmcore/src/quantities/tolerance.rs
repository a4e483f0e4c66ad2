use std::{fmt::Display, str::FromStr};

use context_error::*;
use serde::{Deserialize, Serialize};

use crate::{
    error::{PsmError, PsmErrorKind},
    sequence::{mass_to_ppm, ppm_to_mass},
};

/// A precursor mass tolerance window around a reference mass, either in Dalton or in ppm. The
/// window can be asymmetric, both sides are stored as non negative magnitudes.
/// ```rust
/// use psmcore::prelude::*;
/// let tolerance: PrecursorMassTolerance = "0.5Da,2.5Da".parse().unwrap();
/// assert!(tolerance.contains(2.0, 1000.0));
/// assert!(!tolerance.contains(-1.0, 1000.0));
/// ```
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct PrecursorMassTolerance {
    left: f64,
    right: f64,
    is_ppm: bool,
}

impl PrecursorMassTolerance {
    /// Create a new tolerance, the signs of the given sides are dropped
    pub const fn new(left: f64, right: f64, is_ppm: bool) -> Self {
        Self {
            left: left.abs(),
            right: right.abs(),
            is_ppm,
        }
    }

    /// Create a symmetric tolerance
    pub const fn symmetric(value: f64, is_ppm: bool) -> Self {
        Self::new(value, value, is_ppm)
    }

    /// The tolerance below the reference mass
    pub const fn left(&self) -> f64 {
        self.left
    }

    /// The tolerance above the reference mass
    pub const fn right(&self) -> f64 {
        self.right
    }

    /// If this tolerance is expressed in ppm (otherwise Dalton)
    pub const fn is_ppm(&self) -> bool {
        self.is_ppm
    }

    /// The (lower, upper) allowed mass error in Dalton for the given reference mass
    pub fn bounds_da(&self, reference_mass: f64) -> (f64, f64) {
        if self.is_ppm {
            (
                -ppm_to_mass(self.left, reference_mass),
                ppm_to_mass(self.right, reference_mass),
            )
        } else {
            (-self.left, self.right)
        }
    }

    /// The (lower, upper) allowed mass error in ppm for the given reference mass
    pub fn bounds_ppm(&self, reference_mass: f64) -> (f64, f64) {
        if self.is_ppm {
            (-self.left, self.right)
        } else {
            (
                -mass_to_ppm(self.left, reference_mass),
                mass_to_ppm(self.right, reference_mass),
            )
        }
    }

    /// Check if the given mass error (in Dalton, observed minus theoretical) falls within this window
    pub fn contains(&self, delta_mass: f64, reference_mass: f64) -> bool {
        let (low, high) = self.bounds_da(reference_mass);
        delta_mass >= low && delta_mass <= high
    }

    /// The largest of both sides in Dalton, used by engines that only report a single value
    pub fn max_da(&self, reference_mass: f64) -> f64 {
        let (low, high) = self.bounds_da(reference_mass);
        (-low).max(high)
    }
}

impl Display for PrecursorMassTolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let unit = if self.is_ppm { "ppm" } else { "Da" };
        if (self.left - self.right).abs() < f64::EPSILON {
            write!(f, "{}{unit}", self.left)
        } else {
            write!(f, "{}{unit},{}{unit}", self.left, self.right)
        }
    }
}

impl FromStr for PrecursorMassTolerance {
    type Err = PsmError;

    /// Parse a tolerance like `20ppm`, `20 ppm`, `0.5Da`, or `0.5Da,2.5Da` (left, right)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_side = |side: &str| -> Result<(f64, bool), PsmError> {
            let side = side.trim();
            let lower = side.to_ascii_lowercase();
            let (number, is_ppm) = if let Some(number) = lower.strip_suffix("ppm") {
                (number, true)
            } else if let Some(number) = lower.strip_suffix("da") {
                (number, false)
            } else {
                return Err(BoxedError::new(
                    PsmErrorKind::InvalidParameters,
                    "Invalid precursor tolerance",
                    "A precursor tolerance needs a unit, either 'ppm' or 'Da'",
                    Context::show(s.to_string()),
                ));
            };
            let value = number.trim().parse::<f64>().map_err(|_| {
                BoxedError::new(
                    PsmErrorKind::InvalidParameters,
                    "Invalid precursor tolerance",
                    format!("'{}' is not a valid number", number.trim()),
                    Context::show(s.to_string()),
                )
            })?;
            Ok((value, is_ppm))
        };

        match s.split_once(',') {
            Some((left, right)) => {
                let (left, left_ppm) = parse_side(left)?;
                let (right, right_ppm) = parse_side(right)?;
                if left_ppm != right_ppm {
                    return Err(BoxedError::new(
                        PsmErrorKind::InvalidParameters,
                        "Invalid precursor tolerance",
                        "Both sides of an asymmetric precursor tolerance should use the same unit",
                        Context::show(s.to_string()),
                    ));
                }
                Ok(Self::new(left, right, left_ppm))
            }
            None => {
                let (value, is_ppm) = parse_side(s)?;
                Ok(Self::symmetric(value, is_ppm))
            }
        }
    }
}

#[cfg(test)]
#[expect(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        assert_eq!(
            "20ppm".parse::<PrecursorMassTolerance>().unwrap(),
            PrecursorMassTolerance::symmetric(20.0, true)
        );
        assert_eq!(
            "20 ppm".parse::<PrecursorMassTolerance>().unwrap(),
            PrecursorMassTolerance::symmetric(20.0, true)
        );
        assert_eq!(
            "-0.5Da,2.5Da".parse::<PrecursorMassTolerance>().unwrap(),
            PrecursorMassTolerance::new(0.5, 2.5, false)
        );
        assert!("20".parse::<PrecursorMassTolerance>().is_err());
        assert!("20ppm,1Da".parse::<PrecursorMassTolerance>().is_err());
        assert!("abcppm".parse::<PrecursorMassTolerance>().is_err());
    }

    #[test]
    fn display() {
        assert_eq!(PrecursorMassTolerance::symmetric(20.0, true).to_string(), "20ppm");
        assert_eq!(
            PrecursorMassTolerance::new(0.5, 2.5, false).to_string(),
            "0.5Da,2.5Da"
        );
    }

    #[test]
    fn windows() {
        let tolerance = PrecursorMassTolerance::new(10.0, 20.0, true);
        let (low, high) = tolerance.bounds_da(1000.0);
        assert!((low + 0.01).abs() < 1e-9);
        assert!((high - 0.02).abs() < 1e-9);
        assert!(tolerance.contains(0.015, 1000.0));
        assert!(!tolerance.contains(-0.015, 1000.0));
        assert!((tolerance.max_da(1000.0) - 0.02).abs() < 1e-9);

        let tolerance = PrecursorMassTolerance::new(0.5, 2.5, false);
        assert_eq!(tolerance.bounds_da(1000.0), (-0.5, 2.5));
        let (low, high) = tolerance.bounds_ppm(1000.0);
        assert!((low + 500.0).abs() < 1e-9);
        assert!((high - 2500.0).abs() < 1e-9);
    }
}
