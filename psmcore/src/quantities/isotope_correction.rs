//! Correction of the mass error for precursors where a non monoisotopic peak was selected

use crate::sequence::{MASS_C13_C12_DIFFERENCE, mass_to_ppm};

/// The result of correcting a mass error for isotope selection errors
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IsotopeCorrection {
    /// The mass error in Dalton after correction, always within [-0.5, 0.5] for finite input
    pub corrected_delta_mass: f64,
    /// The number of isotope spacings that were removed (positive) or added (negative)
    pub correction_count: i32,
}

/// Shift a mass error (observed minus theoretical, in Dalton) by whole C13-C12 isotope spacings
/// until it falls within [-0.5, 0.5].
pub fn correct_isotope_selection(delta_mass: f64) -> IsotopeCorrection {
    let mut corrected_delta_mass = delta_mass;
    let mut correction_count = 0;
    if delta_mass.is_finite() {
        while corrected_delta_mass > 0.5 {
            corrected_delta_mass -= MASS_C13_C12_DIFFERENCE;
            correction_count += 1;
        }
        while corrected_delta_mass < -0.5 {
            corrected_delta_mass += MASS_C13_C12_DIFFERENCE;
            correction_count -= 1;
        }
    }
    IsotopeCorrection {
        corrected_delta_mass,
        correction_count,
    }
}

/// The outcome of [`compute_del_m_corrected_ppm`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeltaMassPpm {
    /// The mass error in Dalton (the isotope corrected error when the correction is applied)
    pub delta_mass: f64,
    /// The mass error in ppm
    pub ppm: f64,
    /// The precursor monoisotopic mass, adjusted for the isotope correction when applied
    pub precursor_monoisotopic_mass: f64,
    /// The number of isotope spacings the precursor was off
    pub correction_count: i32,
}

/// Compute the mass error in ppm of a precursor relative to the theoretical peptide mass,
/// correcting for isotope selection errors. When `adjust_precursor_mass` is set and the raw error
/// is off by one or more isotope spacings, the precursor mass is moved by that many spacings
/// before the error is recomputed.
/// ```rust
/// use psmcore::prelude::*;
/// // The second isotope was selected as precursor
/// let result = compute_del_m_corrected_ppm(1.00435, 1001.00435, 1000.0, true);
/// assert_eq!(result.correction_count, 1);
/// assert!((result.ppm - 1.0).abs() < 0.01);
/// ```
pub fn compute_del_m_corrected_ppm(
    delta_mass: f64,
    precursor_monoisotopic_mass: f64,
    peptide_monoisotopic_mass: f64,
    adjust_precursor_mass: bool,
) -> DeltaMassPpm {
    let correction = correct_isotope_selection(delta_mass);
    let (precursor_monoisotopic_mass, delta_mass) =
        if correction.correction_count != 0 && adjust_precursor_mass {
            let adjusted = precursor_monoisotopic_mass
                - f64::from(correction.correction_count) * MASS_C13_C12_DIFFERENCE;
            (adjusted, adjusted - peptide_monoisotopic_mass)
        } else {
            (precursor_monoisotopic_mass, delta_mass)
        };
    DeltaMassPpm {
        delta_mass,
        ppm: mass_to_ppm(delta_mass, peptide_monoisotopic_mass),
        precursor_monoisotopic_mass,
        correction_count: correction.correction_count,
    }
}

#[cfg(test)]
#[expect(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[test]
    fn converges() {
        for delta in [-12.3, -3.01, -0.51, -0.5, 0.0, 0.2, 0.5, 0.51, 1.0034, 2.0067, 250.7] {
            let correction = correct_isotope_selection(delta);
            assert!(
                (-0.5..=0.5).contains(&correction.corrected_delta_mass),
                "{delta} gave {}",
                correction.corrected_delta_mass
            );
        }
        assert_eq!(correct_isotope_selection(0.0).correction_count, 0);
        assert_eq!(correct_isotope_selection(2.0067).correction_count, 2);
        assert_eq!(correct_isotope_selection(-1.0034).correction_count, -1);
        assert_eq!(correct_isotope_selection(f64::NAN).correction_count, 0);
    }

    #[test]
    fn ppm() {
        let result = compute_del_m_corrected_ppm(0.005, 1000.005, 1000.0, true);
        assert_eq!(result.correction_count, 0);
        assert!((result.ppm - 5.0).abs() < 1e-4);

        let shifted = 1000.0 + 2.0 * MASS_C13_C12_DIFFERENCE + 0.003;
        let result = compute_del_m_corrected_ppm(shifted - 1000.0, shifted, 1000.0, true);
        assert_eq!(result.correction_count, 2);
        assert!((result.delta_mass - 0.003).abs() < 1e-9);
        assert!((result.ppm - 3.0).abs() < 1e-4);
        assert!((result.precursor_monoisotopic_mass - 1000.003).abs() < 1e-9);

        let result = compute_del_m_corrected_ppm(shifted - 1000.0, shifted, 1000.0, false);
        assert_eq!(result.correction_count, 2);
        assert!((result.delta_mass - (shifted - 1000.0)).abs() < 1e-9);
        assert!((result.precursor_monoisotopic_mass - shifted).abs() < 1e-9);
    }
}
