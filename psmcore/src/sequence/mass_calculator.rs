use std::collections::HashMap;

use context_error::*;

use crate::{
    chemistry::{Element, ElementalComposition},
    error::{PsmError, PsmErrorKind},
    sequence::{ResidueDefinition, standard_residues},
};

/// The monoisotopic mass of hydrogen
pub const MASS_HYDROGEN: f64 = 1.007_825_032_07;
/// The monoisotopic mass of oxygen
pub const MASS_OXYGEN: f64 = 15.994_914_619_56;
/// The mass of a proton, the default charge carrier
pub const MASS_PROTON: f64 = 1.007_276_466_88;
/// The mass difference between C13 and C12, the spacing between isotope peaks
pub const MASS_C13_C12_DIFFERENCE: f64 = 1.003_354_83;
/// The default N terminal group mass (H)
pub const DEFAULT_N_TERMINUS_MASS: f64 = MASS_HYDROGEN;
/// The default C terminal group mass (OH)
pub const DEFAULT_C_TERMINUS_MASS: f64 = MASS_OXYGEN + MASS_HYDROGEN;

/// A modification mass placed on a peptide, as needed to calculate the peptide mass
pub trait ModificationMass {
    /// The 1 based residue location, `0` for modifications on the whole peptide
    fn location(&self) -> usize;
    /// The mass of the modification, for isotopic modifications the mass shift per affected atom
    fn mass(&self) -> f64;
    /// The atom affected by an isotopic modification
    fn affected_atom(&self) -> Option<Element>;
}

/// A simple positioned modification mass
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionedMass {
    /// The 1 based residue location, `0` for modifications on the whole peptide
    pub location: usize,
    /// The mass (shift)
    pub mass: f64,
    /// The atom affected by an isotopic modification
    pub affected_atom: Option<Element>,
}

impl ModificationMass for PositionedMass {
    fn location(&self) -> usize {
        self.location
    }
    fn mass(&self) -> f64 {
        self.mass
    }
    fn affected_atom(&self) -> Option<Element> {
        self.affected_atom
    }
}

/// Calculates theoretical monoisotopic peptide masses, with configurable residue and terminal group masses.
/// ```rust
/// use psmcore::prelude::*;
/// let calculator = PeptideMassCalculator::default();
/// let mass = calculator.compute_sequence_mass("LCDE").unwrap();
/// assert!((mass - 478.17333).abs() < 0.001);
/// ```
#[derive(Clone, Debug)]
pub struct PeptideMassCalculator {
    residues: HashMap<char, ResidueDefinition>,
    n_terminus_mass: f64,
    c_terminus_mass: f64,
    charge_carrier_mass: f64,
}

impl Default for PeptideMassCalculator {
    fn default() -> Self {
        Self {
            residues: standard_residues().into_iter().collect(),
            n_terminus_mass: DEFAULT_N_TERMINUS_MASS,
            c_terminus_mass: DEFAULT_C_TERMINUS_MASS,
            charge_carrier_mass: MASS_PROTON,
        }
    }
}

impl PeptideMassCalculator {
    /// The mass of the given residue, if defined
    pub fn residue_mass(&self, residue: char) -> Option<f64> {
        self.residues.get(&residue).map(|r| r.mass)
    }

    /// The full definition of the given residue, if defined
    pub fn residue(&self, residue: char) -> Option<&ResidueDefinition> {
        self.residues.get(&residue)
    }

    /// Override the mass of a residue, or define a new residue. A residue defined with only a
    /// mass does not contain any atoms for isotopic modifications. This is also used to give
    /// ambiguous residues an explicit zero mass.
    pub fn set_residue_mass(&mut self, residue: char, mass: f64) {
        self.residues
            .insert(residue, ResidueDefinition::from_mass(mass));
    }

    /// Override the composition of a residue, or define a new residue
    pub fn set_residue_composition(&mut self, residue: char, composition: ElementalComposition) {
        self.residues
            .insert(residue, ResidueDefinition::from_composition(composition));
    }

    /// Reset all residues to their standard definitions
    pub fn reset_residues(&mut self) {
        self.residues = standard_residues().into_iter().collect();
    }

    /// The mass of the N terminal group
    pub const fn n_terminus_mass(&self) -> f64 {
        self.n_terminus_mass
    }

    /// Set the mass of the N terminal group
    pub const fn set_n_terminus_mass(&mut self, mass: f64) {
        self.n_terminus_mass = mass;
    }

    /// The mass of the C terminal group
    pub const fn c_terminus_mass(&self) -> f64 {
        self.c_terminus_mass
    }

    /// Set the mass of the C terminal group
    pub const fn set_c_terminus_mass(&mut self, mass: f64) {
        self.c_terminus_mass = mass;
    }

    /// Set both terminal groups back to H and OH
    pub const fn reset_terminus_masses(&mut self) {
        self.n_terminus_mass = DEFAULT_N_TERMINUS_MASS;
        self.c_terminus_mass = DEFAULT_C_TERMINUS_MASS;
    }

    /// The mass of the charge carrier
    pub const fn charge_carrier_mass(&self) -> f64 {
        self.charge_carrier_mass
    }

    /// Set the mass of the charge carrier
    pub const fn set_charge_carrier_mass(&mut self, mass: f64) {
        self.charge_carrier_mass = mass;
    }

    fn residue_or_error(&self, sequence: &str, index: usize, residue: char) -> Result<&ResidueDefinition, PsmError> {
        self.residues.get(&residue).ok_or_else(|| {
            BoxedError::new(
                PsmErrorKind::InvalidResidue,
                "Invalid residue",
                format!("The residue '{residue}' does not have a defined mass"),
                Context::line(None, sequence, index, residue.len_utf8()),
            )
            .to_owned()
        })
    }

    /// The monoisotopic mass of the sequence including both terminal groups.
    /// # Errors
    /// If the sequence contains a residue without a defined mass.
    pub fn compute_sequence_mass(&self, sequence: &str) -> Result<f64, PsmError> {
        self.compute_sequence_mass_with_mods::<PositionedMass>(sequence, &[])
    }

    /// The monoisotopic mass of the sequence including both terminal groups and the given
    /// modifications. Isotopic modifications (with an affected atom) add their mass for every
    /// atom of that element in the peptide, counting the terminal groups as H and OH.
    /// # Errors
    /// If the sequence contains a residue without a defined mass, or if any modification is
    /// located beyond the end of the peptide.
    pub fn compute_sequence_mass_with_mods<M: ModificationMass>(
        &self,
        sequence: &str,
        modifications: &[M],
    ) -> Result<f64, PsmError> {
        let mut mass = self.n_terminus_mass + self.c_terminus_mass;
        let mut length = 0;
        for (index, residue) in sequence.char_indices() {
            mass += self.residue_or_error(sequence, index, residue)?.mass;
            length += 1;
        }

        let mut composition = None;
        for modification in modifications {
            if modification.location() > length {
                return Err(BoxedError::new(
                    PsmErrorKind::InvalidPosition,
                    "Invalid modification position",
                    format!(
                        "A modification at residue {} cannot be placed on a peptide of length {length}",
                        modification.location()
                    ),
                    Context::show(sequence.to_string()),
                ));
            }
            if let Some(atom) = modification.affected_atom() {
                if composition.is_none() {
                    composition = Some(self.peptide_composition(sequence)?);
                }
                let count = composition.as_ref().map_or(0, |c| c.count(atom));
                mass += f64::from(count) * modification.mass();
            } else {
                mass += modification.mass();
            }
        }
        Ok(mass)
    }

    /// The elemental composition of the peptide, with H and OH as terminal groups
    /// # Errors
    /// If the sequence contains a residue without a defined mass.
    pub fn peptide_composition(&self, sequence: &str) -> Result<ElementalComposition, PsmError> {
        let mut composition = composition!(H 2 O 1);
        for (index, residue) in sequence.char_indices() {
            composition += &self.residue_or_error(sequence, index, residue)?.composition;
        }
        Ok(composition)
    }

    /// The mass of a modification defined as a sequence of residues (eg `GG` for ubiquitination
    /// remnants), this is the sum of the residue masses without any terminal groups.
    /// # Errors
    /// If the sequence contains a residue without a defined mass, or if it is empty.
    pub fn compute_sequence_based_modifier_mass(&self, sequence: &str) -> Result<f64, PsmError> {
        if sequence.trim().is_empty() {
            return Err(BoxedError::new(
                PsmErrorKind::FormulaParse,
                "Invalid sequence based modification",
                "A sequence based modification needs at least one residue",
                Context::none(),
            ));
        }
        sequence
            .trim()
            .char_indices()
            .map(|(index, residue)| {
                self.residue_or_error(sequence.trim(), index, residue.to_ascii_uppercase())
                    .map(|r| r.mass)
            })
            .sum()
    }

    /// Recharge an m/z value using this calculator's charge carrier, see [`convolute_mass`].
    pub fn convolute_mass(&self, mz: f64, from_charge: i32, to_charge: i32) -> f64 {
        convolute_mass(mz, from_charge, to_charge, self.charge_carrier_mass)
    }
}

/// Convert an m/z at one charge to the m/z at another charge. A charge of zero denotes the neutral mass.
/// ```rust
/// use psmcore::sequence::{convolute_mass, MASS_PROTON};
/// assert!((convolute_mass(1000.0, 1, 0, MASS_PROTON) - 998.99272).abs() < 0.0001);
/// assert!((convolute_mass(500.0, 2, 1, MASS_PROTON) - 998.99272).abs() < 0.0001);
/// ```
pub fn convolute_mass(mz: f64, from_charge: i32, to_charge: i32, charge_carrier_mass: f64) -> f64 {
    let mass = if from_charge == 0 {
        mz
    } else {
        let from_charge = f64::from(from_charge);
        mz.mul_add(from_charge, -from_charge * charge_carrier_mass)
    };
    if to_charge == 0 {
        mass
    } else {
        let to_charge = f64::from(to_charge);
        to_charge.mul_add(charge_carrier_mass, mass) / to_charge
    }
}

/// Convert a mass difference in Dalton to ppm relative to the reference mass
pub fn mass_to_ppm(mass_delta: f64, reference_mass: f64) -> f64 {
    mass_delta / reference_mass * 1e6
}

/// Convert a mass difference in ppm relative to the reference mass to Dalton, the inverse of [`mass_to_ppm`]
pub fn ppm_to_mass(ppm: f64, reference_mass: f64) -> f64 {
    ppm / 1e6 * reference_mass
}

#[cfg(test)]
#[expect(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[test]
    fn sequence_masses() {
        let calculator = PeptideMassCalculator::default();
        assert!((calculator.compute_sequence_mass("LCDE").unwrap() - 478.17333).abs() < 0.001);
        assert!((calculator.compute_sequence_mass("").unwrap() - 18.010_565).abs() < 1e-6);
        let error = calculator.compute_sequence_mass("PEP1DE").unwrap_err();
        assert!(matches!(error.get_kind(), PsmErrorKind::InvalidResidue));
    }

    #[test]
    fn residue_overrides() {
        let mut calculator = PeptideMassCalculator::default();
        assert!(calculator.compute_sequence_mass("PEP*").is_err());
        calculator.set_residue_mass('*', 0.0);
        let plain = calculator.compute_sequence_mass("PEP").unwrap();
        assert!((calculator.compute_sequence_mass("PEP*").unwrap() - plain).abs() < 1e-9);
        calculator.reset_residues();
        assert!(calculator.residue_mass('*').is_none());
    }

    #[test]
    fn terminus_masses() {
        let mut calculator = PeptideMassCalculator::default();
        let normal = calculator.compute_sequence_mass("PEPTIDE").unwrap();
        calculator.set_n_terminus_mass(0.0);
        let no_n = calculator.compute_sequence_mass("PEPTIDE").unwrap();
        assert!((normal - no_n - MASS_HYDROGEN).abs() < 1e-9);
        calculator.reset_terminus_masses();
        assert!((calculator.compute_sequence_mass("PEPTIDE").unwrap() - normal).abs() < 1e-9);
    }

    #[test]
    fn modifications() {
        let calculator = PeptideMassCalculator::default();
        let plain = calculator.compute_sequence_mass("PEPTMIDE").unwrap();
        let oxidised = calculator
            .compute_sequence_mass_with_mods(
                "PEPTMIDE",
                &[PositionedMass {
                    location: 5,
                    mass: 15.994_915,
                    affected_atom: None,
                }],
            )
            .unwrap();
        assert!((oxidised - plain - 15.994_915).abs() < 1e-9);

        // 15N labelling: GG has 2 N atoms
        let labelled = calculator
            .compute_sequence_mass_with_mods(
                "GG",
                &[PositionedMass {
                    location: 0,
                    mass: 0.997_035,
                    affected_atom: Some(Element::N),
                }],
            )
            .unwrap();
        let plain = calculator.compute_sequence_mass("GG").unwrap();
        assert!((labelled - plain - 2.0 * 0.997_035).abs() < 1e-9);

        let error = calculator
            .compute_sequence_mass_with_mods(
                "GG",
                &[PositionedMass {
                    location: 3,
                    mass: 1.0,
                    affected_atom: None,
                }],
            )
            .unwrap_err();
        assert!(matches!(error.get_kind(), PsmErrorKind::InvalidPosition));
    }

    #[test]
    fn sequence_based_modifier() {
        let calculator = PeptideMassCalculator::default();
        let gg = calculator.compute_sequence_based_modifier_mass("GG").unwrap();
        assert!((gg - 114.042_927).abs() < 1e-5);
        assert!(calculator.compute_sequence_based_modifier_mass("").is_err());
        assert!(calculator.compute_sequence_based_modifier_mass("G1").is_err());
    }

    #[test]
    fn charges_and_ppm() {
        assert!((convolute_mass(1000.0, 1, 0, MASS_PROTON) - 998.99272).abs() < 0.0001);
        assert!((convolute_mass(1000.0, 0, 0, MASS_PROTON) - 1000.0).abs() < f64::EPSILON);
        let calculator = PeptideMassCalculator::default();
        let mz = calculator.convolute_mass(998.99272, 0, 2);
        assert!((calculator.convolute_mass(mz, 2, 0) - 998.99272).abs() < 1e-9);
        assert!((mass_to_ppm(0.005, 1000.0) - 5.0).abs() < 1e-4);
        for (delta, reference) in [(0.005, 1000.0), (-0.3, 421.7), (1e-5, 5000.0)] {
            let back = ppm_to_mass(mass_to_ppm(delta, reference), reference);
            assert!(((back - delta) / delta).abs() < 1e-9);
        }
    }
}
