use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// How well the flanking residues of a peptide agree with the cleavage rule of the enzyme
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum PeptideCleavageState {
    /// Neither terminus is consistent with the cleavage rule
    #[default]
    NonSpecific,
    /// One of the termini is consistent with the cleavage rule
    Partial,
    /// Both termini are consistent with the cleavage rule
    Full,
}

impl PeptideCleavageState {
    /// The number of termini consistent with the cleavage rule
    pub const fn number_of_enzymatic_termini(self) -> u8 {
        match self {
            Self::NonSpecific => 0,
            Self::Partial => 1,
            Self::Full => 2,
        }
    }
}

impl Display for PeptideCleavageState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::NonSpecific => "NonSpecific",
                Self::Partial => "Partial",
                Self::Full => "Full",
            }
        )
    }
}

/// If a peptide is located at the terminus of its protein
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum PeptideTerminusState {
    /// Not located at either protein terminus
    #[default]
    None,
    /// Located at the protein N terminus
    ProteinNTerminus,
    /// Located at the protein C terminus
    ProteinCTerminus,
    /// The peptide spans the whole protein
    ProteinNandCCTerminus,
}

impl PeptideTerminusState {
    /// Combine the N and C terminal flags
    pub const fn new(protein_n_terminus: bool, protein_c_terminus: bool) -> Self {
        match (protein_n_terminus, protein_c_terminus) {
            (false, false) => Self::None,
            (true, false) => Self::ProteinNTerminus,
            (false, true) => Self::ProteinCTerminus,
            (true, true) => Self::ProteinNandCCTerminus,
        }
    }

    /// If the peptide starts at the protein N terminus
    pub const fn is_protein_n_terminus(self) -> bool {
        matches!(self, Self::ProteinNTerminus | Self::ProteinNandCCTerminus)
    }

    /// If the peptide ends at the protein C terminus
    pub const fn is_protein_c_terminus(self) -> bool {
        matches!(self, Self::ProteinCTerminus | Self::ProteinNandCCTerminus)
    }
}

impl Display for PeptideTerminusState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::None => "None",
                Self::ProteinNTerminus => "ProteinNTerminus",
                Self::ProteinCTerminus => "ProteinCTerminus",
                Self::ProteinNandCCTerminus => "ProteinNandCCTerminus",
            }
        )
    }
}

/// The terminal context of a single residue in a peptide
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum ResidueTerminusState {
    /// An internal residue
    #[default]
    None,
    /// The first residue of the peptide
    PeptideNTerminus,
    /// The last residue of the peptide
    PeptideCTerminus,
    /// The first residue of the peptide, which is also the first residue of the protein
    ProteinNTerminus,
    /// The last residue of the peptide, which is also the last residue of the protein
    ProteinCTerminus,
    /// The only residue of a peptide that spans the whole protein
    ProteinNandCCTerminus,
}

impl ResidueTerminusState {
    /// The terminal context of the residue at the 1 based `location` in a peptide of the given
    /// length and terminus state. A single residue peptide that is not at both protein termini
    /// prefers the N terminal context.
    pub const fn for_location(location: usize, length: usize, peptide: PeptideTerminusState) -> Self {
        let n = location <= 1;
        let c = location >= length;
        match (n, c) {
            (true, true) => match peptide {
                PeptideTerminusState::ProteinNandCCTerminus => Self::ProteinNandCCTerminus,
                PeptideTerminusState::ProteinNTerminus => Self::ProteinNTerminus,
                PeptideTerminusState::ProteinCTerminus => Self::ProteinCTerminus,
                PeptideTerminusState::None => Self::PeptideNTerminus,
            },
            (true, false) if peptide.is_protein_n_terminus() => Self::ProteinNTerminus,
            (true, false) => Self::PeptideNTerminus,
            (false, true) if peptide.is_protein_c_terminus() => Self::ProteinCTerminus,
            (false, true) => Self::PeptideCTerminus,
            (false, false) => Self::None,
        }
    }

    /// If this residue is at the N terminus of the peptide (and possibly the protein)
    pub const fn is_n_terminal(self) -> bool {
        matches!(
            self,
            Self::PeptideNTerminus | Self::ProteinNTerminus | Self::ProteinNandCCTerminus
        )
    }

    /// If this residue is at the C terminus of the peptide (and possibly the protein)
    pub const fn is_c_terminal(self) -> bool {
        matches!(
            self,
            Self::PeptideCTerminus | Self::ProteinCTerminus | Self::ProteinNandCCTerminus
        )
    }
}
