use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::TextNumber;

/// One PSM as read from a search engine result file, before annotation
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct RawPsmRow {
    /// The scan number
    pub scan: usize,
    /// The precursor charge
    pub charge: i32,
    /// The peptide in the notation of the search engine, optionally with flanking residues (`K.M*PEPTIDE.R`)
    pub sequence: String,
    /// The protein name(s)
    pub proteins: Vec<String>,
    /// The engine specific score columns, in the order they were read
    pub scores: IndexMap<String, TextNumber>,
    /// The observed precursor m/z
    pub precursor_mz: Option<f64>,
    /// The mass error (observed minus theoretical, in Dalton) as reported by the search engine
    pub mass_error: Option<f64>,
    /// The modifications from a separate column, for engines that do not write them in the sequence
    pub modifications: Option<String>,
}

impl RawPsmRow {
    /// Create a row with the required fields
    pub fn new(scan: usize, charge: i32, sequence: impl Into<String>) -> Self {
        Self {
            scan,
            charge,
            sequence: sequence.into(),
            ..Self::default()
        }
    }

    /// Add a protein
    #[must_use]
    pub fn with_protein(mut self, protein: impl Into<String>) -> Self {
        self.proteins.push(protein.into());
        self
    }

    /// Add a score column
    #[must_use]
    pub fn with_score(mut self, name: impl Into<String>, value: impl Into<TextNumber>) -> Self {
        self.scores.insert(name.into(), value.into());
        self
    }

    /// Set the observed precursor m/z
    #[must_use]
    pub const fn with_precursor_mz(mut self, mz: f64) -> Self {
        self.precursor_mz = Some(mz);
        self
    }

    /// Set the mass error as reported by the search engine
    #[must_use]
    pub const fn with_mass_error(mut self, mass_error: f64) -> Self {
        self.mass_error = Some(mass_error);
        self
    }

    /// Set the separate modifications column
    #[must_use]
    pub fn with_modifications(mut self, modifications: impl Into<String>) -> Self {
        self.modifications = Some(modifications.into());
        self
    }
}
