#![doc = include_str!("../README.md")]

#[macro_use]
mod helper_functions;

/// Contains all things related to the underlying chemistry: elements and elemental compositions.
#[macro_use]
pub mod chemistry;
mod error;
/// Contains everything related to modification definitions and the run wide modification registry.
pub mod modification;
/// Contains tolerances and mass error computations.
pub mod quantities;
/// Contains all things related to peptide sequences: amino acids, masses, and cleavage.
pub mod sequence;

pub use error::{PsmError, PsmErrorKind};

/// A subset of the types and traits that are envisioned to be used the most, importing this is a good starting point for working with the crate
pub mod prelude {
    pub use crate::chemistry::{Element, ElementalComposition};
    pub use crate::composition;
    pub use crate::modification::{
        AminoAcidModInfo, DeclarationKind, ModificationDeclaration, ModificationDefinition,
        ModificationDefinitionRef, ModificationRegistry, ModificationType,
    };
    pub use crate::quantities::{PrecursorMassTolerance, compute_del_m_corrected_ppm};
    pub use crate::sequence::{
        CleavageRule, PeptideCleavageClassifier, PeptideCleavageState, PeptideMassCalculator,
        PeptideTerminusState, ResidueTerminusState, SequencePosition, StandardCleavageAgent,
        split_prefix_and_suffix,
    };
    pub use crate::{PsmError, PsmErrorKind};
}
