use std::sync::Arc;

use context_error::*;
use tracing::warn;

use crate::{
    ExtractedModifications, ModKey, ModNotation, RawPsmRow, SearchResult, engine::plain_sequence,
};
use psmcore::{
    PsmError, PsmErrorKind,
    modification::ModificationRegistry,
    quantities::PrecursorMassTolerance,
    sequence::{
        PeptideCleavageClassifier, PeptideMassCalculator, SequencePosition,
        split_prefix_and_suffix,
    },
};

/// Turns raw search engine rows into annotated [`SearchResult`]s. The only state shared between
/// rows is the [`ModificationRegistry`], which is passed to every call.
/// ```rust
/// use psmident::{RawPsmRow, SearchEngine, SearchResultAnnotator};
/// use psmcore::prelude::*;
/// let annotator = SearchResultAnnotator::new(
///     SearchEngine::MsgfPlus.notation(),
///     PeptideMassCalculator::default(),
///     PeptideCleavageClassifier::default(),
/// );
/// let mut registry = ModificationRegistry::default();
/// let result = annotator.annotate(&RawPsmRow::new(1, 2, "K.AEPM+15.995TIDER.A"), &mut registry);
/// assert_eq!(result.mod_description(), "Plus1Oxy:4");
/// assert_eq!(result.peptide_sequence_with_mods_and_context(), "K.AEPM*TIDER.A");
/// assert_eq!(result.cleavage_state(), PeptideCleavageState::Full);
/// ```
#[derive(Clone, Debug)]
pub struct SearchResultAnnotator {
    notation: ModNotation,
    calculator: PeptideMassCalculator,
    classifier: Arc<PeptideCleavageClassifier>,
    allow_duplicate_mod_on_terminus: bool,
    adjust_precursor_mass: bool,
    precursor_tolerance: Option<PrecursorMassTolerance>,
}

impl SearchResultAnnotator {
    /// Create an annotator for sequences in the given notation
    pub fn new(
        notation: ModNotation,
        calculator: PeptideMassCalculator,
        classifier: PeptideCleavageClassifier,
    ) -> Self {
        Self {
            notation,
            calculator,
            classifier: Arc::new(classifier),
            allow_duplicate_mod_on_terminus: false,
            adjust_precursor_mass: true,
            precursor_tolerance: None,
        }
    }

    /// Allow equivalent static terminus modifications to be placed twice on the same residue
    #[must_use]
    pub const fn with_allow_duplicate_mod_on_terminus(mut self, allow: bool) -> Self {
        self.allow_duplicate_mod_on_terminus = allow;
        self
    }

    /// Adjust the precursor mass when a non monoisotopic peak was selected (default on)
    #[must_use]
    pub const fn with_adjust_precursor_mass(mut self, adjust: bool) -> Self {
        self.adjust_precursor_mass = adjust;
        self
    }

    /// Flag results with a mass error outside of this tolerance
    #[must_use]
    pub const fn with_precursor_tolerance(mut self, tolerance: PrecursorMassTolerance) -> Self {
        self.precursor_tolerance = Some(tolerance);
        self
    }

    /// The modification notation of the sequences
    pub const fn notation(&self) -> ModNotation {
        self.notation
    }

    /// The mass calculator
    pub const fn calculator(&self) -> &PeptideMassCalculator {
        &self.calculator
    }

    /// The cleavage classifier
    pub fn classifier(&self) -> &PeptideCleavageClassifier {
        &self.classifier
    }

    /// Annotate one row. Problems are recorded on the result (see [`SearchResult::errors`]),
    /// a result is always returned. Unknown modification masses are registered in the registry.
    pub fn annotate(&self, row: &RawPsmRow, registry: &mut ModificationRegistry) -> SearchResult {
        let mut result = SearchResult::new(row.scan, row.charge, self.classifier.clone());
        result.proteins.clone_from(&row.proteins);
        result.scores.clone_from(&row.scores);

        let split = split_prefix_and_suffix(row.sequence.trim());
        let extracted = self
            .notation
            .extract(split.primary, row.modifications.as_deref())
            .unwrap_or_else(|error| {
                result.add_error(error);
                ExtractedModifications {
                    clean_sequence: plain_sequence(split.primary),
                    modifications: Vec::new(),
                }
            });
        result.set_peptide(split.prefix, &extracted.clean_sequence, split.suffix);

        for modification in &extracted.modifications {
            if let Err(error) = Self::resolve(&mut result, &modification.key, modification.position, registry) {
                result.add_error(error);
            }
        }

        result.apply_static_modifications(registry, self.allow_duplicate_mod_on_terminus);
        result.update_sequence_with_mods();
        result.compute_monoisotopic_mass(&self.calculator);

        let precursor_mass = row
            .precursor_mz
            .map(|mz| self.calculator.convolute_mass(mz, row.charge, 0))
            .or_else(|| {
                row.mass_error
                    .filter(|_| result.monoisotopic_mass() > 0.0)
                    .map(|error| result.monoisotopic_mass() + error)
            });
        if let Some(precursor_mass) = precursor_mass {
            result.set_precursor_monoisotopic_mass(
                precursor_mass,
                self.adjust_precursor_mass,
                self.precursor_tolerance,
            );
        }

        if result.has_errors() {
            warn!(
                "Scan {} ({}) was annotated with errors: {}",
                result.scan,
                row.sequence,
                result.errors().join("; ")
            );
        }
        result
    }

    /// Resolve one extracted modification to a definition and place it on the result
    fn resolve(
        result: &mut SearchResult,
        key: &ModKey,
        position: SequencePosition,
        registry: &mut ModificationRegistry,
    ) -> Result<(), PsmError> {
        let length = result.peptide_length();
        let location = position.residue_location(length);
        if length == 0 || location == 0 || location > length {
            return Err(BoxedError::new(
                PsmErrorKind::InvalidPosition,
                "Invalid modification position",
                format!(
                    "The modification {key} at {position} cannot be placed on a peptide with {length} residues"
                ),
                Context::show(result.clean_sequence().to_string()),
            ));
        }
        let residue = match position {
            SequencePosition::Index(_) => result.residue(location),
            SequencePosition::NTerm | SequencePosition::CTerm => None,
        };
        let terminus = result.position_terminus_state(position);
        let definition = match key {
            ModKey::Symbol(symbol) => registry
                .lookup_dynamic_by_target(*symbol, residue, terminus)
                .ok_or_else(|| {
                    BoxedError::new(
                        PsmErrorKind::ModificationNotFound,
                        "Unknown modification symbol",
                        format!(
                            "There is no dynamic modification with symbol '{symbol}' for {} at {position}",
                            residue.map_or_else(|| "the terminus".to_string(), |r| r.to_string())
                        ),
                        Context::show(result.clean_sequence().to_string()),
                    )
                })?,
            ModKey::Mass(mass) => registry.lookup_by_mass(*mass, residue, terminus),
            ModKey::Name(name) => registry
                .resolve_name(name, residue, terminus)
                .ok_or_else(|| {
                    BoxedError::new(
                        PsmErrorKind::ModificationNotFound,
                        "Unknown modification name",
                        format!("The modification '{name}' is not known by name or mass correction tag"),
                        Context::show(result.clean_sequence().to_string()),
                    )
                })?,
        };
        result.place_modification(definition, location, terminus, true)
    }
}
