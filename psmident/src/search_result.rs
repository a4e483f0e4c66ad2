use std::{fmt::Display, sync::Arc};

use context_error::*;
use indexmap::IndexMap;
use itertools::Itertools;
use serde::Serialize;
use tracing::debug;

use crate::TextNumber;
use psmcore::{
    PsmError, PsmErrorKind,
    modification::{
        AminoAcidModInfo, ModificationDefinition, ModificationDefinitionRef, ModificationRegistry,
        ModificationType,
    },
    quantities::{PrecursorMassTolerance, compute_del_m_corrected_ppm, masses_equal},
    sequence::{
        PeptideCleavageClassifier, PeptideCleavageState, PeptideMassCalculator,
        PeptideTerminusState, ResidueTerminusState, SequencePosition,
    },
};

/// One annotated peptide spectrum match. The public fields are copied from the search engine
/// output, the derived fields (cleavage and terminus state, modifications, masses) are kept
/// consistent with the sequence and can only be changed through the methods.
#[derive(Clone, Debug, Serialize)]
pub struct SearchResult {
    /// The scan number
    pub scan: usize,
    /// The precursor charge
    pub charge: i32,
    /// The protein name(s)
    pub proteins: Vec<String>,
    /// The engine specific scores, in the order they were read
    pub scores: IndexMap<String, TextNumber>,
    #[serde(skip)]
    classifier: Arc<PeptideCleavageClassifier>,
    clean_sequence: String,
    prefix: String,
    suffix: String,
    cleavage_state: PeptideCleavageState,
    terminus_state: PeptideTerminusState,
    missed_cleavages: usize,
    modifications: Vec<AminoAcidModInfo>,
    sequence_with_mods: String,
    monoisotopic_mass: f64,
    precursor_monoisotopic_mass: Option<f64>,
    delta_mass: Option<f64>,
    delta_mass_ppm: Option<f64>,
    isotope_correction_count: i32,
    within_tolerance: Option<bool>,
    errors: Vec<String>,
}

impl SearchResult {
    /// Create an empty result that classifies its peptide with the given classifier
    pub fn new(scan: usize, charge: i32, classifier: Arc<PeptideCleavageClassifier>) -> Self {
        Self {
            scan,
            charge,
            proteins: Vec::new(),
            scores: IndexMap::new(),
            classifier,
            clean_sequence: String::new(),
            prefix: String::new(),
            suffix: String::new(),
            cleavage_state: PeptideCleavageState::NonSpecific,
            terminus_state: PeptideTerminusState::None,
            missed_cleavages: 0,
            modifications: Vec::new(),
            sequence_with_mods: String::new(),
            monoisotopic_mass: 0.0,
            precursor_monoisotopic_mass: None,
            delta_mass: None,
            delta_mass_ppm: None,
            isotope_correction_count: 0,
            within_tolerance: None,
            errors: Vec::new(),
        }
    }

    /// Set the peptide without any modification notation. This removes all modifications and
    /// updates the cleavage state, terminus state and missed cleavages.
    pub fn set_clean_sequence(&mut self, clean_sequence: &str) {
        self.clean_sequence = clean_sequence.trim().to_ascii_uppercase();
        self.modifications.clear();
        self.update_states();
    }

    /// Set the flanking residues, `-` (or `[`/`]`) for a protein terminus, empty if unknown.
    /// This updates the cleavage and terminus state and the terminus state of all modifications.
    pub fn set_flanks(&mut self, prefix: &str, suffix: &str) {
        self.prefix = prefix.trim().to_string();
        self.suffix = suffix.trim().to_string();
        self.update_states();
    }

    /// Set the flanks and the clean sequence in one go, see [`Self::set_clean_sequence`]
    pub fn set_peptide(&mut self, prefix: &str, clean_sequence: &str, suffix: &str) {
        self.prefix = prefix.trim().to_string();
        self.suffix = suffix.trim().to_string();
        self.set_clean_sequence(clean_sequence);
    }

    fn update_states(&mut self) {
        self.cleavage_state =
            self.classifier
                .compute_cleavage_state(&self.clean_sequence, &self.prefix, &self.suffix);
        self.terminus_state = self.classifier.compute_terminus_state(&self.prefix, &self.suffix);
        self.missed_cleavages = self
            .classifier
            .compute_number_of_missed_cleavages(&self.clean_sequence);
        let modifications = std::mem::take(&mut self.modifications);
        self.modifications = modifications
            .into_iter()
            .map(|m| {
                let state = self.residue_terminus_state(m.residue_location());
                AminoAcidModInfo::new(m.residue(), m.residue_location(), state, m.definition().clone())
            })
            .collect();
        self.update_sequence_with_mods();
    }

    /// The length of the peptide in residues
    pub fn peptide_length(&self) -> usize {
        self.clean_sequence.chars().count()
    }

    /// The residue at the given 1 based location
    pub fn residue(&self, location: usize) -> Option<char> {
        location
            .checked_sub(1)
            .and_then(|index| self.clean_sequence.chars().nth(index))
    }

    /// The terminus state of the residue at the given 1 based location
    pub fn residue_terminus_state(&self, location: usize) -> ResidueTerminusState {
        ResidueTerminusState::for_location(location, self.peptide_length(), self.terminus_state)
    }

    /// The terminus state for a modification at the given position. Terminal positions always
    /// get the terminal state of their own side, also on single residue peptides.
    pub fn position_terminus_state(&self, position: SequencePosition) -> ResidueTerminusState {
        match position {
            SequencePosition::NTerm if self.terminus_state.is_protein_n_terminus() => {
                ResidueTerminusState::ProteinNTerminus
            }
            SequencePosition::NTerm => ResidueTerminusState::PeptideNTerminus,
            SequencePosition::CTerm if self.terminus_state.is_protein_c_terminus() => {
                ResidueTerminusState::ProteinCTerminus
            }
            SequencePosition::CTerm => ResidueTerminusState::PeptideCTerminus,
            SequencePosition::Index(index) => self.residue_terminus_state(index + 1),
        }
    }

    /// Place a modification on the residue at the given 1 based location. Isotopic
    /// modifications apply to the whole peptide and ignore the location. When `update_counts`
    /// is set the occurrence count of the definition is incremented.
    /// # Errors
    /// If the location is outside of the peptide.
    pub fn add_modification(
        &mut self,
        definition: ModificationDefinitionRef,
        location: usize,
        update_counts: bool,
    ) -> Result<(), PsmError> {
        let state = self.residue_terminus_state(location);
        self.place_modification(definition, location, state, update_counts)
    }

    /// Place a modification with the terminal context it was found in, which for a single
    /// residue peptide differs between the N and C terminal side
    pub(crate) fn place_modification(
        &mut self,
        definition: ModificationDefinitionRef,
        location: usize,
        state: ResidueTerminusState,
        update_counts: bool,
    ) -> Result<(), PsmError> {
        let modification = if definition.modification_type() == ModificationType::IsotopicMod {
            AminoAcidModInfo::new(None, 0, ResidueTerminusState::None, definition)
        } else {
            let residue = self.residue(location).ok_or_else(|| {
                BoxedError::new(
                    PsmErrorKind::InvalidPosition,
                    "Invalid modification position",
                    format!(
                        "The modification {} cannot be placed at residue {location} of a peptide with {} residues",
                        definition.mass_correction_tag(),
                        self.peptide_length()
                    ),
                    Context::show(self.clean_sequence.clone()),
                )
            })?;
            AminoAcidModInfo::new(Some(residue), location, state, definition)
        };
        if update_counts {
            modification.definition().increment_occurrence_count();
        }
        self.modifications.push(modification);
        self.update_sequence_with_mods();
        Ok(())
    }

    /// If an equivalent modification is already placed at this location: the same registry
    /// instance, the same mass correction tag, or the same mass at the given precision.
    pub fn has_equivalent_modification(
        &self,
        definition: &ModificationDefinition,
        location: usize,
        digits: u8,
    ) -> bool {
        self.modifications.iter().any(|m| {
            m.residue_location() == location
                && (std::ptr::eq(m.definition().as_ref(), definition)
                    || m.definition().mass_correction_tag() == definition.mass_correction_tag()
                    || masses_equal(m.definition().mass(), definition.mass(), digits))
        })
    }

    /// Apply all modifications that are always present: isotopic modifications, static
    /// residue modifications, and static peptide or protein terminus modifications. A static
    /// modification is not placed where an equivalent one is already present, for terminal
    /// residues this can be allowed with `allow_duplicate_on_terminus`. The N and C terminal
    /// sides are tested separately, so a single residue peptide can get both.
    pub fn apply_static_modifications(
        &mut self,
        registry: &ModificationRegistry,
        allow_duplicate_on_terminus: bool,
    ) {
        let length = self.peptide_length();
        if length == 0 {
            return;
        }
        let digits = registry.digits_of_precision();
        let terminal_sides = [
            (1, self.position_terminus_state(SequencePosition::NTerm)),
            (length, self.position_terminus_state(SequencePosition::CTerm)),
        ];
        for definition in registry.definitions() {
            let locations: Vec<(usize, ResidueTerminusState)> = match definition.modification_type() {
                ModificationType::IsotopicMod => {
                    if self
                        .modifications
                        .iter()
                        .any(|m| Arc::ptr_eq(m.definition(), definition))
                    {
                        Vec::new()
                    } else {
                        vec![(0, ResidueTerminusState::None)]
                    }
                }
                ModificationType::StaticMod => self
                    .clean_sequence
                    .chars()
                    .enumerate()
                    .filter(|(_, residue)| definition.target_residues().contains(*residue))
                    .map(|(index, _)| (index + 1, self.residue_terminus_state(index + 1)))
                    .filter(|(location, _)| {
                        !self.has_equivalent_modification(definition, *location, digits)
                    })
                    .collect(),
                ModificationType::TerminalPeptideStaticMod
                | ModificationType::ProteinTerminusStaticMod => terminal_sides
                    .into_iter()
                    .filter(|(location, state)| {
                        definition.can_apply_to_terminus(self.residue(*location), *state)
                            && (allow_duplicate_on_terminus
                                || !self.has_equivalent_modification(definition, *location, digits))
                    })
                    .collect(),
                ModificationType::DynamicMod | ModificationType::UnknownType => Vec::new(),
            };
            for (location, state) in locations {
                if let Err(error) =
                    self.place_modification(definition.clone(), location, state, true)
                {
                    self.add_error(error);
                } else if definition.modification_type() != ModificationType::StaticMod {
                    debug!(
                        "Applied {} at {location} of {}",
                        definition.mass_correction_tag(),
                        self.clean_sequence
                    );
                }
            }
        }
    }

    /// Rebuild the sequence with the symbols of the dynamic and unknown modifications. The
    /// symbols are inserted after their residue from the last position to the first, symbols on
    /// the same residue are ordered by mass correction tag.
    pub fn update_sequence_with_mods(&mut self) {
        let mut sequence = self.clean_sequence.clone();
        let symbols = self
            .modifications
            .iter()
            .filter(|m| {
                m.residue_location() > 0
                    && m.definition().modification_type().is_displayed_with_symbol()
            })
            .map(|m| {
                (
                    m.residue_location(),
                    m.definition().mass_correction_tag(),
                    m.definition().symbol(),
                )
            })
            .sorted_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
        for (location, _, symbol) in symbols.rev() {
            let index = sequence
                .char_indices()
                .filter(|(_, c)| c.is_ascii_alphabetic())
                .nth(location - 1)
                .map_or(sequence.len(), |(i, c)| i + c.len_utf8());
            sequence.insert(index, symbol);
        }
        self.sequence_with_mods = sequence;
    }

    /// Calculate the monoisotopic mass of the modified peptide. If the peptide contains a
    /// residue without a defined mass the mass is set to `0.0` and the error is recorded.
    pub fn compute_monoisotopic_mass(&mut self, calculator: &PeptideMassCalculator) {
        match calculator.compute_sequence_mass_with_mods(&self.clean_sequence, &self.modifications)
        {
            Ok(mass) => self.monoisotopic_mass = mass,
            Err(error) => {
                self.monoisotopic_mass = 0.0;
                self.add_error(error);
            }
        }
    }

    /// Set the observed precursor monoisotopic mass and compute the (isotope corrected) mass
    /// error relative to the peptide mass. The mass error is only computed if the peptide mass is known.
    pub fn set_precursor_monoisotopic_mass(
        &mut self,
        precursor_mass: f64,
        adjust_for_isotope_selection: bool,
        tolerance: Option<PrecursorMassTolerance>,
    ) {
        self.precursor_monoisotopic_mass = Some(precursor_mass);
        if self.monoisotopic_mass <= 0.0 {
            return;
        }
        let corrected = compute_del_m_corrected_ppm(
            precursor_mass - self.monoisotopic_mass,
            precursor_mass,
            self.monoisotopic_mass,
            adjust_for_isotope_selection,
        );
        self.precursor_monoisotopic_mass = Some(corrected.precursor_monoisotopic_mass);
        self.delta_mass = Some(corrected.delta_mass);
        self.delta_mass_ppm = Some(corrected.ppm);
        self.isotope_correction_count = corrected.correction_count;
        self.within_tolerance =
            tolerance.map(|t| t.contains(corrected.delta_mass, self.monoisotopic_mass));
    }

    /// Record a problem with this PSM
    pub fn add_error(&mut self, error: impl Display) {
        self.errors.push(error.to_string());
    }

    /// The peptide without modification notation
    pub fn clean_sequence(&self) -> &str {
        &self.clean_sequence
    }

    /// The residue(s) before the peptide
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The residue(s) after the peptide
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// The peptide with the symbols of dynamic modifications: `PEPM*TIDE`
    pub fn peptide_sequence_with_mods(&self) -> &str {
        &self.sequence_with_mods
    }

    /// The peptide with the symbols of dynamic modifications and the flanking residues: `K.PEPM*TIDE.R`
    pub fn peptide_sequence_with_mods_and_context(&self) -> String {
        format!("{}.{}.{}", self.prefix, self.sequence_with_mods, self.suffix)
    }

    /// How well the flanking residues match the cleavage rule
    pub const fn cleavage_state(&self) -> PeptideCleavageState {
        self.cleavage_state
    }

    /// If the peptide is at a protein terminus
    pub const fn terminus_state(&self) -> PeptideTerminusState {
        self.terminus_state
    }

    /// The number of termini that match the cleavage rule
    pub const fn number_of_enzymatic_termini(&self) -> u8 {
        self.cleavage_state.number_of_enzymatic_termini()
    }

    /// The number of missed cleavages inside the peptide
    pub const fn number_of_missed_cleavages(&self) -> usize {
        self.missed_cleavages
    }

    /// All placed modifications
    pub fn modifications(&self) -> &[AminoAcidModInfo] {
        &self.modifications
    }

    /// The modifications as `tag:location` ordered by location and tag: `IodoAcet:3,Plus1Oxy:5`
    pub fn mod_description(&self) -> String {
        self.modifications
            .iter()
            .map(|m| (m.residue_location(), m.definition().mass_correction_tag()))
            .sorted()
            .map(|(location, tag)| format!("{tag}:{location}"))
            .join(",")
    }

    /// The monoisotopic mass of the modified peptide, `0.0` if it could not be calculated
    pub const fn monoisotopic_mass(&self) -> f64 {
        self.monoisotopic_mass
    }

    /// The observed precursor monoisotopic mass, adjusted for isotope selection if enabled
    pub const fn precursor_monoisotopic_mass(&self) -> Option<f64> {
        self.precursor_monoisotopic_mass
    }

    /// The mass error in Dalton
    pub const fn delta_mass(&self) -> Option<f64> {
        self.delta_mass
    }

    /// The mass error in ppm
    pub const fn delta_mass_ppm(&self) -> Option<f64> {
        self.delta_mass_ppm
    }

    /// The number of isotope spacings the precursor was off
    pub const fn isotope_correction_count(&self) -> i32 {
        self.isotope_correction_count
    }

    /// If the mass error is within the precursor tolerance, `None` if no tolerance or mass error is known
    pub const fn is_within_precursor_tolerance(&self) -> Option<bool> {
        self.within_tolerance
    }

    /// The problems found while annotating this PSM
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// If any problem was found
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// The classifier used
    pub fn classifier(&self) -> &PeptideCleavageClassifier {
        &self.classifier
    }
}

#[cfg(test)]
#[expect(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use crate::test::{assert_close, static_registry};
    use psmcore::{
        modification::{DeclarationKind, ModificationDeclaration},
        sequence::StandardCleavageAgent,
    };

    fn peptide(prefix: &str, sequence: &str, suffix: &str) -> SearchResult {
        let mut result = SearchResult::new(1, 2, Arc::new(PeptideCleavageClassifier::default()));
        result.set_peptide(prefix, sequence, suffix);
        result
    }

    #[test]
    fn derived_states_follow_sequence() {
        let mut result = peptide("K", "PEPKTIDER", "A");
        assert_eq!(result.cleavage_state(), PeptideCleavageState::Full);
        assert_eq!(result.number_of_missed_cleavages(), 1);
        result.set_flanks("A", "A");
        assert_eq!(result.cleavage_state(), PeptideCleavageState::Partial);
        result.set_flanks("-", "-");
        assert_eq!(result.terminus_state(), PeptideTerminusState::ProteinNandCCTerminus);
        result.set_clean_sequence("peptide");
        assert_eq!(result.clean_sequence(), "PEPTIDE");
        assert_eq!(result.number_of_missed_cleavages(), 0);
        assert_eq!(result.number_of_enzymatic_termini(), 2);
    }

    #[test]
    fn nonspecific_classifier() {
        let mut result = SearchResult::new(
            1,
            2,
            Arc::new(PeptideCleavageClassifier::new(StandardCleavageAgent::NoEnzyme.rule())),
        );
        result.set_peptide("A", "PEPKTIDE", "A");
        assert_eq!(result.number_of_missed_cleavages(), 0);
    }

    #[test]
    fn positions() {
        let mut registry = static_registry();
        let oxidation = registry.lookup_by_mass(15.9949, Some('M'), ResidueTerminusState::None);
        let mut result = peptide("K", "PEPMTIDE", "R");
        assert!(result.add_modification(oxidation.clone(), 4, true).is_ok());
        let error = result.add_modification(oxidation.clone(), 9, true).unwrap_err();
        assert!(matches!(error.get_kind(), PsmErrorKind::InvalidPosition));
        assert!(result.add_modification(oxidation.clone(), 0, true).is_err());
        assert_eq!(oxidation.occurrence_count(), 1);
        assert_eq!(result.peptide_sequence_with_mods(), format!("PEPM{}TIDE", oxidation.symbol()));
        assert_eq!(
            result.peptide_sequence_with_mods_and_context(),
            format!("K.PEPM{}TIDE.R", oxidation.symbol())
        );
    }

    #[test]
    fn static_modifications_are_applied_once() {
        let registry = static_registry();
        let mut result = peptide("-", "ACDCK", "A");
        result.apply_static_modifications(&registry, false);
        // IodoAcet on both C and TMT on the peptide N terminus
        assert_eq!(result.mod_description(), "TMT6Tag:1,IodoAcet:2,IodoAcet:4");
        let before = result.modifications().len();
        result.apply_static_modifications(&registry, false);
        assert_eq!(result.modifications().len(), before);
        result.apply_static_modifications(&registry, true);
        assert_eq!(result.modifications().len(), before + 1);
    }

    #[test]
    fn single_residue_gets_both_terminal_modifications() {
        let mut registry = static_registry();
        registry
            .add_from_declaration(&ModificationDeclaration::from_mass(
                -0.984016,
                ">",
                DeclarationKind::TerminalPeptideStatic,
            ))
            .unwrap();
        registry
            .add_from_declaration(&ModificationDeclaration::from_mass(
                42.010565,
                "]",
                DeclarationKind::ProteinTerminusStatic,
            ))
            .unwrap();

        let mut result = peptide("R", "K", "A");
        result.apply_static_modifications(&registry, false);
        let placed: Vec<(usize, ResidueTerminusState)> = result
            .modifications()
            .iter()
            .map(|m| (m.residue_location(), m.terminus_state()))
            .collect();
        assert_eq!(
            placed,
            [
                (1, ResidueTerminusState::PeptideNTerminus),
                (1, ResidueTerminusState::PeptideCTerminus)
            ]
        );

        let mut result = peptide("R", "K", "-");
        result.apply_static_modifications(&registry, false);
        assert_eq!(result.modifications().len(), 3);
        assert!(
            result
                .modifications()
                .iter()
                .all(|m| m.residue_location() == 1)
        );
    }

    #[test]
    fn mass_and_error() {
        let registry = static_registry();
        let mut result = peptide("K", "LCDE", "F");
        result.compute_monoisotopic_mass(registry.calculator());
        assert_close!(result.monoisotopic_mass(), 478.17333, 0.001);
        result.set_precursor_monoisotopic_mass(
            478.17333 + 1.00335483 + 0.002,
            true,
            Some(PrecursorMassTolerance::symmetric(20.0, true)),
        );
        assert_eq!(result.isotope_correction_count(), 1);
        assert_close!(result.delta_mass().unwrap(), 0.002, 0.001);
        assert_eq!(result.is_within_precursor_tolerance(), Some(true));

        let mut result = peptide("K", "PEP1TIDE", "R");
        result.compute_monoisotopic_mass(registry.calculator());
        assert!(result.monoisotopic_mass().abs() < f64::EPSILON);
        assert!(result.has_errors());
        result.set_precursor_monoisotopic_mass(1000.0, true, None);
        assert_eq!(result.delta_mass(), None);
    }

    #[test]
    fn symbols_are_inserted_from_the_end() {
        let mut registry = static_registry();
        let oxidation = registry.lookup_by_mass(15.9949, Some('M'), ResidueTerminusState::None);
        let phospho = registry.lookup_by_mass(79.9663, Some('S'), ResidueTerminusState::None);
        let mut result = peptide("K", "MSMS", "R");
        for (definition, location) in [
            (&phospho, 4),
            (&oxidation, 1),
            (&phospho, 2),
            (&oxidation, 3),
        ] {
            result.add_modification(definition.clone(), location, false).unwrap();
        }
        let (o, p) = (oxidation.symbol(), phospho.symbol());
        assert_eq!(result.peptide_sequence_with_mods(), format!("M{o}S{p}M{o}S{p}"));
        assert_eq!(result.mod_description(), "Plus1Oxy:1,Phosph:2,Plus1Oxy:3,Phosph:4");
        assert_eq!(oxidation.occurrence_count(), 0);
    }
}
