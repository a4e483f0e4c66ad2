use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::PsmError,
    modification::{
        C_TERMINAL_PEPTIDE_SYMBOL, DEFAULT_MODIFICATION_SYMBOLS, LAST_RESORT_SYMBOL,
        MassCorrectionTag, ModificationDeclaration, ModificationDefinition,
        ModificationDefinitionRef, ModificationType, N_TERMINAL_PEPTIDE_SYMBOL,
        default_mass_correction_tags, find_mass_correction_tag, find_mass_correction_tag_by_name,
        mass_tag_from_mass, strip_specificity,
    },
    quantities::masses_equal,
    sequence::{PeptideMassCalculator, ResidueTerminusState},
};

/// The default number of digits two masses have to agree on to be the same modification
pub const DEFAULT_DIGITS_OF_PRECISION: u8 = 3;
/// The default number of digits for the second, looser, mass lookup
pub const DEFAULT_LOOSE_DIGITS_OF_PRECISION: u8 = 1;

/// All modifications known in one processing run. Lookups by mass never fail, unknown masses
/// are registered on the fly as [`ModificationType::UnknownType`] definitions. Definitions are
/// handed out as shared references so that two lookups for the same modification give the same
/// instance and count their occurrences together.
///
/// A cloned registry shares its definitions (and their counts) with the original.
/// ```rust
/// use psmcore::prelude::*;
/// use std::sync::Arc;
/// let mut registry = ModificationRegistry::default();
/// let a = registry.lookup_by_mass(15.9949, Some('M'), ResidueTerminusState::None);
/// let b = registry.lookup_by_mass(15.99495, Some('M'), ResidueTerminusState::None);
/// assert!(Arc::ptr_eq(&a, &b));
/// assert_eq!(a.mass_correction_tag(), "Plus1Oxy");
/// ```
#[derive(Clone, Debug)]
pub struct ModificationRegistry {
    calculator: PeptideMassCalculator,
    definitions: Vec<ModificationDefinitionRef>,
    mass_correction_tags: Vec<MassCorrectionTag>,
    digits_of_precision: u8,
    loose_digits_of_precision: u8,
}

impl Default for ModificationRegistry {
    fn default() -> Self {
        Self::new(PeptideMassCalculator::default())
    }
}

/// A summary of one definition with its final occurrence count, for ModSummary files
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ModificationSummary {
    /// The display symbol
    pub symbol: char,
    /// The monoisotopic mass
    pub mass: f64,
    /// The target residues
    pub target_residues: String,
    /// The kind of modification
    pub modification_type: ModificationType,
    /// The canonical name
    pub mass_correction_tag: String,
    /// The number of times the modification was applied
    pub occurrence_count: usize,
    /// If the modification was discovered in the data
    pub auto_defined: bool,
}

impl From<&ModificationDefinition> for ModificationSummary {
    fn from(value: &ModificationDefinition) -> Self {
        Self {
            symbol: value.symbol(),
            mass: value.mass(),
            target_residues: value.target_residues().to_string(),
            modification_type: value.modification_type(),
            mass_correction_tag: value.mass_correction_tag().to_string(),
            occurrence_count: value.occurrence_count(),
            auto_defined: value.is_auto_defined(),
        }
    }
}

impl ModificationRegistry {
    /// Create an empty registry. The calculator is used to resolve sequence based modification masses.
    pub fn new(calculator: PeptideMassCalculator) -> Self {
        Self {
            calculator,
            definitions: Vec::new(),
            mass_correction_tags: default_mass_correction_tags(),
            digits_of_precision: DEFAULT_DIGITS_OF_PRECISION,
            loose_digits_of_precision: DEFAULT_LOOSE_DIGITS_OF_PRECISION,
        }
    }

    /// Set the default precisions for mass lookups
    #[must_use]
    pub const fn with_precision(mut self, digits: u8, loose_digits: u8) -> Self {
        self.digits_of_precision = digits;
        self.loose_digits_of_precision = loose_digits;
        self
    }

    /// The number of digits two masses have to agree on
    pub const fn digits_of_precision(&self) -> u8 {
        self.digits_of_precision
    }

    /// The number of digits for the looser second lookup
    pub const fn loose_digits_of_precision(&self) -> u8 {
        self.loose_digits_of_precision
    }

    /// The calculator used to resolve sequence based masses
    pub const fn calculator(&self) -> &PeptideMassCalculator {
        &self.calculator
    }

    /// The number of definitions
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// If there are no definitions
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// All definitions, in registration order
    pub fn definitions(&self) -> &[ModificationDefinitionRef] {
        &self.definitions
    }

    /// The definition at the given index, the index is stable for the lifetime of the registry
    pub fn get(&self, index: usize) -> Option<&ModificationDefinitionRef> {
        self.definitions.get(index)
    }

    /// The type of the definition at the given index
    pub fn modification_type(&self, index: usize) -> Option<ModificationType> {
        self.definitions.get(index).map(|d| d.modification_type())
    }

    /// The mass correction tag table used to name modifications
    pub fn mass_correction_tags(&self) -> &[MassCorrectionTag] {
        &self.mass_correction_tags
    }

    /// Add an entry to the mass correction tag table, replacing any entry with the same name
    pub fn add_mass_correction_tag(&mut self, tag: MassCorrectionTag) {
        self.mass_correction_tags.retain(|t| t.name != tag.name);
        self.mass_correction_tags.insert(0, tag);
    }

    /// The first display symbol not yet used by any definition
    pub fn next_available_symbol(&self) -> char {
        DEFAULT_MODIFICATION_SYMBOLS
            .chars()
            .find(|symbol| !self.definitions.iter().any(|d| d.symbol() == *symbol))
            .unwrap_or(LAST_RESORT_SYMBOL)
    }

    /// Register a definition. If an equivalent definition with the same symbol is already
    /// registered that one is returned instead.
    pub fn add_definition(&mut self, definition: ModificationDefinition) -> ModificationDefinitionRef {
        if let Some(existing) = self.definitions.iter().find(|d| {
            d.symbol() == definition.symbol() && d.is_equivalent(&definition, self.digits_of_precision)
        }) {
            return existing.clone();
        }
        let definition = Arc::new(definition);
        self.definitions.push(definition.clone());
        definition
    }

    /// Register a modification from a declaration in the search parameters
    /// # Errors
    /// If the declaration does not have exactly one mass source, if its formula or sequence
    /// cannot be parsed, or if an isotopic modification has no valid affected atom.
    pub fn add_from_declaration(
        &mut self,
        declaration: &ModificationDeclaration,
    ) -> Result<ModificationDefinitionRef, PsmError> {
        let title = declaration.title();
        let mass = declaration.mass_source()?.resolve(&self.calculator, &title)?;
        let affected_atom = declaration.parsed_affected_atom()?;
        let tag = declaration.tag.clone().unwrap_or_else(|| self.tag_for_mass(mass));
        let symbol = declaration.symbol.unwrap_or_else(|| self.next_available_symbol());
        let mut definition = ModificationDefinition::new(
            symbol,
            mass,
            declaration.targets.trim(),
            declaration.kind.modification_type(),
            tag,
        )
        .with_names(declaration.names.iter().cloned());
        if let Some(atom) = affected_atom {
            definition = definition.with_affected_atom(atom);
        }
        debug!("Declared modification {definition}");
        Ok(self.add_definition(definition))
    }

    /// The mass correction tag for a mass: the closest tag from the table, or the mass itself
    pub fn tag_for_mass(&self, mass: f64) -> String {
        find_mass_correction_tag(
            &self.mass_correction_tags,
            mass,
            self.digits_of_precision,
            self.loose_digits_of_precision,
        )
        .map_or_else(
            || mass_tag_from_mass(mass, self.digits_of_precision),
            |tag| tag.name.clone(),
        )
    }

    /// Find the dynamic (or auto defined) modification shown with this symbol that can be
    /// placed on the given residue in the given terminal context.
    pub fn lookup_dynamic_by_target(
        &self,
        symbol: char,
        residue: Option<char>,
        terminus: ResidueTerminusState,
    ) -> Option<ModificationDefinitionRef> {
        let candidates = || {
            self.definitions.iter().filter(|d| {
                d.modification_type().is_displayed_with_symbol()
                    && d.symbol() == symbol
                    && d.can_apply_to(residue, terminus)
            })
        };
        candidates()
            .find(|d| d.has_targets())
            .or_else(|| candidates().next())
            .cloned()
    }

    /// Find the modification with this mass (at the default precisions) that can be placed on
    /// the given residue, registering a new one if none is known
    pub fn lookup_by_mass(
        &mut self,
        mass: f64,
        residue: Option<char>,
        terminus: ResidueTerminusState,
    ) -> ModificationDefinitionRef {
        self.lookup_by_mass_with_precision(
            mass,
            residue,
            terminus,
            self.digits_of_precision,
            self.loose_digits_of_precision,
        )
    }

    /// Find the modification with this mass that can be placed on the given residue. The
    /// masses are first compared at `digits` digits and then at `loose_digits` digits. Definitions
    /// that target the residue are preferred over definitions without targets, and dynamic
    /// modifications over static ones. Isotopic modifications are never found by mass. If
    /// nothing is found a new [`ModificationType::UnknownType`] definition is registered that
    /// targets the given residue, or the peptide terminus if no residue is given.
    pub fn lookup_by_mass_with_precision(
        &mut self,
        mass: f64,
        residue: Option<char>,
        terminus: ResidueTerminusState,
        digits: u8,
        loose_digits: u8,
    ) -> ModificationDefinitionRef {
        if let Some(found) = [digits, loose_digits]
            .into_iter()
            .find_map(|precision| self.find_by_mass(mass, residue, terminus, precision))
        {
            return found;
        }
        self.register_unknown(mass, residue, terminus)
    }

    fn find_by_mass(
        &self,
        mass: f64,
        residue: Option<char>,
        terminus: ResidueTerminusState,
        precision: u8,
    ) -> Option<ModificationDefinitionRef> {
        let candidates: Vec<&ModificationDefinitionRef> = self
            .definitions
            .iter()
            .filter(|d| {
                d.modification_type() != ModificationType::IsotopicMod
                    && masses_equal(d.mass(), mass, precision)
                    && d.can_apply_to(residue, terminus)
            })
            .collect();
        // Targeted before untargeted, then dynamic before static, then the closest mass
        candidates
            .iter()
            .min_by(|a, b| {
                (!a.has_targets())
                    .cmp(&!b.has_targets())
                    .then_with(|| {
                        (!a.modification_type().is_displayed_with_symbol())
                            .cmp(&!b.modification_type().is_displayed_with_symbol())
                    })
                    .then_with(|| (a.mass() - mass).abs().total_cmp(&(b.mass() - mass).abs()))
            })
            .map(|d| (*d).clone())
    }

    fn register_unknown(
        &mut self,
        mass: f64,
        residue: Option<char>,
        terminus: ResidueTerminusState,
    ) -> ModificationDefinitionRef {
        let targets = residue.map_or_else(
            || {
                if terminus.is_n_terminal() {
                    N_TERMINAL_PEPTIDE_SYMBOL.to_string()
                } else if terminus.is_c_terminal() {
                    C_TERMINAL_PEPTIDE_SYMBOL.to_string()
                } else {
                    String::new()
                }
            },
            |r| r.to_ascii_uppercase().to_string(),
        );
        let definition = ModificationDefinition::new(
            self.next_available_symbol(),
            mass,
            targets,
            ModificationType::UnknownType,
            self.tag_for_mass(mass),
        )
        .auto_defined();
        debug!("Registered unknown modification {definition}");
        let definition = Arc::new(definition);
        self.definitions.push(definition.clone());
        definition
    }

    /// Find a registered modification by its mass correction tag or alias name, case insensitive
    pub fn lookup_by_tag(&self, name: &str) -> Option<ModificationDefinitionRef> {
        self.definitions.iter().find(|d| d.has_name(name)).cloned()
    }

    /// Resolve a modification name as written by a search engine (`Oxidation`, `Oxidation (M)`,
    /// `UniMod:35`, `Plus1Oxy`). Registered modifications with this name that can be placed on
    /// the residue come first, otherwise the name is looked up in the mass correction tag table
    /// and the modification is found (or registered) by mass. Gives `None` for unknown names.
    pub fn resolve_name(
        &mut self,
        name: &str,
        residue: Option<char>,
        terminus: ResidueTerminusState,
    ) -> Option<ModificationDefinitionRef> {
        let stripped = strip_specificity(name);
        if let Some(found) = self.definitions.iter().find(|d| {
            (d.has_name(name) || stripped.is_some_and(|s| d.has_name(s)))
                && d.can_apply_to(residue, terminus)
        }) {
            return Some(found.clone());
        }
        let mass = find_mass_correction_tag_by_name(&self.mass_correction_tags, name)
            .map(|tag| tag.mass)
            .or_else(|| {
                // A registered name without a table entry on a residue it does not target
                self.definitions
                    .iter()
                    .find(|d| d.has_name(name) || stripped.is_some_and(|s| d.has_name(s)))
                    .map(|d| d.mass())
            })?;
        Some(self.lookup_by_mass(mass, residue, terminus))
    }

    /// Add all definitions of the other registry to this one. Equivalent definitions (same
    /// type, same targets, and the same mass at the default precision) are merged and their
    /// occurrence counts added. New definitions whose symbol is already taken get a new symbol.
    pub fn merge(&mut self, other: &Self) {
        for definition in &other.definitions {
            if let Some(existing) = self
                .definitions
                .iter()
                .find(|d| d.is_equivalent(definition, self.digits_of_precision))
            {
                if !Arc::ptr_eq(existing, definition) {
                    existing.add_occurrences(definition.occurrence_count());
                }
                continue;
            }
            let mut copy = (**definition).clone();
            if copy.modification_type().is_displayed_with_symbol()
                && self.definitions.iter().any(|d| d.symbol() == copy.symbol())
            {
                copy = copy.with_symbol(self.next_available_symbol());
            }
            self.definitions.push(Arc::new(copy));
        }
    }

    /// Set all occurrence counts back to zero
    pub fn reset_occurrence_counts(&self) {
        for definition in &self.definitions {
            definition.reset_occurrence_count();
        }
    }

    /// A copy that does not share definitions with this registry, all occurrence counts start
    /// at zero. Use this to give every input file its own registry that can be merged later.
    pub fn detached(&self) -> Self {
        Self {
            definitions: self
                .definitions
                .iter()
                .map(|definition| {
                    let copy = (**definition).clone();
                    copy.reset_occurrence_count();
                    Arc::new(copy)
                })
                .collect(),
            ..self.clone()
        }
    }

    /// A summary of all definitions with their current occurrence counts
    pub fn snapshot(&self) -> Vec<ModificationSummary> {
        self.definitions
            .iter()
            .map(|d| ModificationSummary::from(d.as_ref()))
            .collect()
    }
}
