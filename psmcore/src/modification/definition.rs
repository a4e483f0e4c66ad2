use std::{
    fmt::Display,
    str::FromStr,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use context_error::*;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thin_vec::ThinVec;

use crate::{
    chemistry::{Element, compute_formula_mass_with_title},
    error::{PsmError, PsmErrorKind},
    quantities::{masses_equal, round_to_digits},
    sequence::{PeptideMassCalculator, ResidueTerminusState},
};

/// The symbol used for modifications that are not displayed in the sequence (static modifications)
pub const NO_SYMBOL: char = '-';
/// The symbol used when all default symbols are in use
pub const LAST_RESORT_SYMBOL: char = '?';
/// The symbols handed out to new dynamic modifications, in order
pub const DEFAULT_MODIFICATION_SYMBOLS: &str = "*#@$&!%~†‡¤º^`×÷+=ø¢";
/// Target symbol for the peptide N terminus
pub const N_TERMINAL_PEPTIDE_SYMBOL: char = '<';
/// Target symbol for the peptide C terminus
pub const C_TERMINAL_PEPTIDE_SYMBOL: char = '>';
/// Target symbol for the protein N terminus
pub const N_TERMINAL_PROTEIN_SYMBOL: char = '[';
/// Target symbol for the protein C terminus
pub const C_TERMINAL_PROTEIN_SYMBOL: char = ']';

/// The kind of modification
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum ModificationType {
    /// A modification seen in the data that is not declared in the search parameters
    #[default]
    UnknownType,
    /// An optional modification, displayed with a symbol in the sequence
    DynamicMod,
    /// A modification always present on its target residues
    StaticMod,
    /// A modification always present on the peptide N or C terminus
    TerminalPeptideStaticMod,
    /// A modification on all atoms of one element (eg 15N labelling)
    IsotopicMod,
    /// A modification always present on the protein N or C terminus
    ProteinTerminusStaticMod,
}

impl ModificationType {
    /// The one letter abbreviation used in ModSummary files
    pub const fn abbreviation(self) -> char {
        match self {
            Self::UnknownType => '?',
            Self::DynamicMod => 'D',
            Self::StaticMod => 'S',
            Self::TerminalPeptideStaticMod => 'T',
            Self::IsotopicMod => 'I',
            Self::ProteinTerminusStaticMod => 'P',
        }
    }

    /// If modifications of this type are shown as a symbol in the sequence
    pub const fn is_displayed_with_symbol(self) -> bool {
        matches!(self, Self::DynamicMod | Self::UnknownType)
    }
}

impl Display for ModificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl FromStr for ModificationType {
    type Err = PsmError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "?" | "unknown" | "unknowntype" => Ok(Self::UnknownType),
            "d" | "dynamic" | "dynamicmod" => Ok(Self::DynamicMod),
            "s" | "static" | "staticmod" => Ok(Self::StaticMod),
            "t" | "terminalpeptidestatic" | "terminalpeptidestaticmod" => {
                Ok(Self::TerminalPeptideStaticMod)
            }
            "i" | "isotopic" | "isotopicmod" => Ok(Self::IsotopicMod),
            "p" | "proteinterminusstatic" | "proteinterminusstaticmod" => {
                Ok(Self::ProteinTerminusStaticMod)
            }
            _ => Err(BoxedError::new(
                PsmErrorKind::InvalidParameters,
                "Unknown modification type",
                "Use one of: Dynamic, Static, TerminalPeptideStatic, ProteinTerminusStatic, Isotopic",
                Context::show(s.to_string()),
            )),
        }
    }
}

/// How the mass of a declared modification is given
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum ModificationMassSource {
    /// A plain mass in Dalton
    Mass(f64),
    /// A chemical formula, see [`crate::chemistry::ElementalComposition::from_formula`]
    Formula(String),
    /// A sequence of residues, see [`PeptideMassCalculator::compute_sequence_based_modifier_mass`]
    Sequence(String),
}

impl ModificationMassSource {
    /// Resolve this source to a mass
    /// # Errors
    /// If the formula or sequence cannot be parsed.
    pub fn resolve(&self, calculator: &PeptideMassCalculator, title: &str) -> Result<f64, PsmError> {
        match self {
            Self::Mass(mass) => Ok(*mass),
            Self::Formula(formula) => compute_formula_mass_with_title(formula, title),
            Self::Sequence(sequence) => calculator.compute_sequence_based_modifier_mass(sequence),
        }
    }
}

/// A shared reference to a modification definition, as handed out by the registry
pub type ModificationDefinitionRef = Arc<ModificationDefinition>;

/// The definition of a modification. This is immutable except for the occurrence count.
#[derive(Debug)]
pub struct ModificationDefinition {
    mass_correction_tag: String,
    mass: f64,
    target_residues: String,
    modification_type: ModificationType,
    symbol: char,
    affected_atom: Option<Element>,
    names: ThinVec<String>,
    auto_defined: bool,
    occurrence_count: AtomicUsize,
}

impl Clone for ModificationDefinition {
    fn clone(&self) -> Self {
        Self {
            mass_correction_tag: self.mass_correction_tag.clone(),
            mass: self.mass,
            target_residues: self.target_residues.clone(),
            modification_type: self.modification_type,
            symbol: self.symbol,
            affected_atom: self.affected_atom,
            names: self.names.clone(),
            auto_defined: self.auto_defined,
            occurrence_count: AtomicUsize::new(self.occurrence_count()),
        }
    }
}

impl ModificationDefinition {
    /// Create a new definition. The target residues are one letter codes or the terminus
    /// symbols (`<`, `>`, `[`, `]`), no targets means any residue. Static modifications do not
    /// have a symbol and always get [`NO_SYMBOL`].
    pub fn new(
        symbol: char,
        mass: f64,
        target_residues: impl Into<String>,
        modification_type: ModificationType,
        mass_correction_tag: impl Into<String>,
    ) -> Self {
        Self {
            mass_correction_tag: mass_correction_tag.into(),
            mass,
            target_residues: target_residues.into(),
            modification_type,
            symbol: if modification_type.is_displayed_with_symbol() {
                symbol
            } else {
                NO_SYMBOL
            },
            affected_atom: None,
            names: ThinVec::new(),
            auto_defined: false,
            occurrence_count: AtomicUsize::new(0),
        }
    }

    /// Set the atom affected by an isotopic modification
    #[must_use]
    pub fn with_affected_atom(mut self, atom: Element) -> Self {
        self.affected_atom = Some(atom);
        self
    }

    /// Add alternative names (eg `Oxidation`, `UniMod:35`) for lookup by name
    #[must_use]
    pub fn with_names(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.names.extend(names.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub(super) fn with_symbol(mut self, symbol: char) -> Self {
        if self.modification_type.is_displayed_with_symbol() {
            self.symbol = symbol;
        }
        self
    }

    #[must_use]
    pub(super) fn auto_defined(mut self) -> Self {
        self.auto_defined = true;
        self
    }

    /// The canonical name
    pub fn mass_correction_tag(&self) -> &str {
        &self.mass_correction_tag
    }

    /// The monoisotopic mass, for isotopic modifications the mass shift per affected atom
    pub const fn mass(&self) -> f64 {
        self.mass
    }

    /// The mass rounded to the given number of digits
    pub fn rounded_mass(&self, digits: u8) -> f64 {
        round_to_digits(self.mass, digits)
    }

    /// The target residues, one letter codes or terminus symbols, empty for any residue
    pub fn target_residues(&self) -> &str {
        &self.target_residues
    }

    /// The kind of modification
    pub const fn modification_type(&self) -> ModificationType {
        self.modification_type
    }

    /// The symbol shown in the sequence ([`NO_SYMBOL`] for static modifications)
    pub const fn symbol(&self) -> char {
        self.symbol
    }

    /// The atom affected by an isotopic modification
    pub const fn affected_atom(&self) -> Option<Element> {
        self.affected_atom
    }

    /// Alternative names
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// If this definition was created on the fly for a mass seen in the data
    pub const fn is_auto_defined(&self) -> bool {
        self.auto_defined
    }

    /// The number of times this modification was applied
    pub fn occurrence_count(&self) -> usize {
        self.occurrence_count.load(Ordering::Relaxed)
    }

    /// Count one more application of this modification
    pub fn increment_occurrence_count(&self) {
        self.occurrence_count.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn add_occurrences(&self, count: usize) {
        self.occurrence_count.fetch_add(count, Ordering::Relaxed);
    }

    pub(super) fn reset_occurrence_count(&self) {
        self.occurrence_count.store(0, Ordering::Relaxed);
    }

    /// If this definition is known under the given name (tag or alias, case insensitive)
    pub fn has_name(&self, name: &str) -> bool {
        let name = name.trim();
        self.mass_correction_tag.eq_ignore_ascii_case(name)
            || self.names.iter().any(|n| n.eq_ignore_ascii_case(name))
    }

    /// If this definition targets specific residues (or termini)
    pub fn has_targets(&self) -> bool {
        !self.target_residues.is_empty()
    }

    /// If this modification can be placed on the given residue with the given terminal context.
    /// A definition without targets can be placed anywhere.
    pub fn can_apply_to(&self, residue: Option<char>, terminus: ResidueTerminusState) -> bool {
        if self.target_residues.is_empty() {
            return true;
        }
        if residue.is_some_and(|r| self.target_residues.contains(r.to_ascii_uppercase())) {
            return true;
        }
        let targets = |symbol: char| self.target_residues.contains(symbol);
        match terminus {
            ResidueTerminusState::None => false,
            ResidueTerminusState::PeptideNTerminus => targets(N_TERMINAL_PEPTIDE_SYMBOL),
            ResidueTerminusState::PeptideCTerminus => targets(C_TERMINAL_PEPTIDE_SYMBOL),
            ResidueTerminusState::ProteinNTerminus => {
                targets(N_TERMINAL_PEPTIDE_SYMBOL) || targets(N_TERMINAL_PROTEIN_SYMBOL)
            }
            ResidueTerminusState::ProteinCTerminus => {
                targets(C_TERMINAL_PEPTIDE_SYMBOL) || targets(C_TERMINAL_PROTEIN_SYMBOL)
            }
            ResidueTerminusState::ProteinNandCCTerminus => {
                targets(N_TERMINAL_PEPTIDE_SYMBOL)
                    || targets(N_TERMINAL_PROTEIN_SYMBOL)
                    || targets(C_TERMINAL_PEPTIDE_SYMBOL)
                    || targets(C_TERMINAL_PROTEIN_SYMBOL)
            }
        }
    }

    /// If this terminal modification can be placed on a residue at the given terminus. The
    /// terminus symbols in the targets select the termini, any residue letters in the targets
    /// restrict the residues it can be placed on (eg `Q<` for an N terminal Q).
    pub fn can_apply_to_terminus(&self, residue: Option<char>, terminus: ResidueTerminusState) -> bool {
        let restricted = self
            .target_residues
            .chars()
            .any(|c| c.is_ascii_alphabetic());
        self.can_apply_to(None, terminus)
            && (!restricted
                || residue.is_some_and(|r| self.target_residues.contains(r.to_ascii_uppercase())))
    }

    /// If both definitions describe the same modification: same type, same targets, and the
    /// same mass at the given precision
    pub fn is_equivalent(&self, other: &Self, digits: u8) -> bool {
        self.modification_type == other.modification_type
            && same_targets(&self.target_residues, &other.target_residues)
            && masses_equal(self.mass, other.mass, digits)
    }
}

fn same_targets(a: &str, b: &str) -> bool {
    a.chars().sorted_unstable().dedup().eq(b.chars().sorted_unstable().dedup())
}

impl Display for ModificationDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}{:+.5} on '{}', {})",
            self.mass_correction_tag,
            if self.symbol == NO_SYMBOL {
                String::new()
            } else {
                format!("{} ", self.symbol)
            },
            self.mass,
            self.target_residues,
            self.modification_type
        )
    }
}
