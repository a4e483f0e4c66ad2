use context_error::*;
use serde::{Deserialize, Serialize};

use crate::{
    chemistry::Element,
    error::{PsmError, PsmErrorKind},
    modification::{ModificationMassSource, ModificationType},
};

/// The kind of a declared modification, as written in parameter files
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum DeclarationKind {
    /// An optional modification
    #[default]
    Dynamic,
    /// A modification on every target residue
    Static,
    /// A modification on every peptide N or C terminus
    TerminalPeptideStatic,
    /// A modification on every protein N or C terminus
    ProteinTerminusStatic,
    /// A mass shift for every atom of one element
    Isotopic,
}

impl DeclarationKind {
    /// The modification type for definitions with this kind
    pub const fn modification_type(self) -> ModificationType {
        match self {
            Self::Dynamic => ModificationType::DynamicMod,
            Self::Static => ModificationType::StaticMod,
            Self::TerminalPeptideStatic => ModificationType::TerminalPeptideStaticMod,
            Self::ProteinTerminusStatic => ModificationType::ProteinTerminusStaticMod,
            Self::Isotopic => ModificationType::IsotopicMod,
        }
    }
}

/// A modification as declared in the search engine parameters. Exactly one of `mass`,
/// `formula`, or `sequence` has to be given.
/// ```rust
/// use psmcore::modification::*;
/// let declaration = ModificationDeclaration::from_formula("H3C2NO", "C", DeclarationKind::Static);
/// assert!(declaration.mass_source().is_ok());
/// ```
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ModificationDeclaration {
    /// The mass shift in Dalton
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mass: Option<f64>,
    /// The chemical formula of the mass shift
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    /// A residue sequence added as modification (eg `GG`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<String>,
    /// The target residues, one letter codes or terminus symbols (`<`, `>`, `[`, `]`)
    #[serde(default)]
    pub targets: String,
    /// The kind of modification
    #[serde(default)]
    pub kind: DeclarationKind,
    /// The display symbol for dynamic modifications, the next free symbol if not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<char>,
    /// The mass correction tag, looked up in the tag table if not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// The element symbol of the atom affected by an isotopic modification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_atom: Option<String>,
    /// Alternative names for lookup by name
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<String>,
}

impl ModificationDeclaration {
    /// Declare a modification with a plain mass
    pub fn from_mass(mass: f64, targets: impl Into<String>, kind: DeclarationKind) -> Self {
        Self {
            mass: Some(mass),
            targets: targets.into(),
            kind,
            ..Self::default()
        }
    }

    /// Declare a modification with a chemical formula
    pub fn from_formula(
        formula: impl Into<String>,
        targets: impl Into<String>,
        kind: DeclarationKind,
    ) -> Self {
        Self {
            formula: Some(formula.into()),
            targets: targets.into(),
            kind,
            ..Self::default()
        }
    }

    /// Set the mass correction tag
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Set the display symbol
    #[must_use]
    pub const fn with_symbol(mut self, symbol: char) -> Self {
        self.symbol = Some(symbol);
        self
    }

    /// A short description used in error messages
    pub fn title(&self) -> String {
        self.tag
            .clone()
            .or_else(|| self.names.first().cloned())
            .unwrap_or_else(|| {
                format!(
                    "{} on '{}'",
                    self.mass
                        .map(|m| m.to_string())
                        .or_else(|| self.formula.clone())
                        .or_else(|| self.sequence.clone())
                        .unwrap_or_default(),
                    self.targets
                )
            })
    }

    /// The source of the mass of this modification
    /// # Errors
    /// If not exactly one of `mass`, `formula`, or `sequence` is given.
    pub fn mass_source(&self) -> Result<ModificationMassSource, PsmError> {
        match (self.mass, &self.formula, &self.sequence) {
            (Some(mass), None, None) => Ok(ModificationMassSource::Mass(mass)),
            (None, Some(formula), None) => Ok(ModificationMassSource::Formula(formula.clone())),
            (None, None, Some(sequence)) => Ok(ModificationMassSource::Sequence(sequence.clone())),
            _ => Err(BoxedError::new(
                PsmErrorKind::InvalidParameters,
                "Invalid modification declaration",
                "Exactly one of 'mass', 'formula', or 'sequence' has to be given",
                Context::show(self.title()),
            )),
        }
    }

    /// The affected atom of an isotopic modification
    /// # Errors
    /// If this is an isotopic modification without a known affected atom.
    pub fn parsed_affected_atom(&self) -> Result<Option<Element>, PsmError> {
        match (&self.affected_atom, self.kind) {
            (Some(symbol), _) => Element::from_symbol(symbol.trim()).map(Some).ok_or_else(|| {
                BoxedError::new(
                    PsmErrorKind::InvalidParameters,
                    "Invalid affected atom",
                    format!("The element '{symbol}' is not known"),
                    Context::show(self.title()),
                )
            }),
            (None, DeclarationKind::Isotopic) => Err(BoxedError::new(
                PsmErrorKind::InvalidParameters,
                "Missing affected atom",
                "An isotopic modification needs the element it affects",
                Context::show(self.title()),
            )),
            (None, _) => Ok(None),
        }
    }
}
