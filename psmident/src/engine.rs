use std::{fmt::Display, str::FromStr};

use context_error::*;
use serde::{Deserialize, Serialize};

use crate::{
    formats::{
        parse_diann_modified_sequence, parse_maxquant_modified_sequence,
        parse_msfragger_modifications, parse_mspathfinder_modifications,
    },
    helper_functions::{end_of_enclosure, next_signed_decimal},
};
use psmcore::{PsmError, PsmErrorKind, sequence::SequencePosition};

/// The search engines with a known modification notation
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[expect(missing_docs)]
pub enum SearchEngine {
    #[default]
    Sequest,
    XTandem,
    Inspect,
    MsgfPlus,
    MsAlign,
    Moda,
    ModPlus,
    MsPathFinder,
    MsFragger,
    MaxQuant,
    DiaNn,
    TopPic,
}

impl SearchEngine {
    /// All search engines
    pub const ALL: &[Self] = &[
        Self::Sequest,
        Self::XTandem,
        Self::Inspect,
        Self::MsgfPlus,
        Self::MsAlign,
        Self::Moda,
        Self::ModPlus,
        Self::MsPathFinder,
        Self::MsFragger,
        Self::MaxQuant,
        Self::DiaNn,
        Self::TopPic,
    ];

    /// The way this engine writes modifications
    pub const fn notation(self) -> ModNotation {
        match self {
            Self::Sequest | Self::XTandem => ModNotation::Symbol,
            Self::Inspect | Self::MsgfPlus | Self::Moda | Self::ModPlus => ModNotation::NumericDelta,
            Self::MsAlign | Self::TopPic => ModNotation::BracketMass,
            Self::MsPathFinder => ModNotation::External(ExternalFormat::MsPathFinder),
            Self::MsFragger => ModNotation::External(ExternalFormat::MsFragger),
            Self::MaxQuant => ModNotation::External(ExternalFormat::MaxQuant),
            Self::DiaNn => ModNotation::External(ExternalFormat::DiaNn),
        }
    }

    /// The name of this engine
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sequest => "SEQUEST",
            Self::XTandem => "X!Tandem",
            Self::Inspect => "InSpecT",
            Self::MsgfPlus => "MS-GF+",
            Self::MsAlign => "MSAlign",
            Self::Moda => "MODa",
            Self::ModPlus => "MODPlus",
            Self::MsPathFinder => "MSPathFinder",
            Self::MsFragger => "MSFragger",
            Self::MaxQuant => "MaxQuant",
            Self::DiaNn => "DIA-NN",
            Self::TopPic => "TopPIC",
        }
    }
}

impl Display for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for SearchEngine {
    type Err = PsmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s
            .trim()
            .to_ascii_lowercase()
            .replace(['-', '_', ' ', '!', '+'], "");
        Self::ALL
            .iter()
            .copied()
            .find(|engine| {
                engine
                    .name()
                    .to_ascii_lowercase()
                    .replace(['-', '_', ' ', '!', '+'], "")
                    == normalised
                    || format!("{engine:?}").to_ascii_lowercase() == normalised
            })
            .ok_or_else(|| {
                BoxedError::new(
                    PsmErrorKind::InvalidParameters,
                    "Unknown search engine",
                    format!(
                        "Use one of: {}",
                        Self::ALL.iter().map(|e| e.name()).collect::<Vec<_>>().join(", ")
                    ),
                    Context::show(s.to_string()),
                )
            })
    }
}

/// A search engine output with the modifications in a separate column
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum ExternalFormat {
    /// `Assigned Modifications`: `5M(15.9949), N-term(42.0106)`
    MsFragger,
    /// `Modified sequence`: `_(Acetyl (Protein N-term))AM(Oxidation (M))PEP_`
    MaxQuant,
    /// `Modified.Sequence`: `(UniMod:1)AM(UniMod:35)PEP`
    DiaNn,
    /// `Modifications`: `Oxidation 7,Acetyl 0`
    MsPathFinder,
}

/// How modifications are written in (or next to) a peptide sequence
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum ModNotation {
    /// A symbol after the modified residue: `PEPM*TIDE`
    Symbol,
    /// A signed mass after the modified residue, or before the first for N terminal modifications: `+42.011PEPM+15.995TIDE`
    NumericDelta,
    /// A mass or name in square brackets after the residue or a group of residues: `PEP(M)[15.99]TIDE`, `[Acetyl]PEPTIDE`
    BracketMass,
    /// A plain sequence, with the modifications in a separate column
    External(ExternalFormat),
}

/// How an extracted modification is identified
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum ModKey {
    /// A display symbol
    Symbol(char),
    /// A mass shift in Dalton
    Mass(f64),
    /// A name, mass correction tag, or Unimod accession
    Name(String),
}

impl Display for ModKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Symbol(symbol) => write!(f, "{symbol}"),
            Self::Mass(mass) => write!(f, "{mass:+}"),
            Self::Name(name) => write!(f, "{name}"),
        }
    }
}

/// A modification found in a sequence, not yet resolved to a definition
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ExtractedModification {
    /// How the modification is identified
    pub key: ModKey,
    /// Where the modification is placed, index based on the clean sequence
    pub position: SequencePosition,
}

impl ExtractedModification {
    /// Create a new extracted modification
    pub const fn new(key: ModKey, position: SequencePosition) -> Self {
        Self { key, position }
    }
}

/// The clean sequence and the modifications found in a sequence in engine specific notation
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ExtractedModifications {
    /// The sequence without any modification notation, in upper case
    pub clean_sequence: String,
    /// The modifications
    pub modifications: Vec<ExtractedModification>,
}

impl ExtractedModifications {
    pub(crate) fn push_residue(&mut self, residue: char) {
        self.clean_sequence.push(residue.to_ascii_uppercase());
    }

    /// The position for a modification written right after the residues seen so far
    pub(crate) fn current_position(&self) -> SequencePosition {
        match self.clean_sequence.len() {
            0 => SequencePosition::NTerm,
            length => SequencePosition::Index(length - 1),
        }
    }

    pub(crate) fn push(&mut self, key: ModKey, position: SequencePosition) {
        self.modifications.push(ExtractedModification::new(key, position));
    }
}

impl ModNotation {
    /// Find the clean sequence and all modifications in the primary sequence (without flanking
    /// residues). For external notations the separate modifications column is parsed, if it
    /// is missing the sequence itself is parsed for MaxQuant and DIA-NN modified sequences.
    /// # Errors
    /// If the sequence or modifications column does not follow the notation.
    pub fn extract(
        self,
        primary: &str,
        external: Option<&str>,
    ) -> Result<ExtractedModifications, PsmError> {
        match self {
            Self::Symbol => Ok(extract_symbols(primary)),
            Self::NumericDelta => extract_numeric_deltas(primary),
            Self::BracketMass => extract_bracket_masses(primary),
            Self::External(format) => extract_external(format, primary, external),
        }
    }
}

fn extract_symbols(primary: &str) -> ExtractedModifications {
    let mut extracted = ExtractedModifications::default();
    for c in primary.chars() {
        if c.is_ascii_alphabetic() {
            extracted.push_residue(c);
        } else if !c.is_whitespace() {
            extracted.push(ModKey::Symbol(c), extracted.current_position());
        }
    }
    extracted
}

fn unexpected_character(
    primary: &str,
    index: usize,
    notation: &str,
) -> PsmError {
    BoxedError::new(
        PsmErrorKind::InvalidRow,
        "Invalid modified sequence",
        format!("This character is not valid in the {notation} notation"),
        Context::line(None, primary, index, 1),
    )
    .to_owned()
}

fn extract_numeric_deltas(primary: &str) -> Result<ExtractedModifications, PsmError> {
    let mut extracted = ExtractedModifications::default();
    let bytes = primary.as_bytes();
    let mut index = 0;
    while index < bytes.len() {
        let byte = bytes[index];
        if byte.is_ascii_alphabetic() {
            extracted.push_residue(char::from(byte));
            index += 1;
        } else if byte.is_ascii_whitespace() {
            index += 1;
        } else if let Some((length, mass)) = next_signed_decimal::<true>(primary, index) {
            extracted.push(ModKey::Mass(mass), extracted.current_position());
            index += length;
        } else {
            return Err(unexpected_character(primary, index, "numeric mass"));
        }
    }
    Ok(extracted)
}

fn extract_bracket_masses(primary: &str) -> Result<ExtractedModifications, PsmError> {
    let mut extracted = ExtractedModifications::default();
    let bytes = primary.as_bytes();
    let mut index = 0;
    let mut group_start = None;
    let mut closed_group = None;
    while index < bytes.len() {
        let byte = bytes[index];
        match byte {
            b'(' => {
                group_start = Some(extracted.clean_sequence.len());
                closed_group = None;
                index += 1;
            }
            b')' => {
                closed_group = group_start.take();
                index += 1;
            }
            b'[' => {
                let end = end_of_enclosure(primary, index + 1, b'[', b']').ok_or_else(|| {
                    BoxedError::new(
                        PsmErrorKind::InvalidRow,
                        "Invalid modified sequence",
                        "The modification is not closed with a square bracket",
                        Context::line(None, primary, index, primary.len() - index),
                    )
                    .to_owned()
                })?;
                // A modification on a group of residues is placed on the first residue of the group
                let position = match closed_group {
                    Some(start) if start < extracted.clean_sequence.len() => {
                        SequencePosition::Index(start)
                    }
                    _ => extracted.current_position(),
                };
                for content in primary[index + 1..end].split(';') {
                    let content = content.trim();
                    if content.is_empty() {
                        continue;
                    }
                    let key = content
                        .parse::<f64>()
                        .map_or_else(|_| ModKey::Name(content.to_string()), ModKey::Mass);
                    extracted.push(key, position);
                }
                closed_group = None;
                index = end + 1;
            }
            b if b.is_ascii_alphabetic() => {
                extracted.push_residue(char::from(b));
                closed_group = None;
                index += 1;
            }
            b if b.is_ascii_whitespace() => index += 1,
            _ => return Err(unexpected_character(primary, index, "bracket mass")),
        }
    }
    Ok(extracted)
}

fn extract_external(
    format: ExternalFormat,
    primary: &str,
    external: Option<&str>,
) -> Result<ExtractedModifications, PsmError> {
    match format {
        ExternalFormat::MaxQuant | ExternalFormat::DiaNn => {
            let parse = match format {
                ExternalFormat::MaxQuant => parse_maxquant_modified_sequence,
                _ => parse_diann_modified_sequence,
            };
            let Some(modified) = external.filter(|e| !e.trim().is_empty()) else {
                return parse(primary);
            };
            let extracted = parse(modified)?;
            let clean = plain_sequence(primary);
            if extracted.clean_sequence == clean {
                Ok(extracted)
            } else {
                Err(BoxedError::new(
                    PsmErrorKind::InvalidRow,
                    "Invalid modified sequence",
                    format!(
                        "The modified sequence does not contain the same residues as the peptide '{clean}'"
                    ),
                    Context::show(modified.to_string()),
                ))
            }
        }
        ExternalFormat::MsFragger | ExternalFormat::MsPathFinder => {
            let clean_sequence = plain_sequence(primary);
            let modifications = match external.map(str::trim) {
                Some(text) if !text.is_empty() => match format {
                    ExternalFormat::MsFragger => parse_msfragger_modifications(text)?,
                    _ => parse_mspathfinder_modifications(text, clean_sequence.len())?,
                },
                _ => Vec::new(),
            };
            Ok(ExtractedModifications {
                clean_sequence,
                modifications,
            })
        }
    }
}

/// Only the residues of the sequence, in upper case
pub(crate) fn plain_sequence(text: &str) -> String {
    text.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

#[cfg(test)]
#[expect(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    fn keys(extracted: &ExtractedModifications) -> Vec<(String, SequencePosition)> {
        extracted
            .modifications
            .iter()
            .map(|m| (m.key.to_string(), m.position))
            .collect()
    }

    #[test]
    fn symbols() {
        let extracted = ModNotation::Symbol.extract("M*PEPT#IDEK@", None).unwrap();
        assert_eq!(extracted.clean_sequence, "MPEPTIDEK");
        assert_eq!(
            keys(&extracted),
            [
                ("*".to_string(), SequencePosition::Index(0)),
                ("#".to_string(), SequencePosition::Index(4)),
                ("@".to_string(), SequencePosition::Index(8)),
            ]
        );
        let extracted = ModNotation::Symbol.extract("]PEPTIDE", None).unwrap();
        assert_eq!(keys(&extracted), [("]".to_string(), SequencePosition::NTerm)]);
    }

    #[test]
    fn numeric() {
        let extracted = ModNotation::NumericDelta
            .extract("+42.011M+15.995PEPC+57.021-17.027TIDE", None)
            .unwrap();
        assert_eq!(extracted.clean_sequence, "MPEPCTIDE");
        let found: Vec<(f64, SequencePosition)> = extracted
            .modifications
            .iter()
            .map(|m| match m.key {
                ModKey::Mass(mass) => (mass, m.position),
                _ => panic!("Not a mass"),
            })
            .collect();
        assert_eq!(
            found,
            [
                (42.011, SequencePosition::NTerm),
                (15.995, SequencePosition::Index(0)),
                (57.021, SequencePosition::Index(4)),
                (-17.027, SequencePosition::Index(4)),
            ]
        );
        assert!(ModNotation::NumericDelta.extract("PEP*TIDE", None).is_err());
    }

    #[test]
    fn brackets() {
        let extracted = ModNotation::BracketMass
            .extract("[Acetyl]PE(PT)[79.97]M[+15.99]IDE", None)
            .unwrap();
        assert_eq!(extracted.clean_sequence, "PEPTMIDE");
        assert_eq!(
            extracted.modifications,
            [
                ExtractedModification::new(ModKey::Name("Acetyl".to_string()), SequencePosition::NTerm),
                ExtractedModification::new(ModKey::Mass(79.97), SequencePosition::Index(2)),
                ExtractedModification::new(ModKey::Mass(15.99), SequencePosition::Index(4)),
            ]
        );
        assert!(ModNotation::BracketMass.extract("PEP[15.99", None).is_err());
        assert!(ModNotation::BracketMass.extract("PEP*", None).is_err());
    }

    #[test]
    fn external() {
        let notation = SearchEngine::MsFragger.notation();
        let extracted = notation
            .extract("MPEPTIDE", Some("1M(15.9949), N-term(42.0106)"))
            .unwrap();
        assert_eq!(extracted.clean_sequence, "MPEPTIDE");
        assert_eq!(extracted.modifications.len(), 2);
        let extracted = notation.extract("MPEPTIDE", None).unwrap();
        assert!(extracted.modifications.is_empty());

        let notation = SearchEngine::MaxQuant.notation();
        let extracted = notation
            .extract("AMPEP", Some("_(Acetyl (Protein N-term))AM(Oxidation (M))PEP_"))
            .unwrap();
        assert_eq!(extracted.clean_sequence, "AMPEP");
        assert_eq!(extracted.modifications.len(), 2);
        assert!(notation.extract("AMPEK", Some("_AM(Oxidation (M))PEP_")).is_err());
        let extracted = notation.extract("_AM(Oxidation (M))PEP_", None).unwrap();
        assert_eq!(extracted.clean_sequence, "AMPEP");
    }

    #[test]
    fn engines() {
        for engine in SearchEngine::ALL {
            assert_eq!(engine.to_string().parse::<SearchEngine>().unwrap(), *engine);
        }
        assert_eq!("msgfplus".parse::<SearchEngine>().unwrap(), SearchEngine::MsgfPlus);
        assert_eq!("DiaNN".parse::<SearchEngine>().unwrap(), SearchEngine::DiaNn);
        assert!("Mascot".parse::<SearchEngine>().is_err());
    }
}
