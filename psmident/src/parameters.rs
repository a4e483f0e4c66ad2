use std::io::Read;

use context_error::*;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::{SearchEngine, SearchResultAnnotator, helper_functions::str_starts_with};
use psmcore::{
    PsmError, PsmErrorKind,
    modification::{
        C_TERMINAL_PEPTIDE_SYMBOL, C_TERMINAL_PROTEIN_SYMBOL, DEFAULT_DIGITS_OF_PRECISION,
        DEFAULT_LOOSE_DIGITS_OF_PRECISION, DeclarationKind, MassCorrectionTag,
        ModificationDeclaration, ModificationRegistry, N_TERMINAL_PEPTIDE_SYMBOL,
        N_TERMINAL_PROTEIN_SYMBOL,
    },
    quantities::PrecursorMassTolerance,
    sequence::{EnzymeSpecification, PeptideCleavageClassifier, PeptideMassCalculator},
};

/// The search engine parameters needed to annotate the results of one search.
/// ```rust
/// use psmident::SearchEngineParameters;
/// let parameters = SearchEngineParameters::from_json(r#"{
///     "engine": "MsgfPlus",
///     "enzyme": {"Standard": "Trypsin"},
///     "modifications": [
///         {"formula": "C2H3NO", "targets": "C", "kind": "Static"},
///         {"mass": 15.994915, "targets": "M", "names": ["Oxidation"]}
///     ],
///     "precursor_tolerance": "20ppm"
/// }"#).unwrap();
/// let (_annotator, registry) = parameters.build().unwrap();
/// assert_eq!(registry.len(), 2);
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SearchEngineParameters {
    /// The search engine that produced the results
    pub engine: SearchEngine,
    /// The enzyme used in the search
    #[serde(default)]
    pub enzyme: EnzymeSpecification,
    /// The declared modifications
    #[serde(default)]
    pub modifications: Vec<ModificationDeclaration>,
    /// The N terminal group mass, H if not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_terminus_mass: Option<f64>,
    /// The C terminal group mass, OH if not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c_terminus_mass: Option<f64>,
    /// The precursor tolerance, either as text (`20ppm`, `0.5Da,2.5Da`) or as structure
    #[serde(
        default,
        deserialize_with = "deserialize_tolerance",
        skip_serializing_if = "Option::is_none"
    )]
    pub precursor_tolerance: Option<PrecursorMassTolerance>,
    /// The number of digits masses are compared at
    #[serde(default = "default_digits")]
    pub digits_of_precision: u8,
    /// The number of digits masses are compared at when no match was found at `digits_of_precision`
    #[serde(default = "default_loose_digits")]
    pub loose_digits_of_precision: u8,
    /// Allow an equivalent modification to be placed twice on the same terminal residue
    #[serde(default)]
    pub allow_duplicate_mod_on_terminus: bool,
    /// Adjust the precursor mass when a non monoisotopic peak was selected
    #[serde(default = "default_true")]
    pub adjust_precursor_mass_for_c13: bool,
    /// Extra mass correction tags, these take precedence over the built-in ones
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mass_correction_tags: Vec<MassCorrectionTag>,
}

const fn default_digits() -> u8 {
    DEFAULT_DIGITS_OF_PRECISION
}

const fn default_loose_digits() -> u8 {
    DEFAULT_LOOSE_DIGITS_OF_PRECISION
}

const fn default_true() -> bool {
    true
}

fn deserialize_tolerance<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<PrecursorMassTolerance>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Tolerance {
        Text(String),
        Structured(PrecursorMassTolerance),
    }
    match Option::<Tolerance>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Tolerance::Structured(tolerance)) => Ok(Some(tolerance)),
        Some(Tolerance::Text(text)) => text
            .parse()
            .map(Some)
            .map_err(|e: PsmError| serde::de::Error::custom(e.get_long_description())),
    }
}

impl Default for SearchEngineParameters {
    fn default() -> Self {
        Self::new(SearchEngine::default())
    }
}

impl SearchEngineParameters {
    /// Parameters for the given engine with trypsin, no modifications, and the default precisions
    pub fn new(engine: SearchEngine) -> Self {
        Self {
            engine,
            enzyme: EnzymeSpecification::default(),
            modifications: Vec::new(),
            n_terminus_mass: None,
            c_terminus_mass: None,
            precursor_tolerance: None,
            digits_of_precision: DEFAULT_DIGITS_OF_PRECISION,
            loose_digits_of_precision: DEFAULT_LOOSE_DIGITS_OF_PRECISION,
            allow_duplicate_mod_on_terminus: false,
            adjust_precursor_mass_for_c13: true,
            mass_correction_tags: Vec::new(),
        }
    }

    /// Read the parameters from JSON text
    /// # Errors
    /// If the text is not valid JSON or does not describe valid parameters.
    pub fn from_json(text: &str) -> Result<Self, PsmError> {
        serde_json::from_str(text).map_err(|e| json_error(&e, text))
    }

    /// Read the parameters as JSON from a reader
    /// # Errors
    /// If the reader fails, or its content is not valid JSON or does not describe valid parameters.
    pub fn from_reader(mut reader: impl Read) -> Result<Self, PsmError> {
        let mut text = String::new();
        reader.read_to_string(&mut text).map_err(|e| {
            BoxedError::new(
                PsmErrorKind::IO,
                "Could not read parameters",
                e.to_string(),
                Context::none(),
            )
        })?;
        Self::from_json(&text)
    }

    /// Add a modification declared as MS-GF+ `Mods.txt` line, see [`parse_msgf_mod_line`]
    /// # Errors
    /// If the line is not a valid modification line.
    pub fn add_msgf_mod_line(&mut self, line: &str) -> Result<(), PsmError> {
        if let Some(declaration) = parse_msgf_mod_line(line)? {
            self.modifications.push(declaration);
        }
        Ok(())
    }

    /// Add a modification declared as MSFragger `fragger.params` line, see [`parse_msfragger_param_line`]
    /// # Errors
    /// If the line is a modification line with an invalid mass.
    pub fn add_msfragger_param_line(&mut self, line: &str) -> Result<(), PsmError> {
        if let Some(declaration) = parse_msfragger_param_line(line)? {
            self.modifications.push(declaration);
        }
        Ok(())
    }

    /// The mass calculator with the terminal group masses from these parameters
    pub fn calculator(&self) -> PeptideMassCalculator {
        let mut calculator = PeptideMassCalculator::default();
        if let Some(mass) = self.n_terminus_mass {
            calculator.set_n_terminus_mass(mass);
        }
        if let Some(mass) = self.c_terminus_mass {
            calculator.set_c_terminus_mass(mass);
        }
        calculator
    }

    /// A registry with all declared modifications. Declarations that cannot be resolved (an
    /// invalid formula for example) are skipped with a warning.
    pub fn registry(&self) -> ModificationRegistry {
        let mut registry = ModificationRegistry::new(self.calculator())
            .with_precision(self.digits_of_precision, self.loose_digits_of_precision);
        for tag in self.mass_correction_tags.iter().rev() {
            registry.add_mass_correction_tag(tag.clone());
        }
        for declaration in &self.modifications {
            if let Err(error) = registry.add_from_declaration(declaration) {
                warn!("Skipped modification {}: {error}", declaration.title());
            }
        }
        debug!(
            "Registry for {} with {} declared modifications",
            self.engine,
            registry.len()
        );
        registry
    }

    /// Build the annotator and the registry for a run with these parameters
    /// # Errors
    /// If the enzyme has an invalid custom cleavage rule.
    pub fn build(&self) -> Result<(SearchResultAnnotator, ModificationRegistry), PsmError> {
        let classifier = PeptideCleavageClassifier::new(self.enzyme.rule()?);
        let mut annotator =
            SearchResultAnnotator::new(self.engine.notation(), self.calculator(), classifier)
                .with_allow_duplicate_mod_on_terminus(self.allow_duplicate_mod_on_terminus)
                .with_adjust_precursor_mass(self.adjust_precursor_mass_for_c13);
        if let Some(tolerance) = self.precursor_tolerance {
            annotator = annotator.with_precursor_tolerance(tolerance);
        }
        Ok((annotator, self.registry()))
    }
}

fn json_error(error: &serde_json::Error, text: &str) -> PsmError {
    let line = text.lines().nth(error.line().saturating_sub(1)).unwrap_or_default();
    BoxedError::new(
        PsmErrorKind::InvalidParameters,
        "Invalid search engine parameters",
        error.to_string(),
        Context::line(
            Some(error.line() as u32),
            line,
            error.column().saturating_sub(1).min(line.len()),
            1,
        ),
    )
    .to_owned()
}

fn parameter_error(line: &str, explanation: impl Into<String>) -> PsmError {
    BoxedError::new(
        PsmErrorKind::InvalidParameters,
        "Invalid modification parameter",
        explanation.into(),
        Context::show(line.to_string()),
    )
}

/// Remove a trailing `#` comment and surrounding whitespace
fn strip_comment(line: &str) -> &str {
    line.split_once('#').map_or(line, |(content, _)| content).trim()
}

/// Parse one line of an MS-GF+ modification file (`Mods.txt`):
/// `CompositionOrMass,Residues,ModType,Position,Name`, eg `C2H3N1O1,C,fix,any,Carbamidomethyl`
/// or `15.994915,M,opt,any,Oxidation`. A `*` as residue means any residue, for terminal
/// positions it means the terminus itself. Empty lines, comments, and `NumMods=` lines give `None`.
/// ```rust
/// use psmident::parse_msgf_mod_line;
/// use psmcore::modification::DeclarationKind;
/// let declaration = parse_msgf_mod_line("C2H2O,*,opt,Prot-N-term,Acetyl").unwrap().unwrap();
/// assert_eq!(declaration.targets, "[");
/// assert_eq!(declaration.kind, DeclarationKind::Dynamic);
/// assert!(parse_msgf_mod_line("NumMods=3").unwrap().is_none());
/// ```
/// # Errors
/// If the line does not have all fields, or has an unknown modification type or position.
pub fn parse_msgf_mod_line(line: &str) -> Result<Option<ModificationDeclaration>, PsmError> {
    let content = strip_comment(line);
    if content.is_empty() || str_starts_with::<true>(content, "nummods") {
        return Ok(None);
    }
    let fields: Vec<&str> = content.split(',').map(str::trim).collect();
    let [composition, residues, mod_type, position, name, ..] = fields.as_slice() else {
        return Err(parameter_error(
            line,
            "An MS-GF+ modification needs five fields: CompositionOrMass,Residues,ModType,Position,Name",
        ));
    };
    let fixed = match mod_type.to_ascii_lowercase().as_str() {
        "fix" => true,
        "opt" => false,
        _ => {
            return Err(parameter_error(
                line,
                format!("The modification type '{mod_type}' is not 'fix' or 'opt'"),
            ));
        }
    };
    let terminus = match position.to_ascii_lowercase().as_str() {
        "any" => None,
        "n-term" => Some((N_TERMINAL_PEPTIDE_SYMBOL, DeclarationKind::TerminalPeptideStatic)),
        "c-term" => Some((C_TERMINAL_PEPTIDE_SYMBOL, DeclarationKind::TerminalPeptideStatic)),
        "prot-n-term" => Some((N_TERMINAL_PROTEIN_SYMBOL, DeclarationKind::ProteinTerminusStatic)),
        "prot-c-term" => Some((C_TERMINAL_PROTEIN_SYMBOL, DeclarationKind::ProteinTerminusStatic)),
        _ => {
            return Err(parameter_error(
                line,
                format!(
                    "The position '{position}' is not one of any, N-term, C-term, Prot-N-term, Prot-C-term"
                ),
            ));
        }
    };
    let any_residue = *residues == "*";
    let targets = match (any_residue, terminus) {
        (true, Some((symbol, _))) => symbol.to_string(),
        (true, None) => String::new(),
        // A fixed terminal modification only on the given residues at that terminus
        (false, Some((symbol, _))) if fixed => format!("{}{symbol}", residues.to_ascii_uppercase()),
        (false, _) => residues.to_ascii_uppercase(),
    };
    let kind = match (fixed, terminus) {
        (false, _) => DeclarationKind::Dynamic,
        (true, Some((_, kind))) => kind,
        (true, None) => DeclarationKind::Static,
    };
    let mut declaration = composition.parse::<f64>().map_or_else(
        |_| ModificationDeclaration::from_formula(*composition, targets.clone(), kind),
        |mass| ModificationDeclaration::from_mass(mass, targets.clone(), kind),
    );
    if !name.is_empty() {
        declaration.names.push((*name).to_string());
    }
    Ok(Some(declaration))
}

/// Parse one line of an MSFragger parameter file (`fragger.params`). Handled are variable
/// modifications (`variable_mod_01 = 15.9949 M 3`) and fixed modifications
/// (`add_C_cysteine = 57.021464`, `add_Nterm_peptide = 229.162932`). Other lines and fixed
/// modifications with a zero mass give `None`.
/// ```rust
/// use psmident::parse_msfragger_param_line;
/// use psmcore::modification::DeclarationKind;
/// let declaration = parse_msfragger_param_line("variable_mod_02 = 42.0106 [^ 1").unwrap().unwrap();
/// assert_eq!(declaration.targets, "[");
/// let declaration = parse_msfragger_param_line("add_C_cysteine = 57.021464").unwrap().unwrap();
/// assert_eq!(declaration.kind, DeclarationKind::Static);
/// assert!(parse_msfragger_param_line("add_G_glycine = 0.000000").unwrap().is_none());
/// ```
/// # Errors
/// If a modification line has an invalid mass.
pub fn parse_msfragger_param_line(line: &str) -> Result<Option<ModificationDeclaration>, PsmError> {
    let Some((key, value)) = strip_comment(line).split_once('=') else {
        return Ok(None);
    };
    let key = key.trim();
    let mut values = value.split_whitespace();
    let parse_mass = |text: Option<&str>| {
        text.and_then(|t| t.parse::<f64>().ok()).ok_or_else(|| {
            parameter_error(line, "The modification mass is not a valid number")
        })
    };

    if str_starts_with::<true>(key, "variable_mod_") {
        let mass = parse_mass(values.next())?;
        let sites = values.next().unwrap_or_default();
        if mass == 0.0 || sites.is_empty() {
            return Ok(None);
        }
        return Ok(Some(ModificationDeclaration::from_mass(
            mass,
            msfragger_sites(sites),
            DeclarationKind::Dynamic,
        )));
    }

    let Some(target) = key.strip_prefix("add_") else {
        return Ok(None);
    };
    let (target, kind) = match target.to_ascii_lowercase().as_str() {
        "nterm_peptide" => (
            N_TERMINAL_PEPTIDE_SYMBOL.to_string(),
            DeclarationKind::TerminalPeptideStatic,
        ),
        "cterm_peptide" => (
            C_TERMINAL_PEPTIDE_SYMBOL.to_string(),
            DeclarationKind::TerminalPeptideStatic,
        ),
        "nterm_protein" => (
            N_TERMINAL_PROTEIN_SYMBOL.to_string(),
            DeclarationKind::ProteinTerminusStatic,
        ),
        "cterm_protein" => (
            C_TERMINAL_PROTEIN_SYMBOL.to_string(),
            DeclarationKind::ProteinTerminusStatic,
        ),
        residue => match residue.split_once('_') {
            Some((code, _)) if code.len() == 1 && code.bytes().all(|b| b.is_ascii_alphabetic()) => {
                (code.to_ascii_uppercase(), DeclarationKind::Static)
            }
            _ => return Ok(None),
        },
    };
    let mass = parse_mass(values.next())?;
    if mass == 0.0 {
        Ok(None)
    } else {
        Ok(Some(ModificationDeclaration::from_mass(mass, target, kind)))
    }
}

/// Translate MSFragger site codes into target residues: `n^` and `c^` are the peptide termini,
/// `[^` and `]^` the protein termini, `nQ` is Q at the peptide N terminus (targeted as Q), and
/// `*` is any residue.
fn msfragger_sites(sites: &str) -> String {
    let chars: Vec<char> = sites.chars().collect();
    let mut targets = String::new();
    let mut index = 0;
    while index < chars.len() {
        let next = chars.get(index + 1).copied();
        let symbol = match chars[index] {
            'n' => Some(N_TERMINAL_PEPTIDE_SYMBOL),
            'c' => Some(C_TERMINAL_PEPTIDE_SYMBOL),
            '[' => Some(N_TERMINAL_PROTEIN_SYMBOL),
            ']' => Some(C_TERMINAL_PROTEIN_SYMBOL),
            _ => None,
        };
        match (symbol, next) {
            (Some(symbol), Some('^' | '*')) => {
                targets.push(symbol);
                index += 2;
            }
            (Some(_), Some(residue)) if residue.is_ascii_uppercase() => {
                targets.push(residue);
                index += 2;
            }
            (Some(symbol), None) => {
                targets.push(symbol);
                index += 1;
            }
            _ => {
                let c = chars[index];
                if c.is_ascii_uppercase() && !targets.contains(c) {
                    targets.push(c);
                } else if c == '*' {
                    return String::new();
                }
                index += 1;
            }
        }
    }
    targets
}

#[cfg(test)]
#[expect(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use crate::RawPsmRow;

    #[test]
    fn msgf_lines() {
        let declaration = parse_msgf_mod_line("C2H3N1O1,C,fix,any,Carbamidomethyl")
            .unwrap()
            .unwrap();
        assert_eq!(declaration.formula.as_deref(), Some("C2H3N1O1"));
        assert_eq!(declaration.targets, "C");
        assert_eq!(declaration.kind, DeclarationKind::Static);
        assert_eq!(declaration.names, ["Carbamidomethyl"]);

        let declaration = parse_msgf_mod_line("15.994915,M,opt,any,Oxidation   # Oxidation M")
            .unwrap()
            .unwrap();
        assert_eq!(declaration.mass, Some(15.994915));
        assert_eq!(declaration.kind, DeclarationKind::Dynamic);

        let declaration = parse_msgf_mod_line("229.162932,*,fix,N-term,TMT6plex")
            .unwrap()
            .unwrap();
        assert_eq!(declaration.targets, "<");
        assert_eq!(declaration.kind, DeclarationKind::TerminalPeptideStatic);

        let declaration = parse_msgf_mod_line("H-2O-1,E,opt,N-term,Glu->pyro-Glu")
            .unwrap()
            .unwrap();
        assert_eq!(declaration.targets, "E");
        assert_eq!(declaration.kind, DeclarationKind::Dynamic);

        let declaration = parse_msgf_mod_line("H-3N-1,Q,fix,N-term,Gln->pyro-Glu")
            .unwrap()
            .unwrap();
        assert_eq!(declaration.targets, "Q<");
        assert_eq!(declaration.kind, DeclarationKind::TerminalPeptideStatic);
        let declaration = parse_msgf_mod_line("-0.984016,K,fix,Prot-C-term,Amidated")
            .unwrap()
            .unwrap();
        assert_eq!(declaration.targets, "K]");
        assert_eq!(declaration.kind, DeclarationKind::ProteinTerminusStatic);

        assert!(parse_msgf_mod_line("# a comment").unwrap().is_none());
        assert!(parse_msgf_mod_line("   ").unwrap().is_none());
        assert!(parse_msgf_mod_line("NumMods=2").unwrap().is_none());
        assert!(parse_msgf_mod_line("15.99,M,opt").is_err());
        assert!(parse_msgf_mod_line("15.99,M,sometimes,any,Oxidation").is_err());
        assert!(parse_msgf_mod_line("15.99,M,opt,middle,Oxidation").is_err());
    }

    #[test]
    fn msfragger_lines() {
        let declaration = parse_msfragger_param_line("variable_mod_01 = 15.9949 M 3 # Oxidation")
            .unwrap()
            .unwrap();
        assert_eq!(declaration.mass, Some(15.9949));
        assert_eq!(declaration.targets, "M");
        assert_eq!(declaration.kind, DeclarationKind::Dynamic);

        let declaration = parse_msfragger_param_line("variable_mod_03 = -17.0265 nQnC 1")
            .unwrap()
            .unwrap();
        assert_eq!(declaration.targets, "QC");
        let declaration = parse_msfragger_param_line("variable_mod_04 = 42.0106 n^ 1")
            .unwrap()
            .unwrap();
        assert_eq!(declaration.targets, "<");
        let declaration = parse_msfragger_param_line("variable_mod_05 = 79.96633 STY 3")
            .unwrap()
            .unwrap();
        assert_eq!(declaration.targets, "STY");

        let declaration = parse_msfragger_param_line("add_Nterm_peptide = 229.162932")
            .unwrap()
            .unwrap();
        assert_eq!(declaration.targets, "<");
        assert_eq!(declaration.kind, DeclarationKind::TerminalPeptideStatic);
        let declaration = parse_msfragger_param_line("add_Cterm_protein = 1.0")
            .unwrap()
            .unwrap();
        assert_eq!(declaration.targets, "]");
        assert_eq!(declaration.kind, DeclarationKind::ProteinTerminusStatic);

        assert!(parse_msfragger_param_line("add_K_lysine = 0.000000").unwrap().is_none());
        assert!(parse_msfragger_param_line("num_threads = 8").unwrap().is_none());
        assert!(parse_msfragger_param_line("# variable_mod_01 = 1 M").unwrap().is_none());
        assert!(parse_msfragger_param_line("add_K_lysine = heavy").is_err());
    }

    #[test]
    fn json() {
        let parameters = SearchEngineParameters::from_json(
            r#"{
                "engine": "MsFragger",
                "enzyme": {"Custom": {"left": "[KR]", "right": "[A-Z]"}},
                "precursor_tolerance": {"left": 0.5, "right": 2.5, "is_ppm": false},
                "n_terminus_mass": 1.0,
                "allow_duplicate_mod_on_terminus": true
            }"#,
        )
        .unwrap();
        assert_eq!(parameters.engine, SearchEngine::MsFragger);
        assert_eq!(parameters.digits_of_precision, 3);
        assert_eq!(parameters.loose_digits_of_precision, 1);
        assert!(parameters.adjust_precursor_mass_for_c13);
        assert!(parameters.allow_duplicate_mod_on_terminus);
        assert_eq!(
            parameters.precursor_tolerance,
            Some(PrecursorMassTolerance::new(0.5, 2.5, false))
        );
        assert!((parameters.calculator().n_terminus_mass() - 1.0).abs() < f64::EPSILON);

        let error = SearchEngineParameters::from_json(r#"{"engine": "Mascot"}"#).unwrap_err();
        assert!(matches!(error.get_kind(), PsmErrorKind::InvalidParameters));
        let error =
            SearchEngineParameters::from_json(r#"{"engine": "Sequest", "precursor_tolerance": "20"}"#)
                .unwrap_err();
        assert!(matches!(error.get_kind(), PsmErrorKind::InvalidParameters));
    }

    #[test]
    fn build_skips_invalid_declarations() {
        let mut parameters = SearchEngineParameters::new(SearchEngine::MsgfPlus);
        parameters.add_msgf_mod_line("C2H3N1O1,C,fix,any,Carbamidomethyl").unwrap();
        parameters.add_msgf_mod_line("C2Qq,M,opt,any,Broken").unwrap();
        parameters
            .add_msfragger_param_line("variable_mod_01 = 15.9949 M 3")
            .unwrap();
        let (_, registry) = parameters.build().unwrap();
        assert_eq!(registry.len(), 2);

        parameters.enzyme = EnzymeSpecification::Custom {
            left: "[KR".to_string(),
            right: "[^P]".to_string(),
        };
        assert!(parameters.build().is_err());
    }

    #[test]
    fn terminal_fixed_modification_on_residue() {
        let mut parameters = SearchEngineParameters::new(SearchEngine::MsgfPlus);
        parameters
            .add_msgf_mod_line("H-3N-1,Q,fix,N-term,Gln->pyro-Glu")
            .unwrap();
        let (annotator, mut registry) = parameters.build().unwrap();

        let result = annotator.annotate(&RawPsmRow::new(1, 2, "K.QAQAQK.A"), &mut registry);
        let locations: Vec<usize> = result
            .modifications()
            .iter()
            .map(|m| m.residue_location())
            .collect();
        assert_eq!(locations, [1]);

        let result = annotator.annotate(&RawPsmRow::new(2, 2, "K.AQAQK.A"), &mut registry);
        assert!(result.modifications().is_empty());
        assert_eq!(registry.definitions()[0].occurrence_count(), 1);
    }
}
