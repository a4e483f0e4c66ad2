use crate::sequence::{
    CleavageRule, PeptideCleavageState, PeptideTerminusState, StandardCleavageAgent,
    split_prefix_and_suffix,
};

/// The symbols that different engines use to denote a protein terminus as flanking residue
pub const DEFAULT_TERMINUS_SYMBOLS: &[char] = &['-', '[', ']'];

/// Classifies peptides based on their flanking residues and the cleavage rule of the enzyme.
/// ```rust
/// use psmcore::prelude::*;
/// let classifier = PeptideCleavageClassifier::default();
/// assert_eq!(
///     classifier.compute_cleavage_state_with_context("-.GLMVPVIR.A"),
///     PeptideCleavageState::Full
/// );
/// assert_eq!(
///     classifier.compute_terminus_state_with_context("-.GLMVPVIR.-"),
///     PeptideTerminusState::ProteinNandCCTerminus
/// );
/// ```
#[derive(Clone, Debug)]
pub struct PeptideCleavageClassifier {
    rule: CleavageRule,
    terminus_symbols: Vec<char>,
}

impl Default for PeptideCleavageClassifier {
    fn default() -> Self {
        Self::new(StandardCleavageAgent::Trypsin.rule())
    }
}

impl PeptideCleavageClassifier {
    /// Create a classifier for the given cleavage rule
    pub fn new(rule: CleavageRule) -> Self {
        Self {
            rule,
            terminus_symbols: DEFAULT_TERMINUS_SYMBOLS.to_vec(),
        }
    }

    /// The cleavage rule used
    pub const fn rule(&self) -> &CleavageRule {
        &self.rule
    }

    /// Add another symbol that denotes a protein terminus
    pub fn add_terminus_symbol(&mut self, symbol: char) {
        if !self.terminus_symbols.contains(&symbol) {
            self.terminus_symbols.push(symbol);
        }
    }

    /// If the residue is a protein terminus symbol
    pub fn is_terminus_symbol(&self, residue: char) -> bool {
        self.terminus_symbols.contains(&residue)
    }

    fn adjacent_prefix_residue(prefix: &str) -> Option<char> {
        prefix.trim().chars().next_back()
    }

    fn adjacent_suffix_residue(suffix: &str) -> Option<char> {
        suffix.trim().chars().next()
    }

    fn residues(clean_sequence: &str) -> Vec<char> {
        clean_sequence
            .chars()
            .filter(char::is_ascii_alphabetic)
            .map(|c| c.to_ascii_uppercase())
            .collect()
    }

    /// Compute the cleavage state of a peptide given its flanking residues. A flank that is a
    /// protein terminus symbol always satisfies the rule, a missing flank never does.
    pub fn compute_cleavage_state(
        &self,
        clean_sequence: &str,
        prefix: &str,
        suffix: &str,
    ) -> PeptideCleavageState {
        let residues = Self::residues(clean_sequence);
        let (Some(first), Some(last)) = (residues.first(), residues.last()) else {
            return PeptideCleavageState::NonSpecific;
        };
        let n_terminal = Self::adjacent_prefix_residue(prefix)
            .is_some_and(|p| self.is_terminus_symbol(p) || self.rule.matches(p, *first));
        let c_terminal = Self::adjacent_suffix_residue(suffix)
            .is_some_and(|s| self.is_terminus_symbol(s) || self.rule.matches(*last, s));
        match (n_terminal, c_terminal) {
            (true, true) => PeptideCleavageState::Full,
            (true, false) | (false, true) => PeptideCleavageState::Partial,
            (false, false) => PeptideCleavageState::NonSpecific,
        }
    }

    /// Compute the cleavage state of a peptide written with its context (`K.PEPTIDE.R`)
    pub fn compute_cleavage_state_with_context(&self, sequence: &str) -> PeptideCleavageState {
        let split = split_prefix_and_suffix(sequence);
        self.compute_cleavage_state(split.primary, split.prefix, split.suffix)
    }

    /// Compute if a peptide is located at a protein terminus
    pub fn compute_terminus_state(&self, prefix: &str, suffix: &str) -> PeptideTerminusState {
        PeptideTerminusState::new(
            Self::adjacent_prefix_residue(prefix).is_some_and(|p| self.is_terminus_symbol(p)),
            Self::adjacent_suffix_residue(suffix).is_some_and(|s| self.is_terminus_symbol(s)),
        )
    }

    /// Compute if a peptide written with its context (`-.PEPTIDE.R`) is located at a protein terminus
    pub fn compute_terminus_state_with_context(&self, sequence: &str) -> PeptideTerminusState {
        let split = split_prefix_and_suffix(sequence);
        self.compute_terminus_state(split.prefix, split.suffix)
    }

    /// Count the internal sites where the enzyme would have cut. Any modification symbols or
    /// other non letters are ignored. A rule without specificity never has missed cleavages.
    pub fn compute_number_of_missed_cleavages(&self, clean_sequence: &str) -> usize {
        if self.rule.is_nonspecific() {
            return 0;
        }
        Self::residues(clean_sequence)
            .windows(2)
            .filter(|pair| self.rule.matches(pair[0], pair[1]))
            .count()
    }

    /// Find the first occurrence of the peptide in the protein and return the (prefix, suffix)
    /// flanking residues, using `-` at the protein termini.
    /// ```rust
    /// use psmcore::prelude::*;
    /// let classifier = PeptideCleavageClassifier::default();
    /// assert_eq!(
    ///     classifier.locate_in_protein("PEPTIDE", "MKPEPTIDER"),
    ///     Some(("K".to_string(), "R".to_string()))
    /// );
    /// assert_eq!(
    ///     classifier.locate_in_protein("PEPTIDE", "PEPTIDE"),
    ///     Some(("-".to_string(), "-".to_string()))
    /// );
    /// ```
    pub fn locate_in_protein(
        &self,
        clean_sequence: &str,
        protein: &str,
    ) -> Option<(String, String)> {
        let peptide: String = Self::residues(clean_sequence).into_iter().collect();
        if peptide.is_empty() {
            return None;
        }
        let protein = protein.to_ascii_uppercase();
        let start = protein.find(&peptide)?;
        let end = start + peptide.len();
        let prefix = protein[..start]
            .chars()
            .next_back()
            .map_or_else(|| "-".to_string(), |c| c.to_string());
        let suffix = protein[end..]
            .chars()
            .next()
            .map_or_else(|| "-".to_string(), |c| c.to_string());
        Some((prefix, suffix))
    }
}

#[cfg(test)]
#[expect(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[test]
    fn cleavage_states() {
        let classifier = PeptideCleavageClassifier::default();
        assert_eq!(
            classifier.compute_cleavage_state_with_context("-.GLMVPVIR.A"),
            PeptideCleavageState::Full
        );
        assert_eq!(
            classifier.compute_cleavage_state_with_context("K.APEPTIDER.P"),
            PeptideCleavageState::Partial
        );
        assert_eq!(
            classifier.compute_cleavage_state_with_context("A.PEPTIDEA.A"),
            PeptideCleavageState::NonSpecific
        );
        assert_eq!(
            classifier.compute_cleavage_state("PEPTIDEK", "", ""),
            PeptideCleavageState::NonSpecific
        );
        assert_eq!(
            classifier.compute_cleavage_state("PEPTIDEK", "[", "]"),
            PeptideCleavageState::Full
        );
        assert_eq!(
            classifier.compute_cleavage_state("", "K", "A"),
            PeptideCleavageState::NonSpecific
        );
        assert_eq!(
            classifier.compute_cleavage_state_with_context("R.M*PEPTIDEK#.A"),
            PeptideCleavageState::Full
        );
    }

    #[test]
    fn monotonic_in_flanks() {
        let classifier = PeptideCleavageClassifier::default();
        for suffix in ["A", "P", "-", ""] {
            let good = classifier.compute_cleavage_state("APEPTIDEK", "K", suffix);
            let bad = classifier.compute_cleavage_state("APEPTIDEK", "A", suffix);
            assert!(bad <= good);
        }
    }

    #[test]
    fn terminus_states() {
        let classifier = PeptideCleavageClassifier::default();
        assert_eq!(
            classifier.compute_terminus_state_with_context("-.GLMVPVIR.-"),
            PeptideTerminusState::ProteinNandCCTerminus
        );
        assert_eq!(
            classifier.compute_terminus_state_with_context("[.GLMVPVIR.A"),
            PeptideTerminusState::ProteinNTerminus
        );
        assert_eq!(
            classifier.compute_terminus_state_with_context("K.GLMVPVIR.]"),
            PeptideTerminusState::ProteinCTerminus
        );
        assert_eq!(
            classifier.compute_terminus_state_with_context("GLMVPVIR"),
            PeptideTerminusState::None
        );
        let mut classifier = classifier;
        assert_eq!(classifier.compute_terminus_state("_", "A"), PeptideTerminusState::None);
        classifier.add_terminus_symbol('_');
        assert_eq!(
            classifier.compute_terminus_state("_", "A"),
            PeptideTerminusState::ProteinNTerminus
        );
    }

    #[test]
    fn missed_cleavages() {
        let classifier = PeptideCleavageClassifier::default();
        assert_eq!(classifier.compute_number_of_missed_cleavages("PEPTIDER"), 0);
        assert_eq!(classifier.compute_number_of_missed_cleavages("PEKAPTIDRAER"), 2);
        assert_eq!(classifier.compute_number_of_missed_cleavages("PEKPTIDE"), 0);
        assert_eq!(classifier.compute_number_of_missed_cleavages("PEK*AR"), 1);
        let nonspecific = PeptideCleavageClassifier::new(StandardCleavageAgent::NoEnzyme.rule());
        assert_eq!(nonspecific.compute_number_of_missed_cleavages("PEKAR"), 0);
    }

    #[test]
    fn whole_protein() {
        let classifier = PeptideCleavageClassifier::default();
        let (prefix, suffix) = classifier.locate_in_protein("GLMVPVIR", "GLMVPVIR").unwrap();
        assert_eq!(
            classifier.compute_terminus_state(&prefix, &suffix),
            PeptideTerminusState::ProteinNandCCTerminus
        );
        let (prefix, suffix) = classifier.locate_in_protein("M", "M").unwrap();
        assert_eq!(
            classifier.compute_terminus_state(&prefix, &suffix),
            PeptideTerminusState::ProteinNandCCTerminus
        );
        assert_eq!(classifier.locate_in_protein("WWW", "PEPTIDE"), None);
    }
}
