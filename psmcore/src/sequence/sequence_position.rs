use serde::{Deserialize, Serialize};

/// A position on a peptide as reported by a search engine
#[derive(Copy, Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum SequencePosition {
    /// N-terminal
    NTerm,
    /// An amino acid at the given index (0 based)
    Index(usize),
    /// C-terminal
    CTerm,
}

impl Default for SequencePosition {
    fn default() -> Self {
        Self::Index(0)
    }
}

impl std::fmt::Display for SequencePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NTerm => write!(f, "N-terminal"),
            Self::Index(index) => write!(f, "{index}"),
            Self::CTerm => write!(f, "C-terminal"),
        }
    }
}

impl SequencePosition {
    /// The 1 based residue location of this position in a peptide of the given length.
    /// Terminal modifications are located on the first or last residue.
    pub const fn residue_location(self, peptide_length: usize) -> usize {
        match self {
            Self::NTerm => 1,
            Self::Index(i) => i + 1,
            Self::CTerm => peptide_length,
        }
    }

    /// Convert a 1 based location as used by engines that count the N terminus as `0` into a position.
    /// * `0` is N term
    /// * `1..=peptide_length` is in the sequence
    /// * `peptide_length + 1` is C term
    ///
    /// Anything outside of this range returns `None`.
    pub const fn from_location(location: usize, peptide_length: usize) -> Option<Self> {
        match location {
            0 => Some(Self::NTerm),
            c if c == peptide_length + 1 => Some(Self::CTerm),
            i if i <= peptide_length => Some(Self::Index(i - 1)),
            _ => None,
        }
    }
}

#[cfg(test)]
#[expect(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[test]
    fn locations() {
        assert_eq!(SequencePosition::from_location(0, 5), Some(SequencePosition::NTerm));
        assert_eq!(SequencePosition::from_location(3, 5), Some(SequencePosition::Index(2)));
        assert_eq!(SequencePosition::from_location(6, 5), Some(SequencePosition::CTerm));
        assert_eq!(SequencePosition::from_location(7, 5), None);
        assert_eq!(SequencePosition::NTerm.residue_location(5), 1);
        assert_eq!(SequencePosition::Index(2).residue_location(5), 3);
        assert_eq!(SequencePosition::CTerm.residue_location(5), 5);
    }
}
