/// A peptide sequence split in the flanking residues and the primary sequence, as written in
/// the `K.PEPTIDE.R` convention. The primary sequence can still contain modification notation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SplitSequence<'a> {
    /// The residue(s) preceding the peptide, empty if unknown
    pub prefix: &'a str,
    /// The peptide itself
    pub primary: &'a str,
    /// The residue(s) following the peptide, empty if unknown
    pub suffix: &'a str,
}

/// Find all `.` that separate flanking residues, skipping decimal points in modification masses
fn delimiters(text: &str) -> Vec<usize> {
    let bytes = text.as_bytes();
    bytes
        .iter()
        .enumerate()
        .filter(|(index, byte)| {
            **byte == b'.'
                && !(bytes.get(index + 1).is_some_and(u8::is_ascii_digit)
                    && index.checked_sub(1).and_then(|i| bytes.get(i)).is_some_and(|b| {
                        b.is_ascii_digit() || *b == b'+' || *b == b'-'
                    }))
        })
        .map(|(index, _)| index)
        .collect()
}

/// Split a sequence with context (`K.PEPTIDE.R`) into the prefix, primary sequence and suffix.
/// * Without delimiters the whole text is the primary sequence.
/// * Doubled delimiters (`..PEPTIDE..`) denote missing flanking residue information.
/// * Decimal points in modification masses (`K.M+15.995PEPTIDE.R`) are not delimiters.
/// * A single delimiter, or a single doubled delimiter, is only used if it is in the first or
///   last two characters. When it could be either it separates the prefix.
/// * The text is not trimmed, so the parts joined with their delimiters give back the input.
///
/// ```rust
/// use psmcore::prelude::*;
/// let split = split_prefix_and_suffix("-.GLMVPVIR.A");
/// assert_eq!((split.prefix, split.primary, split.suffix), ("-", "GLMVPVIR", "A"));
/// let split = split_prefix_and_suffix("K.M+15.995PEPTIDE.R");
/// assert_eq!(split.primary, "M+15.995PEPTIDE");
/// ```
pub fn split_prefix_and_suffix(text: &str) -> SplitSequence<'_> {
    let delimiters = delimiters(text);
    match delimiters.as_slice() {
        [] => SplitSequence {
            primary: text,
            ..SplitSequence::default()
        },
        [single] => split_once(text, *single, *single),
        [first, second] if *second == first + 1 => split_once(text, *first, *second),
        [first, .., last] => {
            let doubled_start = delimiters.contains(&(first + 1));
            let doubled_end = delimiters.contains(&(last - 1));
            let start = if doubled_start { first + 2 } else { first + 1 };
            let end = if doubled_end { last - 1 } else { *last };
            SplitSequence {
                prefix: &text[..*first],
                primary: if start <= end { &text[start..end] } else { "" },
                suffix: &text[last + 1..],
            }
        }
    }
}

/// Split on one boundary, spanning the delimiter(s) from `first` up to and including `last`
fn split_once(text: &str, first: usize, last: usize) -> SplitSequence<'_> {
    if first <= 1 {
        SplitSequence {
            prefix: &text[..first],
            primary: &text[last + 1..],
            suffix: "",
        }
    } else if last + 2 >= text.len() {
        SplitSequence {
            prefix: "",
            primary: &text[..first],
            suffix: &text[last + 1..],
        }
    } else {
        SplitSequence {
            primary: text,
            ..SplitSequence::default()
        }
    }
}
