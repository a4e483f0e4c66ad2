use context_error::*;

use crate::engine::{ExtractedModification, ModKey};
use psmcore::{PsmError, PsmErrorKind, sequence::SequencePosition};

/// Parse an MSPathFinder `Modifications` column: `Oxidation 7,Acetyl 0`. The location is 1
/// based with `0` for the N terminus and `peptide_length + 1` for the C terminus.
/// # Errors
/// If a modification is not a name followed by a location.
pub fn parse_mspathfinder_modifications(
    text: &str,
    peptide_length: usize,
) -> Result<Vec<ExtractedModification>, PsmError> {
    let mut modifications = Vec::new();
    let mut offset = 0;
    for field in text.split(',') {
        let start = offset;
        offset += field.len() + 1;
        let field = field.trim();
        if field.is_empty() {
            continue;
        }
        let parsed = field.rsplit_once(' ').and_then(|(name, location)| {
            location
                .trim()
                .parse::<usize>()
                .ok()
                .map(|location| (name.trim(), location))
        });
        let Some((name, location)) = parsed.filter(|(name, _)| !name.is_empty()) else {
            return Err(BoxedError::new(
                PsmErrorKind::InvalidRow,
                "Invalid MSPathFinder modification",
                "A modification should be written as name followed by the location, eg 'Oxidation 7'",
                Context::line(None, text, start, offset - 1 - start),
            )
            .to_owned());
        };
        let position = match location {
            0 => SequencePosition::NTerm,
            i if i == peptide_length + 1 => SequencePosition::CTerm,
            i => SequencePosition::Index(i - 1),
        };
        modifications.push(ExtractedModification::new(
            ModKey::Name(name.to_string()),
            position,
        ));
    }
    Ok(modifications)
}
