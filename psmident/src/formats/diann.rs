use crate::{engine::ExtractedModifications, formats::modified_sequence::parse_modified_sequence};
use psmcore::PsmError;

/// Parse a DIA-NN `Modified.Sequence`: `(UniMod:1)AM(UniMod:35)PEP`. Modifications can also be
/// written in square brackets (`AM[UniMod:35]PEP`) as in the newer output versions.
/// # Errors
/// If a modification is not closed or the sequence contains invalid characters.
pub fn parse_diann_modified_sequence(text: &str) -> Result<ExtractedModifications, PsmError> {
    parse_modified_sequence(text, "DIA-NN")
}
