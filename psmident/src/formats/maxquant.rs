use crate::{engine::ExtractedModifications, formats::modified_sequence::parse_modified_sequence};
use psmcore::PsmError;

/// Parse a MaxQuant `Modified sequence`: `_(Acetyl (Protein N-term))AM(Oxidation (M))PEP_`.
/// Both the full names and the abbreviated form (`_(ac)AM(ox)PEP_`) are accepted, the names
/// are kept with their specificity and resolved by the modification registry.
/// # Errors
/// If a modification is not closed or the sequence contains invalid characters.
pub fn parse_maxquant_modified_sequence(text: &str) -> Result<ExtractedModifications, PsmError> {
    parse_modified_sequence(text, "MaxQuant")
}
