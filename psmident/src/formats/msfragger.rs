use context_error::*;

use crate::{
    engine::{ExtractedModification, ModKey},
    helper_functions::{split_with_brackets, str_starts_with},
};
use psmcore::{PsmError, PsmErrorKind, sequence::SequencePosition};

/// Parse an MSFragger `Assigned Modifications` column: `5M(15.9949), N-term(42.0106)`. The
/// location is 1 based, the masses are the full modification masses.
/// ```rust
/// use psmident::{formats::parse_msfragger_modifications, ModKey};
/// use psmcore::sequence::SequencePosition;
/// let modifications = parse_msfragger_modifications("5M(15.9949), N-term(42.0106)").unwrap();
/// assert_eq!(modifications[0].position, SequencePosition::Index(4));
/// assert_eq!(modifications[1].key, ModKey::Mass(42.0106));
/// ```
/// # Errors
/// If any of the modifications does not follow this format.
pub fn parse_msfragger_modifications(text: &str) -> Result<Vec<ExtractedModification>, PsmError> {
    let mut modifications = Vec::new();
    for range in split_with_brackets(text, b',', b'(', b')') {
        let field = text[range.clone()].trim();
        if field.is_empty() {
            continue;
        }
        let base_error = || {
            BoxedError::new(
                PsmErrorKind::InvalidRow,
                "Invalid MSFragger modification",
                "A modification should be written as location followed by the mass in parenthesis, eg '5M(15.9949)' or 'N-term(42.0106)'",
                Context::line(None, text, range.start, range.len()),
            )
            .to_owned()
        };
        let (head, mass) = field
            .strip_suffix(')')
            .and_then(|f| f.split_once('('))
            .ok_or_else(base_error)?;
        let mass = mass.trim().parse::<f64>().map_err(|_| base_error())?;
        let head = head.trim();
        let position = if str_starts_with::<true>(head, "n-term") {
            SequencePosition::NTerm
        } else if str_starts_with::<true>(head, "c-term") {
            SequencePosition::CTerm
        } else {
            let digits = head.chars().take_while(char::is_ascii_digit).count();
            match head[..digits].parse::<usize>() {
                Ok(location) if location > 0 => SequencePosition::Index(location - 1),
                _ => return Err(base_error()),
            }
        };
        modifications.push(ExtractedModification::new(ModKey::Mass(mass), position));
    }
    Ok(modifications)
}
