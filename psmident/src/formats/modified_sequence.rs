use context_error::*;

use crate::{
    engine::{ExtractedModifications, ModKey},
    helper_functions::end_of_enclosure,
};
use psmcore::{PsmError, PsmErrorKind, sequence::SequencePosition};

/// Parse a modified sequence where the modifications are written in parentheses or square
/// brackets after the residue they modify, or before the first residue for N terminal
/// modifications. Surrounding underscores are ignored. A modification naming a C terminus
/// (`Amidated (Protein C-term)`) placed after the last residue is C terminal.
pub(super) fn parse_modified_sequence(
    text: &str,
    format: &'static str,
) -> Result<ExtractedModifications, PsmError> {
    let mut extracted = ExtractedModifications::default();
    let bytes = text.as_bytes();
    let mut index = 0;
    while index < bytes.len() {
        match bytes[index] {
            b'_' => index += 1,
            open @ (b'(' | b'[') => {
                let close = if open == b'(' { b')' } else { b']' };
                let end = end_of_enclosure(text, index + 1, open, close).ok_or_else(|| {
                    BoxedError::new(
                        PsmErrorKind::InvalidRow,
                        format!("Invalid {format} modified sequence"),
                        "The modification is not closed",
                        Context::line(None, text, index, text.len() - index),
                    )
                    .to_owned()
                })?;
                let content = text[index + 1..end].trim();
                if content.is_empty() {
                    return Err(BoxedError::new(
                        PsmErrorKind::InvalidRow,
                        format!("Invalid {format} modified sequence"),
                        "A modification cannot be empty",
                        Context::line(None, text, index, end + 1 - index),
                    )
                    .to_owned());
                }
                let at_end = text[end + 1..].trim_matches('_').is_empty();
                let position = if at_end
                    && !extracted.clean_sequence.is_empty()
                    && content.to_ascii_lowercase().contains("c-term")
                {
                    SequencePosition::CTerm
                } else {
                    extracted.current_position()
                };
                let key = content
                    .parse::<f64>()
                    .map_or_else(|_| ModKey::Name(content.to_string()), ModKey::Mass);
                extracted.push(key, position);
                index = end + 1;
            }
            b if b.is_ascii_alphabetic() => {
                extracted.push_residue(char::from(b));
                index += 1;
            }
            b if b.is_ascii_whitespace() => index += 1,
            _ => {
                return Err(BoxedError::new(
                    PsmErrorKind::InvalidRow,
                    format!("Invalid {format} modified sequence"),
                    "This character is not valid in a modified sequence",
                    Context::line(None, text, index, 1),
                )
                .to_owned());
            }
        }
    }
    Ok(extracted)
}
