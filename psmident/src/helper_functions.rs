use std::ops::Range;

/// Find the enclosed text by the given symbols, assumes a single open is already read just before the start, guarantees to only pick full characters
pub(crate) fn end_of_enclosure(text: &str, start: usize, open: u8, close: u8) -> Option<usize> {
    let mut state = 1;
    for (i, ch) in text.as_bytes()[start..].iter().enumerate() {
        // Check if this byte is a full character (is_char_boundary also works on index==len)
        if text.is_char_boundary(start + i) && text.is_char_boundary(start + i + 1) {
            if *ch == open {
                state += 1;
            } else if *ch == close {
                state -= 1;
                if state == 0 {
                    return Some(start + i);
                }
            }
        }
    }
    None
}

/// Split the given text based on the separator.
/// This also takes brackets into account and these take precedence over the separator searched for.
pub(crate) fn split_with_brackets(text: &str, separator: u8, open: u8, close: u8) -> Vec<Range<usize>> {
    let mut state: usize = 0;
    let mut last_field = 0;
    let mut fields = Vec::new();
    for (index, ch) in text.bytes().enumerate() {
        if !text.is_char_boundary(index) {
            continue;
        }
        if ch == open {
            state += 1;
        } else if ch == close {
            state = state.saturating_sub(1);
        } else if ch == separator && state == 0 {
            fields.push(last_field..index);
            last_field = index + 1;
        }
    }
    fields.push(last_field..text.len());
    fields
}

/// Get the next signed decimal number (`+15.995`, `-18`, `42.01`), returns the length in bytes and the number.
/// Exponents are not accepted, so that consecutive numbers (`+15.995-18.011`) are split correctly.
pub(crate) fn next_signed_decimal<const REQUIRE_SIGN: bool>(
    text: &str,
    start: usize,
) -> Option<(usize, f64)> {
    let bytes = text.as_bytes();
    let mut index = start;
    if matches!(bytes.get(index), Some(b'+' | b'-')) {
        index += 1;
    } else if REQUIRE_SIGN {
        return None;
    }
    let digits_start = index;
    let mut seen_dot = false;
    while let Some(b) = bytes.get(index) {
        if b.is_ascii_digit() {
            index += 1;
        } else if *b == b'.' && !seen_dot {
            seen_dot = true;
            index += 1;
        } else {
            break;
        }
    }
    if !bytes[digits_start..index].iter().any(u8::is_ascii_digit) {
        return None;
    }
    text[start..index]
        .parse::<f64>()
        .ok()
        .map(|value| (index - start, value))
}

/// Check if 'a' starts with 'b' with or without ignoring casing
pub(crate) fn str_starts_with<const IGNORE_CASING: bool>(a: &str, b: &str) -> bool {
    if a.len() >= b.len() {
        for (a, b) in a.chars().zip(b.chars()) {
            if IGNORE_CASING && !a.eq_ignore_ascii_case(&b) || !IGNORE_CASING && a != b {
                return false;
            }
        }
        true
    } else {
        false
    }
}

#[cfg(test)]
#[expect(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[test]
    fn signed_decimals() {
        assert_eq!(next_signed_decimal::<true>("+15.995-18.011", 0), Some((7, 15.995)));
        assert_eq!(next_signed_decimal::<true>("+15.995-18.011", 7), Some((7, -18.011)));
        assert_eq!(next_signed_decimal::<true>("15.995", 0), None);
        assert_eq!(next_signed_decimal::<false>("15.995]", 0), Some((6, 15.995)));
        assert_eq!(next_signed_decimal::<false>("+.", 0), None);
        assert_eq!(next_signed_decimal::<false>("Acetyl", 0), None);
    }

    #[test]
    fn brackets() {
        let text = "5M(15.9949), N-term(42.0106)";
        let fields: Vec<&str> = split_with_brackets(text, b',', b'(', b')')
            .into_iter()
            .map(|r| &text[r])
            .collect();
        assert_eq!(fields, ["5M(15.9949)", " N-term(42.0106)"]);
        let text = "_(Acetyl (Protein N-term))AM";
        assert_eq!(end_of_enclosure(text, 2, b'(', b')'), Some(25));
    }

    #[test]
    fn starts_with() {
        assert!(str_starts_with::<true>("N-term(42.0106)", "n-TERM"));
        assert!(!str_starts_with::<false>("N-term", "n-term"));
        assert!(!str_starts_with::<true>("N-", "N-term"));
    }
}
