use std::num::{IntErrorKind, ParseIntError};

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

/// Get the next integer with an optional sign, returns the length in bytes and the number.
pub(crate) fn next_signed_integer(
    text: &str,
    start: usize,
) -> Option<(usize, Result<i32, ParseIntError>)> {
    let bytes = text.as_bytes();
    let sign = usize::from(matches!(bytes.get(start), Some(b'+' | b'-')));
    let len = bytes[(start + sign).min(bytes.len())..]
        .iter()
        .take_while(|c| c.is_ascii_digit())
        .count();
    (len > 0).then(|| (sign + len, text[start..start + sign + len].parse::<i32>()))
}

/// To be used as `The xx number ` + the explanation from here (does not have a dot).
pub(crate) const fn explain_number_error(error: &ParseIntError) -> &'static str {
    match error.kind() {
        IntErrorKind::Empty => "is empty",
        IntErrorKind::InvalidDigit => "contains an invalid character",
        IntErrorKind::NegOverflow => "is too small to fit in the internal representation",
        IntErrorKind::PosOverflow => "is too big to fit in the internal representation",
        IntErrorKind::Zero => "is zero, which is not allowed here",
        _ => "is not a valid number",
    }
}

/// Implement a binary operator for all ref cases after the implementation for the ref-ref case (assumes deref operator works)
macro_rules! impl_binop_ref_cases {
    (impl $imp:ident, $method:ident for $t:ty, $u:ty, $o:ty) => {
        impl $imp<$u> for &'_ $t {
            type Output = $o;

            #[inline]
            fn $method(self, other: $u) -> $o {
                $imp::$method(self, &other)
            }
        }

        impl<'a> $imp<&'a $u> for $t {
            type Output = $o;

            #[inline]
            fn $method(self, other: &'a $u) -> $o {
                $imp::$method(&self, other)
            }
        }

        impl $imp<$u> for $t {
            type Output = $o;

            #[inline]
            fn $method(self, other: $u) -> $o {
                $imp::$method(&self, &other)
            }
        }
    };
}

#[cfg(test)]
#[expect(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[test]
    fn signed_integers() {
        assert_eq!(next_signed_integer("-2S", 0).map(|(l, n)| (l, n.ok())), Some((2, Some(-2))));
        assert_eq!(next_signed_integer("N+3", 1).map(|(l, n)| (l, n.ok())), Some((2, Some(3))));
        assert_eq!(next_signed_integer("C", 0).map(|(l, _)| l), None);
        assert!(next_signed_integer("99999999999", 0).is_some_and(|(_, n)| n.is_err()));
    }
}
