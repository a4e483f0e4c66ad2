use context_error::*;
use ordered_float::OrderedFloat;

use crate::{
    chemistry::{DEUTERIUM_MASS, ELEMENT_PARSE_LIST, Element, ElementKey, ElementalComposition},
    error::{PsmError, PsmErrorKind},
    helper_functions::{end_of_enclosure, explain_number_error, next_signed_integer},
};

/// An isotope prefix as written in a formula: `^13.003355C` or `^13C`
#[derive(Clone, Copy, Debug)]
enum IsotopePrefix {
    Exact(f64),
    Nominal(u16),
}

impl ElementalComposition {
    /// Parse a chemical formula. The following tokens are accepted, whitespace between tokens is ignored:
    /// * `Sym`, `SymN`, `Sym+N`, `Sym-N`, `Sym(N)` with `Sym` an element symbol and `N` a (signed) count.
    /// * `^13.003355C6` an element with an explicit isotope mass, or `^13C6` with the nucleon number.
    /// * `Cx`, `Nx`, `Ox`, `Hx` the heavy isotope shorthands, and `D` for deuterium.
    ///
    /// ```rust
    /// use psmcore::prelude::*;
    /// let composition = ElementalComposition::from_formula("C2H3N-2OS3N+3S-2").unwrap();
    /// assert_eq!(composition, composition!(C 2 H 3 N 1 O 1 S 1));
    /// assert!(ElementalComposition::from_formula("H(-1) N(-1) O").is_ok());
    /// assert!(ElementalComposition::from_formula("Xy2").is_err());
    /// ```
    /// # Errors
    /// If the formula is empty or contains an unknown element, isotope, or a malformed count.
    pub fn from_formula(formula: &str) -> Result<Self, PsmError> {
        Self::from_formula_with_title(formula, "")
    }

    /// Parse a chemical formula, see [`Self::from_formula`]. The title (the name of the
    /// modification this formula belongs to) is reported in any error message.
    /// # Errors
    /// If the formula is empty or contains an unknown element, isotope, or a malformed count.
    pub fn from_formula_with_title(formula: &str, title: &str) -> Result<Self, PsmError> {
        let error = |long: String, start: usize, length: usize| -> PsmError {
            let long = if title.is_empty() {
                long
            } else {
                format!("{long} (in the formula for '{title}')")
            };
            BoxedError::new(
                PsmErrorKind::FormulaParse,
                "Invalid chemical formula",
                long,
                Context::line(None, formula, start, length),
            )
            .to_owned()
        };

        let bytes = formula.as_bytes();
        let mut composition = Self::default();
        let mut index = 0;
        let mut tokens = 0;
        while index < bytes.len() {
            if bytes[index].is_ascii_whitespace() {
                index += 1;
                continue;
            }

            let mut isotope = None;
            if bytes[index] == b'^' {
                let length = bytes[index + 1..]
                    .iter()
                    .take_while(|c| c.is_ascii_digit() || **c == b'.')
                    .count();
                if length == 0 {
                    return Err(error(
                        "An isotope marker '^' should be followed by a mass or nucleon number, eg '^13C' or '^13.003355C'".to_string(),
                        index,
                        1,
                    ));
                }
                let text = &formula[index + 1..index + 1 + length];
                isotope = Some(if text.contains('.') {
                    IsotopePrefix::Exact(text.parse::<f64>().map_err(|_| {
                        error(
                            "The isotope mass is not a valid number".to_string(),
                            index + 1,
                            length,
                        )
                    })?)
                } else {
                    IsotopePrefix::Nominal(text.parse::<u16>().map_err(|_| {
                        error(
                            "The isotope nucleon number is not a valid number".to_string(),
                            index + 1,
                            length,
                        )
                    })?)
                });
                index += 1 + length;
            }

            let element_start = index;
            let mut key = if bytes.get(index) == Some(&b'D')
                && !bytes.get(index + 1).is_some_and(u8::is_ascii_lowercase)
            {
                index += 1;
                ElementKey {
                    element: Element::H,
                    isotope: Some(OrderedFloat(DEUTERIUM_MASS)),
                }
            } else if let Some((symbol, element)) = ELEMENT_PARSE_LIST
                .iter()
                .find(|(symbol, _)| formula[index..].starts_with(symbol))
            {
                index += symbol.len();
                ElementKey::from(*element)
            } else {
                let length = formula[index..]
                    .char_indices()
                    .take_while(|(i, c)| {
                        *i == 0 || c.is_ascii_lowercase()
                    })
                    .map(|(_, c)| c.len_utf8())
                    .sum::<usize>()
                    .max(1);
                return Err(error(
                    format!(
                        "Unknown element '{}'",
                        &formula[index..(index + length).min(formula.len())]
                    ),
                    index,
                    length,
                ));
            };

            if bytes.get(index) == Some(&b'x') {
                let Some(mass) = key.element.heavy_shorthand_mass() else {
                    return Err(error(
                        format!(
                            "The heavy isotope shorthand 'x' is only defined for C, N, O, and H, not for '{}'",
                            key.element
                        ),
                        element_start,
                        index + 1 - element_start,
                    ));
                };
                if isotope.is_some() || key.isotope.is_some() {
                    return Err(error(
                        "An isotope marker cannot be combined with the heavy isotope shorthand 'x'"
                            .to_string(),
                        element_start,
                        index + 1 - element_start,
                    ));
                }
                key.isotope = Some(OrderedFloat(mass));
                index += 1;
            }

            match isotope {
                Some(IsotopePrefix::Exact(mass)) => key.isotope = Some(OrderedFloat(mass)),
                Some(IsotopePrefix::Nominal(nominal)) => {
                    let mass = key.element.isotope_mass(nominal).ok_or_else(|| {
                        error(
                            format!("Unknown isotope {nominal}{}", key.element),
                            element_start,
                            index - element_start,
                        )
                    })?;
                    key.isotope = Some(OrderedFloat(mass));
                }
                None => (),
            }

            let count = if bytes.get(index) == Some(&b'(') {
                let close = end_of_enclosure(formula, index + 1, b'(', b')').ok_or_else(|| {
                    error(
                        "The element count was opened with '(' but never closed".to_string(),
                        index,
                        1,
                    )
                })?;
                let count = formula[index + 1..close].trim().parse::<i32>().map_err(|err| {
                    error(
                        format!("The element count {}", explain_number_error(&err)),
                        index + 1,
                        close - index - 1,
                    )
                })?;
                index = close + 1;
                count
            } else if let Some((length, count)) = next_signed_integer(formula, index) {
                let count = count.map_err(|err| {
                    error(
                        format!("The element count {}", explain_number_error(&err)),
                        index,
                        length,
                    )
                })?;
                index += length;
                count
            } else if matches!(bytes.get(index), Some(b'+' | b'-')) {
                return Err(error(
                    "A sign should be followed by the element count".to_string(),
                    index,
                    1,
                ));
            } else {
                1
            };

            if composition.checked_add_atoms(key, count).is_none() {
                return Err(error(
                    format!("The total count for '{}' is too big to fit in the internal representation", key.element),
                    element_start,
                    index - element_start,
                ));
            }
            tokens += 1;
        }

        if tokens == 0 {
            return Err(BoxedError::new(
                PsmErrorKind::FormulaParse,
                "Invalid chemical formula",
                if title.is_empty() {
                    "A chemical formula cannot be empty".to_string()
                } else {
                    format!("The chemical formula for '{title}' is empty")
                },
                Context::none(),
            ));
        }
        Ok(composition)
    }
}

/// Compute the monoisotopic mass of a chemical formula, see [`ElementalComposition::from_formula`] for the accepted syntax.
/// # Errors
/// If the formula could not be parsed.
pub fn compute_formula_mass(formula: &str) -> Result<f64, PsmError> {
    ElementalComposition::from_formula(formula).map(|c| c.monoisotopic_mass())
}

/// Compute the monoisotopic mass of a chemical formula, reporting the given title in any error.
/// # Errors
/// If the formula could not be parsed.
pub fn compute_formula_mass_with_title(formula: &str, title: &str) -> Result<f64, PsmError> {
    ElementalComposition::from_formula_with_title(formula, title).map(|c| c.monoisotopic_mass())
}

#[cfg(test)]
#[expect(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[test]
    fn formula_masses() {
        assert!((compute_formula_mass("C2H3N4OS").unwrap() - 131.0027).abs() < 1e-4);
        assert!((compute_formula_mass("C2H3N-2OS3N+3S-2").unwrap() - 88.99353).abs() < 1e-4);
        assert!((compute_formula_mass("H2O").unwrap() - 18.010_565).abs() < 1e-6);
        assert!((compute_formula_mass("H(-2) O(-1)").unwrap() + 18.010_565).abs() < 1e-6);
        assert!((compute_formula_mass("HPO3").unwrap() - 79.966_331).abs() < 1e-5);
        assert!((compute_formula_mass("C 2 H 2 O").unwrap() - 42.010_565).abs() < 1e-6);
    }

    #[test]
    fn isotopes() {
        let label = compute_formula_mass("C(-6) Cx(6)").unwrap();
        assert!((label - 6.020_13).abs() < 1e-4);
        let label = compute_formula_mass("C-6^13C6").unwrap();
        assert!((label - 6.020_129).abs() < 1e-5);
        let label = compute_formula_mass("C-6 ^13.003355C6 N-2 ^15N2").unwrap();
        assert!((label - 8.014_199).abs() < 1e-4);
        let dimethyl = compute_formula_mass("H(-2) Hx(6) C(2)").unwrap();
        assert!((dimethyl - 34.063_117).abs() < 1e-4);
        assert_eq!(
            ElementalComposition::from_formula("D2").unwrap(),
            ElementalComposition::from_formula("Hx2").unwrap()
        );
    }

    #[test]
    fn cancelling_formula_is_zero() {
        let composition = ElementalComposition::from_formula("H2O H-2 O-1").unwrap();
        assert!(composition.is_empty());
        assert!(composition.monoisotopic_mass().abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_formulas() {
        assert!(compute_formula_mass("").is_err());
        assert!(compute_formula_mass("   ").is_err());
        assert!(compute_formula_mass("Xy2").is_err());
        assert!(compute_formula_mass("C2H3N+").is_err());
        assert!(compute_formula_mass("C(2").is_err());
        assert!(compute_formula_mass("^C2").is_err());
        assert!(compute_formula_mass("^99C").is_err());
        assert!(compute_formula_mass("Sx").is_err());
        assert!(compute_formula_mass("c2").is_err());
        let error = compute_formula_mass_with_title("C2Qq", "MyMod").unwrap_err();
        assert!(error.to_string().contains("MyMod"));
        assert!(matches!(error.get_kind(), PsmErrorKind::FormulaParse));
    }

    #[test]
    fn overflowing_counts() {
        let error = compute_formula_mass("C2147483647C1").unwrap_err();
        assert!(matches!(error.get_kind(), PsmErrorKind::FormulaParse));
        assert!(compute_formula_mass("H-2147483647 H(-2)").is_err());
        assert!(compute_formula_mass("C2147483648").is_err());
        assert!((compute_formula_mass("C2147483647 C-2147483647 H2O").unwrap() - 18.010_565).abs() < 1e-6);
    }
}
