use std::{
    collections::BTreeMap,
    ops::{Add, AddAssign, Mul, Neg, Sub},
};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::chemistry::Element;

/// An element with an optional explicit isotope mass. Without an isotope the monoisotopic
/// mass of the element is used.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct ElementKey {
    /// The element
    pub element: Element,
    /// The exact mass of the isotope, if this is not the most abundant isotope
    pub isotope: Option<OrderedFloat<f64>>,
}

impl ElementKey {
    /// The mass of a single atom of this element/isotope
    pub fn mass(self) -> f64 {
        self.isotope
            .map_or_else(|| self.element.monoisotopic_mass(), |i| i.0)
    }
}

impl From<Element> for ElementKey {
    fn from(element: Element) -> Self {
        Self {
            element,
            isotope: None,
        }
    }
}

/// An elemental composition: a signed count of atoms per element/isotope.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct ElementalComposition {
    elements: BTreeMap<ElementKey, i32>,
}

/// Quickly define an elemental composition.
/// ```rust
/// use psmcore::prelude::*;
/// let glycine = composition!(C 2 H 3 N 1 O 1);
/// assert!((glycine.monoisotopic_mass() - 57.021_464).abs() < 1e-5);
/// ```
#[macro_export]
macro_rules! composition {
    ($($element:ident $count:literal)*) => {
        $crate::chemistry::ElementalComposition::from_counts(&[$(($crate::chemistry::Element::$element, $count)),*])
    };
}

impl ElementalComposition {
    /// Create a composition from the given element counts
    pub fn from_counts(counts: &[(Element, i32)]) -> Self {
        let mut composition = Self::default();
        for (element, count) in counts {
            composition.add_atoms(ElementKey::from(*element), *count);
        }
        composition
    }

    /// Add the given number of atoms, entries that reach zero are removed. The count saturates
    /// at the bounds of `i32`, use [`Self::checked_add_atoms`] to detect overflow.
    pub fn add_atoms(&mut self, key: ElementKey, count: i32) {
        if self.checked_add_atoms(key, count).is_none() {
            let saturated = if count < 0 { i32::MIN } else { i32::MAX };
            self.elements.insert(key, saturated);
        }
    }

    /// Add the given number of atoms, entries that reach zero are removed. Returns `None`
    /// and leaves the composition unchanged if the count for this element would overflow.
    #[must_use]
    pub fn checked_add_atoms(&mut self, key: ElementKey, count: i32) -> Option<()> {
        if count == 0 {
            return Some(());
        }
        let total = self
            .elements
            .get(&key)
            .copied()
            .unwrap_or_default()
            .checked_add(count)?;
        if total == 0 {
            self.elements.remove(&key);
        } else {
            self.elements.insert(key, total);
        }
        Some(())
    }

    /// Multiply all counts by the given factor, `None` if any count would overflow
    #[must_use]
    pub fn checked_mul(&self, factor: i32) -> Option<Self> {
        let mut result = Self::default();
        for (key, count) in &self.elements {
            result.checked_add_atoms(*key, count.checked_mul(factor)?)?;
        }
        Some(result)
    }

    /// The total number of atoms of this element, summed over all isotopes
    pub fn count(&self, element: Element) -> i32 {
        self.elements
            .iter()
            .filter(|(k, _)| k.element == element)
            .map(|(_, c)| *c)
            .sum()
    }

    /// Check if there are no atoms left in this composition
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterate over all element/isotope counts
    pub fn iter(&self) -> impl Iterator<Item = (&ElementKey, &i32)> {
        self.elements.iter()
    }

    /// The monoisotopic mass of this composition
    pub fn monoisotopic_mass(&self) -> f64 {
        self.elements
            .iter()
            .map(|(key, count)| key.mass() * f64::from(*count))
            .sum()
    }

    /// Show this composition as a formula that can be parsed again, with explicit isotopes as `^mass`
    pub fn hill_notation(&self) -> String {
        let mut output = String::new();
        for (key, count) in &self.elements {
            if let Some(isotope) = key.isotope {
                output.push('^');
                output.push_str(&isotope.0.to_string());
            }
            output.push_str(key.element.symbol());
            if *count != 1 {
                output.push_str(&count.to_string());
            }
        }
        output
    }
}

impl<'a> IntoIterator for &'a ElementalComposition {
    type Item = (&'a ElementKey, &'a i32);
    type IntoIter = std::collections::btree_map::Iter<'a, ElementKey, i32>;
    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl Add<&ElementalComposition> for &ElementalComposition {
    type Output = ElementalComposition;
    fn add(self, rhs: &ElementalComposition) -> Self::Output {
        let mut result = self.clone();
        result += rhs;
        result
    }
}

impl Sub<&ElementalComposition> for &ElementalComposition {
    type Output = ElementalComposition;
    fn sub(self, rhs: &ElementalComposition) -> Self::Output {
        let mut result = self.clone();
        for (key, count) in &rhs.elements {
            result.add_atoms(*key, count.saturating_neg());
        }
        result
    }
}

impl Mul<&i32> for &ElementalComposition {
    type Output = ElementalComposition;
    fn mul(self, rhs: &i32) -> Self::Output {
        self.checked_mul(*rhs).unwrap_or_else(|| {
            let mut result = ElementalComposition::default();
            for (key, count) in &self.elements {
                result.add_atoms(*key, count.saturating_mul(*rhs));
            }
            result
        })
    }
}

impl Neg for ElementalComposition {
    type Output = Self;
    fn neg(self) -> Self::Output {
        &self * -1
    }
}

impl AddAssign<&Self> for ElementalComposition {
    fn add_assign(&mut self, rhs: &Self) {
        for (key, count) in &rhs.elements {
            self.add_atoms(*key, *count);
        }
    }
}

impl AddAssign for ElementalComposition {
    fn add_assign(&mut self, rhs: Self) {
        *self += &rhs;
    }
}

impl_binop_ref_cases!(impl Add, add for ElementalComposition, ElementalComposition, ElementalComposition);
impl_binop_ref_cases!(impl Sub, sub for ElementalComposition, ElementalComposition, ElementalComposition);
impl_binop_ref_cases!(impl Mul, mul for ElementalComposition, i32, ElementalComposition);

#[cfg(test)]
#[expect(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic() {
        let water = composition!(H 2 O 1);
        let ammonia = composition!(N 1 H 3);
        let sum = &water + &ammonia;
        assert_eq!(sum.count(Element::H), 5);
        let back = sum - ammonia;
        assert_eq!(back, water);
        assert!((water.monoisotopic_mass() - 18.010_565).abs() < 1e-6);
        assert_eq!((&water * 3).count(Element::O), 3);
        assert_eq!((-water.clone()).count(Element::H), -2);
        assert!((&water - &water).is_empty());
    }

    #[test]
    fn isotopes_are_counted_per_element() {
        let mut composition = composition!(C 6);
        composition.add_atoms(
            ElementKey {
                element: Element::C,
                isotope: Some(OrderedFloat(13.003_355)),
            },
            2,
        );
        assert_eq!(composition.count(Element::C), 8);
        assert!((composition.monoisotopic_mass() - (72.0 + 26.006_71)).abs() < 1e-6);
        assert_eq!(composition.hill_notation(), "C6^13.003355C2");
    }

    #[test]
    fn owned_operators() {
        let water = composition!(H 2 O 1);
        let peroxide = composition!(H 2 O 2);
        let oxygen = peroxide.clone() - water.clone();
        assert_eq!(oxygen, composition!(O 1));
        let doubled = water.clone() * 2;
        assert_eq!(doubled.count(Element::H), 4);
        assert_eq!(doubled - &water, water);
        let mut total = water.clone();
        total += oxygen;
        assert_eq!(total, peroxide);
    }

    #[test]
    fn overflowing_counts() {
        let carbon = ElementKey::from(Element::C);
        let mut composition = ElementalComposition::default();
        assert!(composition.checked_add_atoms(carbon, i32::MAX).is_some());
        assert!(composition.checked_add_atoms(carbon, 1).is_none());
        assert_eq!(composition.count(Element::C), i32::MAX);
        assert!(composition.checked_mul(2).is_none());
        assert_eq!((&composition * 2).count(Element::C), i32::MAX);
        assert_eq!((-composition).count(Element::C), -i32::MAX);
    }
}
