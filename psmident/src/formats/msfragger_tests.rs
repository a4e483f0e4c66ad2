#![allow(clippy::missing_panics_doc)]
use crate::{ModKey, formats::parse_msfragger_modifications};
use psmcore::sequence::SequencePosition;

#[test]
fn msfragger_assigned_modifications() {
    let modifications =
        parse_msfragger_modifications("5M(15.9949), N-term(42.0106), 12C(57.0215), c-term(-0.9840)")
            .unwrap();
    let found: Vec<_> = modifications
        .iter()
        .map(|m| (m.key.clone(), m.position))
        .collect();
    assert_eq!(
        found,
        [
            (ModKey::Mass(15.9949), SequencePosition::Index(4)),
            (ModKey::Mass(42.0106), SequencePosition::NTerm),
            (ModKey::Mass(57.0215), SequencePosition::Index(11)),
            (ModKey::Mass(-0.984), SequencePosition::CTerm),
        ]
    );
}

#[test]
fn msfragger_empty_and_invalid() {
    assert!(parse_msfragger_modifications("").unwrap().is_empty());
    assert!(parse_msfragger_modifications(" , ").unwrap().is_empty());
    assert!(parse_msfragger_modifications("5M").is_err());
    assert!(parse_msfragger_modifications("5M(Oxidation)").is_err());
    assert!(parse_msfragger_modifications("0M(15.9949)").is_err());
    assert!(parse_msfragger_modifications("M(15.9949)").is_err());
}
