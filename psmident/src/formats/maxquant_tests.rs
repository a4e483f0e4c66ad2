#![allow(clippy::missing_panics_doc)]
use crate::{ModKey, formats::parse_maxquant_modified_sequence};
use psmcore::sequence::SequencePosition;

#[test]
fn maxquant_full_names() {
    let extracted =
        parse_maxquant_modified_sequence("_(Acetyl (Protein N-term))AM(Oxidation (M))PEP_").unwrap();
    assert_eq!(extracted.clean_sequence, "AMPEP");
    assert_eq!(extracted.modifications.len(), 2);
    assert_eq!(
        extracted.modifications[0].key,
        ModKey::Name("Acetyl (Protein N-term)".to_string())
    );
    assert_eq!(extracted.modifications[0].position, SequencePosition::NTerm);
    assert_eq!(
        extracted.modifications[1].key,
        ModKey::Name("Oxidation (M)".to_string())
    );
    assert_eq!(extracted.modifications[1].position, SequencePosition::Index(1));
}

#[test]
fn maxquant_abbreviations() {
    let extracted = parse_maxquant_modified_sequence("_(ac)AM(ox)PEPS(ph)K_").unwrap();
    assert_eq!(extracted.clean_sequence, "AMPEPSK");
    let positions: Vec<_> = extracted.modifications.iter().map(|m| m.position).collect();
    assert_eq!(
        positions,
        [
            SequencePosition::NTerm,
            SequencePosition::Index(1),
            SequencePosition::Index(5)
        ]
    );
}

#[test]
fn maxquant_c_terminal() {
    let extracted = parse_maxquant_modified_sequence("_PEPTIDEK(Amidated (Protein C-term))_").unwrap();
    assert_eq!(extracted.modifications[0].position, SequencePosition::CTerm);
    let extracted = parse_maxquant_modified_sequence("_PEPTIDEK(GlyGly (K))_").unwrap();
    assert_eq!(extracted.modifications[0].position, SequencePosition::Index(7));
}

#[test]
fn maxquant_plain_and_invalid() {
    let extracted = parse_maxquant_modified_sequence("_PEPTIDE_").unwrap();
    assert_eq!(extracted.clean_sequence, "PEPTIDE");
    assert!(extracted.modifications.is_empty());
    assert!(parse_maxquant_modified_sequence("_PEPM(Oxidation (M)_").is_err());
    assert!(parse_maxquant_modified_sequence("_PEPM()TIDE_").is_err());
    assert!(parse_maxquant_modified_sequence("_PEP#TIDE_").is_err());
}
