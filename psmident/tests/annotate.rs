#![allow(clippy::missing_panics_doc)]
//! Annotate PSMs in the notation of each family of search engines and write the output tables
use std::sync::atomic::{AtomicBool, Ordering};

use psmcore::{
    modification::{DeclarationKind, ModificationDeclaration, ModificationRegistry},
    sequence::{PeptideCleavageState, PeptideTerminusState},
};
use psmident::{BatchSummary, prelude::*};

fn build(engine: SearchEngine) -> (SearchResultAnnotator, ModificationRegistry) {
    let mut parameters = SearchEngineParameters::new(engine);
    parameters.modifications.push(ModificationDeclaration::from_formula(
        "C2H3NO",
        "C",
        DeclarationKind::Static,
    ));
    parameters.modifications.push(ModificationDeclaration::from_mass(
        15.994915,
        "M",
        DeclarationKind::Dynamic,
    ));
    parameters.build().unwrap()
}

fn annotate(engine: SearchEngine, row: &RawPsmRow) -> SearchResult {
    let (annotator, mut registry) = build(engine);
    let result = annotator.annotate(row, &mut registry);
    assert!(!result.has_errors(), "{engine}: {:?}", result.errors());
    result
}

#[test]
fn symbol_notation() {
    let result = annotate(SearchEngine::Sequest, &RawPsmRow::new(1, 2, "K.PEPM*CIDEK.A"));
    assert_eq!(result.clean_sequence(), "PEPMCIDEK");
    assert_eq!(result.peptide_sequence_with_mods(), "PEPM*CIDEK");
    assert_eq!(result.mod_description(), "Plus1Oxy:4,IodoAcet:5");
    assert_eq!(result.cleavage_state(), PeptideCleavageState::Full);
}

#[test]
fn numeric_notation() {
    let result = annotate(SearchEngine::MsgfPlus, &RawPsmRow::new(1, 2, "-.M+15.995PEPTIDEK.A"));
    assert_eq!(result.peptide_sequence_with_mods_and_context(), "-.M*PEPTIDEK.A");
    assert_eq!(result.terminus_state(), PeptideTerminusState::ProteinNTerminus);
    assert_eq!(result.mod_description(), "Plus1Oxy:1");
}

#[test]
fn bracket_notation() {
    let result = annotate(
        SearchEngine::TopPic,
        &RawPsmRow::new(1, 2, "K.PEP(M)[15.9949]TIDEK.A"),
    );
    assert_eq!(result.clean_sequence(), "PEPMTIDEK");
    assert_eq!(result.mod_description(), "Plus1Oxy:4");
}

#[test]
fn external_notations() {
    let result = annotate(
        SearchEngine::MsFragger,
        &RawPsmRow::new(1, 2, "PEPMCIDEK").with_modifications("4M(15.9949), 5C(57.0215)"),
    );
    assert_eq!(result.mod_description(), "Plus1Oxy:4,IodoAcet:5");

    let result = annotate(
        SearchEngine::MaxQuant,
        &RawPsmRow::new(1, 2, "PEPMTIDEK").with_modifications("_PEPM(Oxidation (M))TIDEK_"),
    );
    assert_eq!(result.peptide_sequence_with_mods(), "PEPM*TIDEK");

    let result = annotate(
        SearchEngine::DiaNn,
        &RawPsmRow::new(1, 2, "PEPM(UniMod:35)TIDEK"),
    );
    assert_eq!(result.clean_sequence(), "PEPMTIDEK");
    assert_eq!(result.mod_description(), "Plus1Oxy:4");

    let result = annotate(
        SearchEngine::MsPathFinder,
        &RawPsmRow::new(1, 2, "PEPMTIDEK").with_modifications("Oxidation 4"),
    );
    assert_eq!(result.mod_description(), "Plus1Oxy:4");
    let result = annotate(
        SearchEngine::MsPathFinder,
        &RawPsmRow::new(1, 2, "PEPMTIDEK").with_modifications("Amidated 10,Oxidation 4"),
    );
    assert_eq!(result.mod_description(), "Plus1Oxy:4,Amide:9");
}

#[test]
fn batch_with_cancellation() {
    let (annotator, mut registry) = build(SearchEngine::MsgfPlus);
    let rows = [
        RawPsmRow::new(1, 2, "K.PEPM+15.995K.A"),
        RawPsmRow::new(2, 2, "K.ACK.A"),
        RawPsmRow::new(3, 2, "K.PEPK.A"),
    ];
    let cancel = AtomicBool::new(false);
    let (results, summary) = BatchProcessor::new(&annotator)
        .with_cancellation(&cancel)
        .process(
            rows.iter().enumerate().map(|(index, row)| {
                if index == 1 {
                    cancel.store(true, Ordering::Relaxed);
                }
                row
            }),
            &mut registry,
        );
    assert_eq!(results.len(), 1);
    assert_eq!(
        summary,
        BatchSummary {
            rows: 1,
            invalid_rows: 0,
            with_errors: 0,
            cancelled: true
        }
    );
}

#[test]
fn write_tables() {
    let (annotator, mut registry) = build(SearchEngine::MsgfPlus);
    let rows = [
        RawPsmRow::new(1, 2, "K.PEPM+15.995CK.A").with_score("SpecEValue", "1e-10"),
        RawPsmRow::new(2, 3, "K.PEPM+15.995CK.A").with_score("SpecEValue", "1e-8"),
        RawPsmRow::new(3, 2, "R.LCDEK.F").with_score("QValue", "0.01"),
    ];
    let (results, _) = BatchProcessor::new(&annotator).process(&rows, &mut registry);

    let mut synopsis = Vec::new();
    let mut writer = SynopsisWriter::new(&mut synopsis)
        .write_header(score_columns(&results))
        .unwrap();
    writer.write_results(&results).unwrap();
    writer.finish().unwrap();
    let synopsis = String::from_utf8(synopsis).unwrap();
    assert_eq!(synopsis.lines().count(), 4);
    assert!(synopsis.lines().next().unwrap().ends_with("\tSpecEValue\tQValue"));

    let mut seq_info = SeqInfoWriter::new();
    let ids: Vec<_> = results.iter().map(|r| seq_info.add(r)).collect();
    assert_eq!(ids, [1, 1, 2]);

    let mut summary = Vec::new();
    write_mod_summary(&mut summary, &registry.snapshot()).unwrap();
    let summary = String::from_utf8(summary).unwrap();
    let oxidation = summary.lines().find(|l| l.contains("Plus1Oxy")).unwrap();
    assert!(oxidation.ends_with("\t2"));
    let carbamidomethyl = summary.lines().find(|l| l.contains("IodoAcet")).unwrap();
    assert!(carbamidomethyl.ends_with("\t3"));
}
