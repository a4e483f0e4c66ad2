use std::io::Write;

use indexmap::IndexMap;
use serde::Serialize;

use crate::SearchResult;

/// The information stored for each unique modified sequence
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SequenceInfo {
    /// The 1 based identifier, in order of first occurrence
    pub unique_seq_id: usize,
    /// The number of modifications, including static ones
    pub mod_count: usize,
    /// The modification description (`tag:location` comma separated)
    pub mod_description: String,
    /// The monoisotopic mass of the modified peptide
    pub monoisotopic_mass: f64,
}

/// Collects the unique modified sequences of a run and writes them as the `SeqInfo` table
#[derive(Clone, Debug, Default)]
pub struct SeqInfoWriter {
    sequences: IndexMap<String, SequenceInfo>,
}

impl SeqInfoWriter {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a result and get the unique sequence ID for its modified sequence. Results with the
    /// same modified sequence share an ID.
    pub fn add(&mut self, result: &SearchResult) -> usize {
        let next_id = self.sequences.len() + 1;
        self.sequences
            .entry(result.peptide_sequence_with_mods().to_string())
            .or_insert_with(|| SequenceInfo {
                unique_seq_id: next_id,
                mod_count: result.modifications().len(),
                mod_description: result.mod_description(),
                monoisotopic_mass: result.monoisotopic_mass(),
            })
            .unique_seq_id
    }

    /// Get the information for a modified sequence
    pub fn get(&self, sequence_with_mods: &str) -> Option<&SequenceInfo> {
        self.sequences.get(sequence_with_mods)
    }

    /// The number of unique sequences
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    /// If no sequences are known
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Write the table
    /// # Errors
    /// If the underlying writer errors.
    pub fn write(&self, mut writer: impl Write) -> Result<(), std::io::Error> {
        writeln!(
            writer,
            "Unique_Seq_ID\tMod_Count\tMod_Description\tMonoisotopic_Mass"
        )?;
        for info in self.sequences.values() {
            writeln!(
                writer,
                "{}\t{}\t{}\t{:.5}",
                info.unique_seq_id, info.mod_count, info.mod_description, info.monoisotopic_mass
            )?;
        }
        writer.flush()
    }
}

#[cfg(test)]
#[expect(clippy::missing_panics_doc)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::test::static_registry;
    use psmcore::sequence::PeptideCleavageClassifier;

    #[test]
    fn unique_ids() {
        let registry = static_registry();
        let classifier = Arc::new(PeptideCleavageClassifier::default());
        let mut seq_info = SeqInfoWriter::new();
        let mut ids = Vec::new();
        for (scan, sequence) in [(1, "ACDK"), (2, "PEPTIDEK"), (3, "ACDK")] {
            let mut result = SearchResult::new(scan, 2, classifier.clone());
            result.set_peptide("K", sequence, "A");
            result.apply_static_modifications(&registry, false);
            result.update_sequence_with_mods();
            result.compute_monoisotopic_mass(registry.calculator());
            ids.push(seq_info.add(&result));
        }
        assert_eq!(ids, vec![1, 2, 1]);
        assert_eq!(seq_info.len(), 2);
        let info = seq_info.get("ACDK").unwrap();
        assert_eq!(info.mod_count, 2);
        assert_eq!(info.mod_description, "TMT6Tag:1,IodoAcet:2");

        let mut output = Vec::new();
        seq_info.write(&mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Unique_Seq_ID\tMod_Count\tMod_Description\tMonoisotopic_Mass");
        assert!(lines[1].starts_with("1\t2\tTMT6Tag:1,IodoAcet:2\t"));
        assert!(lines[2].starts_with("2\t1\tTMT6Tag:1\t"));
    }
}
