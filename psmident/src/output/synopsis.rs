use std::{
    borrow::{Borrow, Cow},
    io::Write,
    marker::PhantomData,
};

use indexmap::IndexSet;
use itertools::Itertools;

use crate::{SearchResult, TextNumber};
use psmcore::sequence::MASS_PROTON;

/// The fixed columns of a synopsis file, the score columns follow these
pub const SYNOPSIS_COLUMNS: &[&str] = &[
    "ResultID",
    "Scan",
    "Charge",
    "Peptide",
    "Protein",
    "MH",
    "DelM",
    "DelM_PPM",
    "MonoisotopicMass",
    "CleavageState",
    "TerminusState",
    "MissedCleavages",
    "ModDescription",
];

/// Write annotated PSMs as a tab separated synopsis file. The header has to be written before
/// any results, which is enforced by the state parameter.
#[derive(Debug)]
pub struct SynopsisWriter<Writer, State> {
    writer: Writer,
    score_columns: Vec<String>,
    next_id: usize,
    state: PhantomData<State>,
}

/// The synopsis file has been started but nothing has been written yet.
#[allow(missing_debug_implementations, missing_copy_implementations)] // Marker ZST
pub struct Initial;
/// The synopsis file has already been written with a header.
#[allow(missing_debug_implementations, missing_copy_implementations)] // Marker ZST
pub struct HeaderWritten;

impl<W: Write> SynopsisWriter<W, Initial> {
    /// Start a new synopsis file
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            score_columns: Vec::new(),
            next_id: 1,
            state: PhantomData,
        }
    }

    /// Write the header line, the score columns are written in the given order after the fixed columns.
    /// # Errors
    /// If the underlying writer errors.
    pub fn write_header(
        mut self,
        score_columns: Vec<String>,
    ) -> Result<SynopsisWriter<W, HeaderWritten>, std::io::Error> {
        writeln!(
            self.writer,
            "{}",
            SYNOPSIS_COLUMNS
                .iter()
                .copied()
                .chain(score_columns.iter().map(String::as_str))
                .map(clean_field)
                .join("\t")
        )?;
        Ok(SynopsisWriter {
            writer: self.writer,
            score_columns,
            next_id: self.next_id,
            state: PhantomData,
        })
    }
}

impl<W: Write> SynopsisWriter<W, HeaderWritten> {
    /// Write a single result, results are numbered in the order they are written.
    /// # Errors
    /// If the underlying writer errors.
    pub fn write_result(&mut self, result: &SearchResult) -> Result<usize, std::io::Error> {
        let id = self.next_id;
        self.next_id += 1;
        let mass = result.monoisotopic_mass();
        let mh = if mass > 0.0 { mass + MASS_PROTON } else { 0.0 };
        write!(
            self.writer,
            "{id}\t{}\t{}\t{}\t{}\t{mh:.5}\t{}\t{}\t{mass:.5}\t{}\t{}\t{}\t{}",
            result.scan,
            result.charge,
            clean_field(&result.peptide_sequence_with_mods_and_context()),
            clean_field(&result.proteins.iter().join(";")),
            result.delta_mass().map_or_else(String::new, |d| format!("{d:.5}")),
            result.delta_mass_ppm().map_or_else(String::new, |p| format!("{p:.4}")),
            result.cleavage_state(),
            result.terminus_state(),
            result.number_of_missed_cleavages(),
            result.mod_description(),
        )?;
        for column in &self.score_columns {
            write!(
                self.writer,
                "\t{}",
                result
                    .scores
                    .get(column)
                    .map_or("", TextNumber::text)
            )?;
        }
        writeln!(self.writer)?;
        Ok(id)
    }

    /// Write all results in order
    /// # Errors
    /// If the underlying writer errors.
    pub fn write_results<R: Borrow<SearchResult>>(
        &mut self,
        results: impl IntoIterator<Item = R>,
    ) -> Result<(), std::io::Error> {
        for result in results {
            self.write_result(result.borrow())?;
        }
        Ok(())
    }

    /// Flush and return the underlying writer
    /// # Errors
    /// If the underlying writer could not be flushed.
    pub fn finish(mut self) -> Result<W, std::io::Error> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Get all score names in the order they were first seen
pub fn score_columns<R: Borrow<SearchResult>>(results: impl IntoIterator<Item = R>) -> Vec<String> {
    let mut columns = IndexSet::new();
    for result in results {
        for name in result.borrow().scores.keys() {
            if !columns.contains(name) {
                columns.insert(name.clone());
            }
        }
    }
    columns.into_iter().collect()
}

fn clean_field(text: &str) -> Cow<'_, str> {
    if text.contains(['\t', '\n', '\r']) {
        Cow::Owned(text.replace(['\t', '\n', '\r'], " "))
    } else {
        Cow::Borrowed(text)
    }
}
