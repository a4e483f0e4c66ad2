use std::io::Read;

use context_error::*;
use csv::{ReaderBuilder, StringRecord};
use itertools::Itertools;

use psmcore::{PsmError, PsmErrorKind};
use psmident::{RawPsmRow, TextNumber};

/// The columns with a fixed meaning, all other columns are engine scores
#[derive(Clone, Copy, Debug, Default)]
struct Columns {
    scan: usize,
    charge: usize,
    peptide: usize,
    protein: Option<usize>,
    precursor_mz: Option<usize>,
    mass_error: Option<usize>,
    modifications: Option<usize>,
}

impl Columns {
    fn from_header(header: &StringRecord) -> Result<Self, PsmError> {
        let find = |name: &str| {
            header
                .iter()
                .position(|column| column.trim().eq_ignore_ascii_case(name))
        };
        let required = |name: &str| {
            find(name).ok_or_else(|| {
                BoxedError::new(
                    PsmErrorKind::InvalidRow,
                    "Missing column",
                    format!("The PSM table does not have the required column '{name}'"),
                    Context::show(header.iter().join("\t")),
                )
            })
        };
        Ok(Self {
            scan: required("Scan")?,
            charge: required("Charge")?,
            peptide: required("Peptide")?,
            protein: find("Protein"),
            precursor_mz: find("PrecursorMZ"),
            mass_error: find("DelM"),
            modifications: find("Modifications"),
        })
    }

    fn is_fixed(&self, index: usize) -> bool {
        [self.scan, self.charge, self.peptide].contains(&index)
            || [
                self.protein,
                self.precursor_mz,
                self.mass_error,
                self.modifications,
            ]
            .contains(&Some(index))
    }
}

/// Read a tab separated PSM table with a header line. The columns `Scan`, `Charge`, and
/// `Peptide` are required, `Protein` (multiple proteins separated by `;`), `PrecursorMZ`, `DelM`,
/// and `Modifications` are optional, all other columns are kept as scores.
///
/// An unreadable header is an error for the whole table, unreadable rows are returned as errors
/// in between the valid rows.
/// # Errors
/// If the header could not be read or misses a required column.
pub(crate) fn read_psm_table(
    reader: impl Read,
) -> Result<Vec<Result<RawPsmRow, PsmError>>, PsmError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);
    let header = reader.headers().map_err(csv_error)?.clone();
    let columns = Columns::from_header(&header)?;
    Ok(reader
        .records()
        .enumerate()
        .map(|(index, record)| {
            record
                .map_err(csv_error)
                .and_then(|record| parse_row(&header, columns, &record, index + 1))
        })
        .collect())
}

fn parse_row(
    header: &StringRecord,
    columns: Columns,
    record: &StringRecord,
    line_index: usize,
) -> Result<RawPsmRow, PsmError> {
    let line = record.iter().join("\t");
    let field = |index: usize| record.get(index).map(str::trim).unwrap_or_default();
    let error = |index: usize, short: &'static str, long: String| {
        let start = record.iter().take(index).map(|f| f.len() + 1).sum::<usize>();
        BoxedError::new(
            PsmErrorKind::InvalidRow,
            short,
            long,
            Context::line(
                Some(line_index as u32),
                &line,
                start.min(line.len()),
                record.get(index).map_or(0, str::len),
            ),
        )
        .to_owned()
    };
    let number = |index: Option<usize>, name: &str| {
        index
            .map(field)
            .filter(|text| !text.is_empty())
            .map(|text| {
                text.parse::<f64>().map_err(|_| {
                    error(
                        index.unwrap_or_default(),
                        "Invalid number",
                        format!("The {name} column should contain a number"),
                    )
                })
            })
            .transpose()
    };

    let scan = field(columns.scan).parse::<usize>().map_err(|_| {
        error(
            columns.scan,
            "Invalid scan",
            "The scan number should be a positive whole number".to_string(),
        )
    })?;
    let charge = field(columns.charge).parse::<i32>().map_err(|_| {
        error(
            columns.charge,
            "Invalid charge",
            "The charge should be a whole number".to_string(),
        )
    })?;
    let sequence = field(columns.peptide);
    if sequence.is_empty() {
        return Err(error(
            columns.peptide,
            "Missing peptide",
            "The peptide column is empty".to_string(),
        ));
    }

    let mut row = RawPsmRow::new(scan, charge, sequence);
    if let Some(protein) = columns.protein {
        row.proteins = field(protein)
            .split(';')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(ToString::to_string)
            .collect();
    }
    row.precursor_mz = number(columns.precursor_mz, "PrecursorMZ")?;
    row.mass_error = number(columns.mass_error, "DelM")?;
    row.modifications = columns
        .modifications
        .map(field)
        .filter(|text| !text.is_empty())
        .map(ToString::to_string);
    for (index, name) in header.iter().enumerate() {
        if !columns.is_fixed(index) {
            row.scores
                .insert(name.trim().to_string(), TextNumber::new(field(index)));
        }
    }
    Ok(row)
}

fn csv_error(error: csv::Error) -> PsmError {
    let kind = if error.is_io_error() {
        PsmErrorKind::IO
    } else {
        PsmErrorKind::InvalidRow
    };
    BoxedError::new(
        kind,
        "Could not read PSM table",
        error.to_string(),
        Context::none().line_index(
            error
                .position()
                .map_or(0, |position| position.line().saturating_sub(1)) as u32,
        ),
    )
}

#[cfg(test)]
#[expect(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    const TABLE: &str = "Scan\tCharge\tPeptide\tProtein\tPrecursorMZ\tSpecEValue\tModifications\n\
        1021\t2\tK.PEPM+15.995K.A\tP1; P2\t500.25\t1.2e-12\t\n\
        1022\tx\tK.PEPK.A\tP1\t\t1e-3\t\n\
        1023\t3\tR.LCDEK.F\t\t\tNA\tOxidation 4\n";

    #[test]
    fn rows_and_scores() {
        let rows = read_psm_table(TABLE.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        let first = rows[0].as_ref().unwrap();
        assert_eq!(first.scan, 1021);
        assert_eq!(first.charge, 2);
        assert_eq!(first.sequence, "K.PEPM+15.995K.A");
        assert_eq!(first.proteins, ["P1", "P2"]);
        assert_eq!(first.precursor_mz, Some(500.25));
        assert_eq!(first.modifications, None);
        assert_eq!(first.scores.len(), 1);
        assert_eq!(first.scores["SpecEValue"].value(), Some(1.2e-12));

        let error = rows[1].as_ref().unwrap_err();
        assert!(matches!(error.get_kind(), PsmErrorKind::InvalidRow));

        let third = rows[2].as_ref().unwrap();
        assert!(third.proteins.is_empty());
        assert_eq!(third.precursor_mz, None);
        assert_eq!(third.scores["SpecEValue"].text(), "NA");
        assert!(!third.scores["SpecEValue"].is_number());
        assert_eq!(third.modifications.as_deref(), Some("Oxidation 4"));
    }

    #[test]
    fn missing_required_column() {
        let error = read_psm_table("Scan\tPeptide\n1\tPEPTIDE\n".as_bytes()).unwrap_err();
        assert!(matches!(error.get_kind(), PsmErrorKind::InvalidRow));
        assert!(error.get_long_description().contains("Charge"));
    }
}
