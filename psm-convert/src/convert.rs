use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
    sync::atomic::AtomicBool,
};

use context_error::*;
use tracing::info;

use psmcore::{PsmError, PsmErrorKind, modification::ModificationRegistry};
use psmident::{
    BatchProcessor, BatchSummary, SearchResult, SearchResultAnnotator,
    output::{SeqInfoWriter, SynopsisWriter, score_columns, write_mod_summary},
};

use crate::table::read_psm_table;

/// The outcome of converting one input file
#[derive(Debug)]
pub(crate) struct Converted {
    pub(crate) input: PathBuf,
    pub(crate) registry: ModificationRegistry,
    pub(crate) summary: BatchSummary,
}

/// Annotate one PSM table and write its synopsis, ModSummary, and SeqInfo files into the
/// output directory. The registry is a fresh copy per file.
/// # Errors
/// If the input could not be read or the output files could not be written.
pub(crate) fn convert_file(
    input: &Path,
    output_directory: &Path,
    annotator: &SearchResultAnnotator,
    mut registry: ModificationRegistry,
    cancel: &AtomicBool,
) -> Result<Converted, PsmError> {
    let file = File::open(input).map_err(|e| io_error("Could not open PSM table", input, &e))?;
    let rows = read_psm_table(BufReader::new(file))?;
    let (results, summary) = BatchProcessor::new(annotator)
        .with_cancellation(cancel)
        .process_results(rows, &mut registry);

    let stem = input
        .file_stem()
        .map_or_else(|| "psms".into(), |s| s.to_string_lossy());
    write_outputs(output_directory, &stem, &results, &registry)?;
    info!(
        "Wrote {} PSMs from {} to {}",
        results.len(),
        input.display(),
        output_directory.display()
    );
    Ok(Converted {
        input: input.to_path_buf(),
        registry,
        summary,
    })
}

/// Write `<stem>_syn.txt`, `<stem>_ModSummary.txt`, and `<stem>_SeqInfo.txt`
/// # Errors
/// If any of the files could not be created or written.
pub(crate) fn write_outputs(
    output_directory: &Path,
    stem: &str,
    results: &[SearchResult],
    registry: &ModificationRegistry,
) -> Result<(), PsmError> {
    let path = output_directory.join(format!("{stem}_syn.txt"));
    let mut writer = SynopsisWriter::new(BufWriter::new(create(&path)?))
        .write_header(score_columns(results))
        .map_err(|e| io_error("Could not write synopsis file", &path, &e))?;
    writer
        .write_results(results)
        .map_err(|e| io_error("Could not write synopsis file", &path, &e))?;
    writer
        .finish()
        .map_err(|e| io_error("Could not write synopsis file", &path, &e))?;

    write_summary_file(output_directory, stem, registry)?;

    let mut seq_info = SeqInfoWriter::new();
    for result in results {
        seq_info.add(result);
    }
    let path = output_directory.join(format!("{stem}_SeqInfo.txt"));
    seq_info
        .write(BufWriter::new(create(&path)?))
        .map_err(|e| io_error("Could not write sequence info file", &path, &e))
}

/// Write `<stem>_ModSummary.txt` with the modifications of the given registry
/// # Errors
/// If the file could not be created or written.
pub(crate) fn write_summary_file(
    output_directory: &Path,
    stem: &str,
    registry: &ModificationRegistry,
) -> Result<(), PsmError> {
    let path = output_directory.join(format!("{stem}_ModSummary.txt"));
    write_mod_summary(BufWriter::new(create(&path)?), &registry.snapshot())
        .map_err(|e| io_error("Could not write modification summary", &path, &e))
}

fn create(path: &Path) -> Result<File, PsmError> {
    File::create(path).map_err(|e| io_error("Could not create output file", path, &e))
}

pub(crate) fn io_error(short: &'static str, path: &Path, error: &std::io::Error) -> PsmError {
    BoxedError::new(
        PsmErrorKind::IO,
        short,
        error.to_string(),
        Context::none().source(path.to_string_lossy().to_string()),
    )
}

#[cfg(test)]
#[expect(clippy::missing_panics_doc)]
mod tests {
    use std::io::Write;

    use super::*;
    use psmident::{SearchEngine, SearchEngineParameters};

    #[test]
    fn convert_into_directory() {
        let directory = std::env::temp_dir().join(format!("psm-convert-{}", std::process::id()));
        std::fs::create_dir_all(&directory).unwrap();
        let input = directory.join("run1.tsv");
        let mut file = File::create(&input).unwrap();
        write!(
            file,
            "Scan\tCharge\tPeptide\tProtein\tSpecEValue\n\
            1\t2\tK.PEPM+15.995K.A\tP1\t1e-10\n\
            2\tnone\tK.PEPK.A\tP1\t1e-3\n\
            3\t2\tR.LCDEK.F\tP2\t1e-8\n"
        )
        .unwrap();
        drop(file);

        let (annotator, registry) = SearchEngineParameters::new(SearchEngine::MsgfPlus)
            .build()
            .unwrap();
        let converted =
            convert_file(&input, &directory, &annotator, registry, &AtomicBool::new(false))
                .unwrap();
        assert_eq!(converted.summary.rows, 2);
        assert_eq!(converted.summary.invalid_rows, 1);
        assert_eq!(converted.registry.len(), 1);

        let synopsis = std::fs::read_to_string(directory.join("run1_syn.txt")).unwrap();
        assert_eq!(synopsis.lines().count(), 3);
        assert!(synopsis.contains("K.PEPM*K.A"));
        let summary = std::fs::read_to_string(directory.join("run1_ModSummary.txt")).unwrap();
        assert_eq!(summary.lines().count(), 2);
        let seq_info = std::fs::read_to_string(directory.join("run1_SeqInfo.txt")).unwrap();
        assert_eq!(seq_info.lines().count(), 3);
        std::fs::remove_dir_all(&directory).unwrap();
    }
}
