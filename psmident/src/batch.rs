use std::{
    borrow::Borrow,
    sync::atomic::{AtomicBool, Ordering},
};

use serde::Serialize;
use tracing::{info, warn};

use crate::{RawPsmRow, SearchResult, SearchResultAnnotator};
use psmcore::{PsmError, modification::ModificationRegistry};

/// Counts of a processed batch
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct BatchSummary {
    /// The number of rows annotated
    pub rows: usize,
    /// The number of rows that could not be read
    pub invalid_rows: usize,
    /// The number of annotated PSMs with at least one error
    pub with_errors: usize,
    /// If processing stopped early because it was cancelled
    pub cancelled: bool,
}

/// Annotates rows one at a time. Cancellation is only checked between rows, so a cancelled
/// batch contains only fully annotated results.
#[derive(Clone, Copy, Debug)]
pub struct BatchProcessor<'a> {
    annotator: &'a SearchResultAnnotator,
    cancel: Option<&'a AtomicBool>,
}

impl<'a> BatchProcessor<'a> {
    /// Create a processor for the given annotator
    pub const fn new(annotator: &'a SearchResultAnnotator) -> Self {
        Self {
            annotator,
            cancel: None,
        }
    }

    /// Stop processing at the next row once this flag is set
    #[must_use]
    pub const fn with_cancellation(mut self, cancel: &'a AtomicBool) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(|c| c.load(Ordering::Relaxed))
    }

    /// Annotate all rows
    pub fn process<R: Borrow<RawPsmRow>>(
        &self,
        rows: impl IntoIterator<Item = R>,
        registry: &mut ModificationRegistry,
    ) -> (Vec<SearchResult>, BatchSummary) {
        self.process_results(rows.into_iter().map(Ok), registry)
    }

    /// Annotate all rows that could be read, rows that failed to read are counted and logged
    pub fn process_results<R: Borrow<RawPsmRow>>(
        &self,
        rows: impl IntoIterator<Item = Result<R, PsmError>>,
        registry: &mut ModificationRegistry,
    ) -> (Vec<SearchResult>, BatchSummary) {
        let mut summary = BatchSummary::default();
        let mut results = Vec::new();
        for row in rows {
            if self.is_cancelled() {
                summary.cancelled = true;
                warn!("Processing cancelled after {} rows", summary.rows);
                break;
            }
            match row {
                Ok(row) => {
                    let result = self.annotator.annotate(row.borrow(), registry);
                    summary.rows += 1;
                    if result.has_errors() {
                        summary.with_errors += 1;
                    }
                    results.push(result);
                }
                Err(error) => {
                    summary.invalid_rows += 1;
                    warn!("Skipped row: {error}");
                }
            }
        }
        info!(
            "Annotated {} PSMs ({} with errors, {} unreadable rows), {} modifications known",
            summary.rows,
            summary.with_errors,
            summary.invalid_rows,
            registry.len()
        );
        (results, summary)
    }
}

#[cfg(test)]
#[expect(clippy::missing_panics_doc)]
mod tests {
    use context_error::*;

    use super::*;
    use crate::SearchEngine;
    use psmcore::{
        PsmErrorKind,
        sequence::{PeptideCleavageClassifier, PeptideMassCalculator},
    };

    fn annotator() -> SearchResultAnnotator {
        SearchResultAnnotator::new(
            SearchEngine::MsgfPlus.notation(),
            PeptideMassCalculator::default(),
            PeptideCleavageClassifier::default(),
        )
    }

    #[test]
    fn counts() {
        let annotator = annotator();
        let mut registry = ModificationRegistry::default();
        let rows = vec![
            Ok(RawPsmRow::new(1, 2, "K.PEPTIDEK.A")),
            Err(BoxedError::new(
                PsmErrorKind::InvalidRow,
                "Invalid row",
                "Missing column",
                Context::none(),
            )),
            Ok(RawPsmRow::new(3, 2, "K.PEP?TIDEK.A")),
        ];
        let (results, summary) = BatchProcessor::new(&annotator).process_results(rows, &mut registry);
        assert_eq!(results.len(), 2);
        assert_eq!(
            summary,
            BatchSummary {
                rows: 2,
                invalid_rows: 1,
                with_errors: 1,
                cancelled: false
            }
        );
    }

    #[test]
    fn cancelled_between_rows() {
        let annotator = annotator();
        let mut registry = ModificationRegistry::default();
        let cancel = AtomicBool::new(true);
        let rows = [RawPsmRow::new(1, 2, "PEPTIDE")];
        let (results, summary) = BatchProcessor::new(&annotator)
            .with_cancellation(&cancel)
            .process(&rows, &mut registry);
        assert!(results.is_empty());
        assert!(summary.cancelled);
    }
}
