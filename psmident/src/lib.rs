#![doc = include_str!("../README.md")]

mod annotator;
mod batch;
mod engine;
pub mod formats;
mod helper_functions;
pub mod output;
mod parameters;
mod raw_row;
mod search_result;
mod text_number;

pub use annotator::SearchResultAnnotator;
pub use batch::{BatchProcessor, BatchSummary};
pub use engine::{
    ExternalFormat, ExtractedModification, ExtractedModifications, ModKey, ModNotation,
    SearchEngine,
};
pub use parameters::{SearchEngineParameters, parse_msfragger_param_line, parse_msgf_mod_line};
pub use raw_row::RawPsmRow;
pub use search_result::SearchResult;
pub use text_number::TextNumber;

/// A subset of the types and traits that are envisioned to be used the most, importing this is a good starting point for working with the crate
pub mod prelude {
    pub use crate::output::{SeqInfoWriter, SynopsisWriter, score_columns, write_mod_summary};
    pub use crate::{
        BatchProcessor, RawPsmRow, SearchEngine, SearchEngineParameters, SearchResult,
        SearchResultAnnotator,
    };
}
