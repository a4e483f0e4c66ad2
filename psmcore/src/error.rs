//! The [`PsmErrorKind`] which makes it easy for downstream users of the error type to match on the exact error.

use context_error::{BoxedError, ErrorKind};
use serde::{Deserialize, Serialize};

/// The kind of error that can occur while normalising PSMs
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum PsmErrorKind {
    /// A chemical formula contained a malformed or unknown token
    #[default]
    FormulaParse,
    /// A peptide sequence contained a character without a defined mass
    InvalidResidue,
    /// A modification was placed outside of the valid range of the peptide
    InvalidPosition,
    /// A modification symbol or name could not be resolved to a known definition
    ModificationNotFound,
    /// A search engine parameter (file or line) was invalid
    InvalidParameters,
    /// A raw PSM row was invalid
    InvalidRow,
    /// An error concerning the underlying stream
    IO,
}

impl ErrorKind for PsmErrorKind {
    type Settings = ();
    fn descriptor(&self) -> &'static str {
        "error"
    }
    fn ignored(&self, _settings: Self::Settings) -> bool {
        false
    }
    fn is_error(&self, _settings: Self::Settings) -> bool {
        true
    }
}

/// The error type used throughout this crate.
pub type PsmError = BoxedError<'static, PsmErrorKind>;
