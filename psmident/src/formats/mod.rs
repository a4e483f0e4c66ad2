//! Parse the modification columns of search engines that write modifications separate from the peptide

mod diann;
mod maxquant;
mod modified_sequence;
mod msfragger;
mod mspathfinder;

pub use diann::*;
pub use maxquant::*;
pub use msfragger::*;
pub use mspathfinder::*;

#[cfg(test)]
mod maxquant_tests;
#[cfg(test)]
mod msfragger_tests;
