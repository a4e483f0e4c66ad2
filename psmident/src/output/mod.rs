//! Write annotated PSMs as the tab separated synopsis, modification summary, and sequence info tables

mod mod_summary;
mod seq_info;
mod synopsis;

pub use mod_summary::*;
pub use seq_info::*;
pub use synopsis::*;
